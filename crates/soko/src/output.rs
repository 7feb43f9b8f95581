//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use soko_core::SubmissionStatus;

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Submission status label, colored when enabled.
pub fn status_label(status: SubmissionStatus, color: bool) -> String {
    let label = match status {
        SubmissionStatus::Idle => "idle",
        SubmissionStatus::Submitting => "submitting",
        SubmissionStatus::Succeeded => "submitted",
        SubmissionStatus::Failed => "failed",
    };
    if !color {
        return label.to_owned();
    }
    match status {
        SubmissionStatus::Succeeded => label.green().bold().to_string(),
        SubmissionStatus::Failed => label.red().bold().to_string(),
        SubmissionStatus::Idle | SubmissionStatus::Submitting => label.yellow().to_string(),
    }
}

/// Highlight a "Not configured" value, leave others untouched.
pub fn field_value(value: &str, configured: bool, color: bool) -> String {
    if color && !configured {
        value.yellow().italic().to_string()
    } else {
        value.to_owned()
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    Ok(match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::JsonCompact => serde_json::to_string(data)?,
        OutputFormat::Yaml => serde_yaml::to_string(data)?,
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    })
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses a custom `detail_fn` that returns a pre-formatted
/// string, since single-item detail views don't use `Tabled` derive.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    Ok(match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::JsonCompact => serde_json::to_string(data)?,
        OutputFormat::Yaml => serde_yaml::to_string(data)?,
        OutputFormat::Plain => id_fn(data),
    })
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(serde::Serialize)]
    struct Item {
        id: &'static str,
    }

    #[derive(Tabled)]
    struct ItemRow {
        #[tabled(rename = "ID")]
        id: &'static str,
    }

    #[test]
    fn list_formats() {
        let data = [Item { id: "mtn_momo" }, Item { id: "crypto" }];
        let render = |format| {
            render_list(&format, &data, |i| ItemRow { id: i.id }, |i| i.id.to_owned()).unwrap()
        };

        assert_eq!(render(OutputFormat::Plain), "mtn_momo\ncrypto");
        assert_eq!(
            render(OutputFormat::JsonCompact),
            r#"[{"id":"mtn_momo"},{"id":"crypto"}]"#
        );
        let table = render(OutputFormat::Table);
        assert!(table.contains("ID"));
        assert!(table.contains("crypto"));
    }

    #[test]
    fn uncolored_status_labels() {
        assert_eq!(status_label(SubmissionStatus::Succeeded, false), "submitted");
        assert_eq!(status_label(SubmissionStatus::Failed, false), "failed");
        assert_eq!(field_value("Not configured", false, false), "Not configured");
    }
}
