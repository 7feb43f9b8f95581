//! Payment target details ("where do I send the visit fee?").

use serde::Serialize;
use strum::IntoEnumIterator;
use tabled::Tabled;

use soko_core::{FlowContext, PaymentMethod, PaymentSettings, TargetField};

use crate::cli::{GlobalOpts, PaymentInfoArgs};
use crate::error::CliError;
use crate::output;

// ── Entries ─────────────────────────────────────────────────────────

/// One target field of one payment method.
#[derive(Serialize)]
struct TargetEntry {
    method: PaymentMethod,
    field: &'static str,
    label: &'static str,
    value: Option<String>,
    required: bool,
}

#[derive(Tabled)]
struct TargetRow {
    #[tabled(rename = "Method")]
    method: &'static str,
    #[tabled(rename = "Field")]
    field: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

fn entries(settings: &PaymentSettings, methods: &[PaymentMethod]) -> Vec<TargetEntry> {
    methods
        .iter()
        .flat_map(|&method| {
            settings
                .target_for(method)
                .fields()
                .into_iter()
                .map(move |f: TargetField| TargetEntry {
                    method,
                    field: f.name,
                    label: f.label,
                    value: f.value,
                    required: f.required,
                })
        })
        .collect()
}

/// Field rows for `method`, as shown before a visit is submitted.
pub fn target_rows(settings: &PaymentSettings, method: PaymentMethod, color: bool) -> String {
    let fields = settings.target_for(method).fields();
    if fields.is_empty() {
        return format!("{}: paid from your platform wallet", method.label());
    }
    fields
        .iter()
        .map(|f| {
            format!(
                "  {:<16} {}",
                f.label,
                output::field_value(f.display_value(), f.value.is_some(), color)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    ctx: &FlowContext,
    args: PaymentInfoArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let settings = ctx.settings.payment_settings().await?;
    let methods: Vec<PaymentMethod> = match args.method {
        Some(method) => vec![method],
        None => PaymentMethod::iter()
            .filter(|m| *m != PaymentMethod::Wallet)
            .collect(),
    };

    let color = output::should_color(&global.color);
    let data = entries(&settings, &methods);
    let out = output::render_list(
        &global.output,
        &data,
        |e| TargetRow {
            method: e.method.label(),
            field: e.label,
            value: output::field_value(
                e.value.as_deref().unwrap_or(soko_core::NOT_CONFIGURED),
                e.value.is_some(),
                color,
            ),
        },
        |e| format!("{}\t{}\t{}", e.method, e.field, e.value.as_deref().unwrap_or_default()),
    )?;
    output::print_output(&out, global.quiet);

    if !global.quiet {
        for method in &methods {
            if let Some(gap) = settings.gap_for(*method) {
                eprintln!("warning: {gap}");
            }
        }
        if let Some(ref instructions) = settings.instructions {
            eprintln!("\n{instructions}");
        }
    }
    Ok(())
}
