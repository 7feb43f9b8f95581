//! Payment method listing.

use tabled::Tabled;

use soko_core::{FlowContext, PaymentMethod};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct MethodRow {
    #[tabled(rename = "ID")]
    id: &'static str,
    #[tabled(rename = "Name")]
    name: &'static str,
}

impl From<&PaymentMethod> for MethodRow {
    fn from(m: &PaymentMethod) -> Self {
        Self {
            id: (*m).into(),
            name: m.label(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &FlowContext, global: &GlobalOpts) -> Result<(), CliError> {
    let methods = ctx.backend.active_methods().await?;
    if methods.is_empty() && !global.quiet {
        eprintln!("No payment methods are active right now.");
    }
    let out = output::render_list(
        &global.output,
        &methods,
        |m| MethodRow::from(m),
        ToString::to_string,
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
