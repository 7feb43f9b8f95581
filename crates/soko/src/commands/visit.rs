//! Visit request: open → pick method → attach proof → confirm → submit.

use std::io::IsTerminal;
use std::time::Duration;

use dialoguer::Select;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use soko_core::{
    FlowContext, PaymentMethod, PaymentProof, Step, SubmissionStatus, VisitRequestDraft,
    VisitRequestFlow,
};

use crate::cli::{GlobalOpts, OutputFormat, VisitArgs};
use crate::error::CliError;
use crate::output;

use super::{payment_info, util};

// ── Outcome ─────────────────────────────────────────────────────────

#[derive(Serialize)]
struct VisitOutcome<'a> {
    listing_id: &'a str,
    payment_method: Option<PaymentMethod>,
    visit_fee: u64,
    step: Step,
    status: SubmissionStatus,
    request_id: Option<&'a str>,
    message: Option<&'a str>,
    notices: &'a [String],
}

impl<'a> From<&'a VisitRequestDraft> for VisitOutcome<'a> {
    fn from(d: &'a VisitRequestDraft) -> Self {
        Self {
            listing_id: d.listing_id(),
            payment_method: d.payment_method(),
            visit_fee: d.visit_fee(),
            step: d.step(),
            status: d.submission_status(),
            request_id: d.request_id(),
            message: d.success_message(),
            notices: d.notices(),
        }
    }
}

fn detail(outcome: &VisitOutcome<'_>, color: bool) -> String {
    use std::fmt::Write;
    let mut out = String::new();
    let _ = writeln!(out, "Listing:  {}", outcome.listing_id);
    if let Some(method) = outcome.payment_method {
        let _ = writeln!(out, "Method:   {}", method.label());
    }
    let _ = writeln!(out, "Fee:      {}", outcome.visit_fee);
    let _ = writeln!(out, "Status:   {}", output::status_label(outcome.status, color));
    if let Some(id) = outcome.request_id {
        let _ = writeln!(out, "Request:  {id}");
    }
    if let Some(message) = outcome.message {
        let _ = writeln!(out, "\n{message}");
    }
    if !outcome.notices.is_empty() {
        let _ = writeln!(out, "\nNotices:");
        for notice in outcome.notices {
            let _ = writeln!(out, "  - {notice}");
        }
    }
    out.trim_end().to_owned()
}

// ── Helpers ─────────────────────────────────────────────────────────

/// Pick the payment method: flag, else prompt, else the flow's default.
fn choose_method(
    draft: &VisitRequestDraft,
    requested: Option<PaymentMethod>,
    global: &GlobalOpts,
) -> Result<Option<PaymentMethod>, CliError> {
    let available = draft.available_methods();
    if let Some(method) = requested {
        if !available.contains(&method) {
            return Err(CliError::MethodUnavailable {
                method: method.to_string(),
                available: available
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }
        return Ok(Some(method));
    }

    if available.len() < 2 || global.yes || !std::io::stdin().is_terminal() {
        return Ok(draft.payment_method());
    }

    let labels: Vec<&str> = available.iter().map(|m| m.label()).collect();
    let default = draft
        .payment_method()
        .and_then(|m| available.iter().position(|a| *a == m))
        .unwrap_or(0);
    let index = Select::new()
        .with_prompt("Pay the visit fee with")
        .items(&labels)
        .default(default)
        .interact()
        .map_err(util::prompt_err)?;
    Ok(available.get(index).copied())
}

fn spinner(global: &GlobalOpts) -> Option<ProgressBar> {
    if global.quiet || !std::io::stderr().is_terminal() {
        return None;
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.set_message("Submitting visit request...");
    bar.enable_steady_tick(Duration::from_millis(100));
    Some(bar)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    ctx: FlowContext,
    args: VisitArgs,
    profile: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    let require_proof = ctx.config.require_proof;
    let flow = VisitRequestFlow::open(ctx, args.listing_id, args.fee);
    let draft = flow.ready().await.ok_or(soko_core::CoreError::FlowClosed)?;

    // Warnings already printed to stderr.
    let mut shown: Vec<String> = draft.notices().to_vec();
    if !global.quiet {
        for notice in &shown {
            eprintln!("warning: {notice}");
        }
    }
    if draft.available_methods().is_empty() {
        flow.cancel();
        return Err(CliError::NoPaymentMethods);
    }

    // 1. Payment method
    if let Some(method) = choose_method(&draft, args.method, global)? {
        flow.select_payment_method(method);
    }
    let draft = flow.snapshot().ok_or(soko_core::CoreError::FlowClosed)?;

    if !global.quiet {
        if let (Some(method), Some(settings)) = (draft.payment_method(), draft.payment_settings())
        {
            eprintln!(
                "Send {} via {}:\n{}",
                draft.visit_fee(),
                method.label(),
                payment_info::target_rows(settings, method, color)
            );
        }
        if let Some(gap) = flow.configuration_gap() {
            eprintln!("warning: {gap}");
            shown.push(gap.to_string());
        }
    }

    // 2. Proof of payment
    match args.proof {
        Some(ref path) => {
            let proof = PaymentProof::from_path(path)?;
            flow.attach_proof(Some(proof))?;
        }
        None if require_proof => {
            flow.cancel();
            return Err(CliError::Validation {
                field: "proof".into(),
                reason: "attach the payment screenshot with --proof".into(),
            });
        }
        None => {}
    }

    // 3. Confirm
    let method_label = draft.payment_method().map_or("-", PaymentMethod::label);
    let prompt = format!(
        "Submit visit request for {} ({} via {method_label})?",
        draft.listing_id(),
        draft.visit_fee()
    );
    if !util::confirm(&prompt, "visit", global.yes)? {
        flow.cancel();
        if !global.quiet {
            eprintln!("Visit request discarded");
        }
        return Ok(());
    }

    // 4. Submit
    let bar = spinner(global);
    let submitted = flow.submit().await;
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
    let draft = submitted.ok_or(soko_core::CoreError::FlowClosed)?;

    match draft.submission_status() {
        SubmissionStatus::Succeeded => {
            // Plain output carries only the id; surface late notices on stderr.
            if matches!(global.output, OutputFormat::Plain) && !global.quiet {
                for notice in draft.notices().iter().filter(|n| !shown.contains(*n)) {
                    eprintln!("warning: {notice}");
                }
            }
            let outcome = VisitOutcome::from(&draft);
            let out = output::render_single(
                &global.output,
                &outcome,
                |o| detail(o, color),
                |o| o.request_id.unwrap_or(o.listing_id).to_owned(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
        _ => Err(CliError::from_submission_failure(
            draft.last_error().unwrap_or(soko_core::GENERIC_SUBMIT_FAILURE),
            profile,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome<'a>(notices: &'a [String]) -> VisitOutcome<'a> {
        VisitOutcome {
            listing_id: "listing-123",
            payment_method: Some(PaymentMethod::AirtelMoney),
            visit_fee: 15_000,
            step: Step::Proof,
            status: SubmissionStatus::Succeeded,
            request_id: Some("vr_42"),
            message: Some("Visit request received."),
            notices,
        }
    }

    #[test]
    fn detail_lists_notices() {
        let notices = vec!["Airtel Money: phone number not configured".to_owned()];
        let text = detail(&outcome(&notices), false);

        assert!(text.contains("Request:  vr_42"));
        assert!(text.contains("Visit request received."));
        assert!(text.ends_with("Notices:\n  - Airtel Money: phone number not configured"));
    }

    #[test]
    fn detail_without_notices_has_no_section() {
        let text = detail(&outcome(&[]), false);
        assert!(!text.contains("Notices"));
        assert!(text.ends_with("Visit request received."));
    }
}
