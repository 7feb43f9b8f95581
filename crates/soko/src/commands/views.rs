//! Listing view tracking.

use soko_core::FlowContext;
use soko_core::tracking;
use tracing::warn;

use crate::cli::{GlobalOpts, TrackViewArgs};
use crate::error::CliError;

/// Fire the view-tracking call. Never fails: problems are logged at `warn`.
pub async fn handle(
    ctx: &FlowContext,
    args: TrackViewArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let task = tracking::spawn_track_view(ctx.backend.clone(), args.listing_id.clone());
    // The process exits right after this command, so wait for the call.
    if let Err(e) = task.await {
        warn!(error = %e, "view tracking task did not finish");
    }
    if !global.quiet {
        eprintln!("View of '{}' reported", args.listing_id);
    }
    Ok(())
}
