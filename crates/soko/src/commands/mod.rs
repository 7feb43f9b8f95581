//! Command dispatch: bridges CLI args -> core flow -> output formatting.

pub mod config_cmd;
pub mod methods;
pub mod payment_info;
pub mod util;
pub mod views;
pub mod visit;

use soko_core::FlowContext;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    ctx: FlowContext,
    profile: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Methods => methods::handle(&ctx, global).await,
        Command::PaymentInfo(args) => payment_info::handle(&ctx, args, global).await,
        Command::Visit(args) => visit::handle(ctx, args, profile, global).await,
        Command::TrackView(args) => views::handle(&ctx, args, global).await,
        // Config and Completions never reach the backend
        Command::Config(args) => config_cmd::handle(args, global),
        Command::Completions(_) => Ok(()),
    }
}
