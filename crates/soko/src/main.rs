mod cli;
mod commands;
mod config;
mod error;
mod output;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use soko_core::FlowContext;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a backend
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "soko", &mut std::io::stdout());
            Ok(())
        }

        // All other commands talk to the marketplace backend
        cmd => {
            let cfg = config::load_config_or_default();
            let client_config = config::resolve_client_config(&cli.global, &cfg)?;
            let client = client_config.build_client()?;
            let session = Arc::new(client_config.session());
            let ctx = FlowContext::from_client(client, session, cfg.flow_config());

            tracing::debug!(command = ?cmd, url = %client_config.url, "dispatching command");
            let profile = config::active_profile_name(&cli.global, &cfg);
            commands::dispatch(cmd, ctx, &profile, &cli.global).await
        }
    }
}
