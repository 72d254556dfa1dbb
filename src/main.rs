//! supportdesk CLI binary entry point.

use std::process::ExitCode;

use clap::Parser;
use supportdesk::cli::{commands, output, Cli};
use supportdesk::error::classify;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding the tracing filter directive.
const LOG_ENV: &str = "SUPPORTDESK_LOG";

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    // stdout carries command output; diagnostics go to stderr.
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();
    let format = cli.global.output;

    match commands::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let structured = classify(&err);
            tracing::debug!(code = %structured.code(), error = %err, "command failed");
            output::report_error(format, &structured);
            ExitCode::from(output::exit_code(structured.code()))
        }
    }
}
