//! aws-cost - Cost report for an AWS account

use std::process::ExitCode;

use awscost::{cli::Cli, report};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "warn,awscost=info,awscost_core=info,awscost_aws=info,awscost_slack=info";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise quiet unless --verbose
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            tracing_subscriber::EnvFilter::new(VERBOSE_FILTER)
        } else {
            tracing_subscriber::EnvFilter::new("warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if cli.output.no_color {
        colored::control::set_override(false);
    }

    match report::run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("Run failed: {:?}", e);
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
