//! Salesdash CLI - Sales analytics dashboard
//!
//! Usage:
//!   salesdash serve --port 8050        Start web server
//!   salesdash summary --state Delhi    Print KPIs and chart series
//!   salesdash ask top category         Ask a question about the data
//!   salesdash filters                  List filter values

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = commands::load_config(cli.config.as_deref())?;
    let data = cli.data.as_deref();

    match cli.command {
        Commands::Serve {
            port,
            host,
            static_dir,
        } => {
            commands::cmd_serve(
                &config,
                data,
                host.as_deref(),
                port,
                static_dir.as_deref(),
            )
            .await
        }
        Commands::Summary { filters, top, json } => {
            commands::cmd_summary(&config, data, &filters.spec(), top, json)
        }
        Commands::Ask { question, filters } => {
            commands::cmd_ask(&config, data, &question.join(" "), &filters.spec())
        }
        Commands::Filters => commands::cmd_filters(&config, data),
    }
}
