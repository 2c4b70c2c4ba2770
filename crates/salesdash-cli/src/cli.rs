//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use salesdash_core::FilterSpec;

/// Salesdash - Explore sales report exports
#[derive(Parser)]
#[command(name = "salesdash")]
#[command(about = "Sales analytics dashboard with a question box", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Sales report CSV (overrides `[data] file` from the config)
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Config file
    ///
    /// Defaults to ~/.local/share/salesdash/config/dashboard.toml when it
    /// exists, otherwise the built-in defaults.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Category, state, and status selection
///
/// Each flag may be repeated or given a comma-separated list.
#[derive(Args, Clone, Debug, Default)]
pub struct FilterArgs {
    /// Product category to include
    #[arg(long = "category", value_delimiter = ',')]
    pub categories: Vec<String>,

    /// Ship-to state to include
    #[arg(long = "state", value_delimiter = ',')]
    pub states: Vec<String>,

    /// Order status to include
    #[arg(long = "status", value_delimiter = ',')]
    pub statuses: Vec<String>,
}

impl FilterArgs {
    pub fn spec(&self) -> FilterSpec {
        let clean = |values: &[String]| {
            values
                .iter()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .collect::<Vec<_>>()
        };

        FilterSpec::new()
            .categories(clean(&self.categories))
            .states(clean(&self.states))
            .statuses(clean(&self.statuses))
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Port to listen on (default from config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (default from config)
        #[arg(long)]
        host: Option<String>,

        /// Directory of static files for the browser UI
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Print KPIs and chart series for the selected filters
    Summary {
        #[command(flatten)]
        filters: FilterArgs,

        /// Groups shown in the category and city rankings
        #[arg(long)]
        top: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Ask a question about the selected data
    Ask {
        /// The question, e.g. "sales in Mumbai"
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// List the available category, state, and status values
    Filters,
}
