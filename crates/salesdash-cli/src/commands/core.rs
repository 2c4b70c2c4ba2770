//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `load_config` - Resolve the dashboard config
//! - `open_dataset` - Load the sales report named by the config or `--data`
//! - `cmd_filters` - List filter values

use std::path::Path;

use anyhow::{Context, Result};
use salesdash_core::{DashboardConfig, Dataset, FilterOptions};

/// Load config from `--config`, the data-dir override, or built-in defaults
pub fn load_config(path: Option<&Path>) -> Result<DashboardConfig> {
    DashboardConfig::load(path).context("Failed to load dashboard config")
}

/// Load the sales report; a missing or unreadable file yields an empty dataset
pub fn open_dataset(config: &DashboardConfig, data: Option<&Path>) -> Dataset {
    let path = data.unwrap_or(config.data_file.as_path());
    Dataset::load(path, &config.date_format)
}

pub fn cmd_filters(config: &DashboardConfig, data: Option<&Path>) -> Result<()> {
    let dataset = open_dataset(config, data);

    if dataset.is_empty() {
        println!("No sales records loaded. Point at a report with:");
        println!("  salesdash --data \"Amazon Sale Report.csv\" filters");
        return Ok(());
    }

    let options = FilterOptions::from_dataset(&dataset);

    println!();
    println!("📂 Categories ({})", options.categories.len());
    print_list(&options.categories);
    println!();
    println!("📍 States ({})", options.states.len());
    print_list(&options.states);
    println!();
    println!("🏷️  Statuses ({})", options.statuses.len());
    print_list(&options.statuses);
    println!();

    Ok(())
}

fn print_list(values: &[String]) {
    for value in values {
        println!("   {}", value);
    }
}
