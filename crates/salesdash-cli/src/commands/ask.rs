//! Question command implementation

use std::path::Path;

use anyhow::{Context, Result};
use salesdash_core::{DashboardConfig, FilterSpec, IntentMatcher};

use super::open_dataset;

pub fn cmd_ask(
    config: &DashboardConfig,
    data: Option<&Path>,
    question: &str,
    spec: &FilterSpec,
) -> Result<()> {
    let dataset = open_dataset(config, data);
    let matcher = IntentMatcher::new().context("Failed to build question matcher")?;

    let answer = matcher.ask(question, &dataset, spec);

    println!();
    println!("{}", answer.text);
    println!();

    Ok(())
}
