//! Summary command implementation

use std::path::Path;

use anyhow::{bail, Result};
use salesdash_core::{ChartKind, Dashboard, DashboardConfig, FilterSpec};

use super::open_dataset;

pub fn cmd_summary(
    config: &DashboardConfig,
    data: Option<&Path>,
    spec: &FilterSpec,
    top: Option<usize>,
    json: bool,
) -> Result<()> {
    let top = top.unwrap_or(config.chart_top_n);
    if top == 0 {
        bail!("--top must be at least 1");
    }

    let dataset = open_dataset(config, data);
    let dashboard = Dashboard::project(&dataset.filter(spec), top);

    if json {
        let output = serde_json::json!({
            "scope": spec.describe(),
            "filters": spec,
            "kpis": dashboard.kpis,
            "cards": dashboard.cards,
            "charts": dashboard.charts,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{}", render_summary(&dashboard, spec.describe()));
    }

    Ok(())
}

/// Plain-text rendering of KPI cards and chart series
pub fn render_summary(dashboard: &Dashboard, scope: &str) -> String {
    let mut out = String::new();

    out.push('\n');
    out.push_str("╭─────────────────────────────────────────╮\n");
    out.push_str("│          📊 Sales Dashboard             │\n");
    out.push_str("╰─────────────────────────────────────────╯\n");
    out.push_str(&format!("  Scope: {}\n\n", scope));

    for card in &dashboard.cards {
        out.push_str(&format!("  {:<22} {}\n", card.label, card.value));
    }

    for chart in &dashboard.charts {
        out.push('\n');
        out.push_str(&format!("  {}\n", chart.title));
        out.push_str("   ─────────────────────────────\n");
        if chart.no_data {
            out.push_str("   🤷 No data to display.\n");
            continue;
        }
        for point in &chart.points {
            let value = match chart.kind {
                ChartKind::Pie => format!("{}", point.value as u64),
                ChartKind::Line | ChartKind::Bar => format!("{:.2}", point.value),
            };
            out.push_str(&format!("   {:<28} {:>14}\n", point.label, value));
        }
    }
    out.push('\n');

    out
}
