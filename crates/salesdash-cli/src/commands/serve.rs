//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};
use salesdash_core::DashboardConfig;

use super::open_dataset;

/// Comma-separated CORS origins, overriding `[server] allowed_origins`
const ALLOWED_ORIGINS_ENV: &str = "SALESDASH_ALLOWED_ORIGINS";

pub async fn cmd_serve(
    config: &DashboardConfig,
    data: Option<&Path>,
    host: Option<&str>,
    port: Option<u16>,
    static_dir: Option<&Path>,
) -> Result<()> {
    let host = host.unwrap_or(config.host.as_str());
    let port = port.unwrap_or(config.port);
    let data_file = data.unwrap_or(config.data_file.as_path());

    println!("🚀 Starting salesdash web server...");
    println!("   Sales report: {}", data_file.display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    let mut server_config = salesdash_server::ServerConfig::from(config);
    if let Some(origins) = origins_from_env() {
        server_config.allowed_origins = origins;
    }
    if !server_config.allowed_origins.is_empty() {
        println!(
            "   🌐 CORS origins: {}",
            server_config.allowed_origins.join(", ")
        );
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let dataset = open_dataset(config, data);
    let state = salesdash_server::AppState::new(dataset, server_config)
        .context("Failed to build server state")?;
    let static_dir = static_dir.and_then(|p| p.to_str());

    salesdash_server::serve(state, host, port, static_dir)
        .await
        .context("Server failed")
}

fn origins_from_env() -> Option<Vec<String>> {
    std::env::var(ALLOWED_ORIGINS_ENV)
        .ok()
        .map(|value| parse_origins(&value))
}

/// Split a comma-separated origin list, dropping blanks
pub fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
