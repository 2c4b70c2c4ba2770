//! Dashboard configuration
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit path, or the override in the data dir
//!    (~/.local/share/salesdash/config/dashboard.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Keys missing from an override keep their default values.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::charts::DEFAULT_TOP_N;
use crate::dataset::DEFAULT_DATE_FORMAT;
use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
pub const DEFAULT_CONFIG: &str = include_str!("../../../config/dashboard.toml");

const DEFAULT_DATA_FILE: &str = "Amazon Sale Report.csv";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8050;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Sales report CSV loaded at startup
    pub data_file: PathBuf,
    /// chrono format of the `Date` column
    pub date_format: String,
    /// Groups shown in the top-N bar charts
    pub chart_top_n: usize,
    pub host: String,
    pub port: u16,
    /// Extra CORS origins; empty means same-origin only
    pub allowed_origins: Vec<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            chart_top_n: DEFAULT_TOP_N,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            allowed_origins: Vec::new(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration (explicit path, then data-dir override, then default)
    ///
    /// An explicit path that does not exist is an error; a missing data-dir
    /// override is not.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let content = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                debug!(path = %path.display(), "Loading config");
                read(path)?
            }
            None => match default_config_path().filter(|p| p.exists()) {
                Some(default_path) => {
                    debug!(path = %default_path.display(), "Loading config override");
                    read(&default_path)?
                }
                None => DEFAULT_CONFIG.to_string(),
            },
        };

        parse_config(&content)
    }

    /// `host:port` to bind
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Location of the optional user override
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("salesdash").join("config").join("dashboard.toml"))
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::Config(format!("Failed to read config: {}", e)))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    data: Option<RawData>,
    charts: Option<RawCharts>,
    server: Option<RawServer>,
}

#[derive(Debug, Deserialize)]
struct RawData {
    file: Option<PathBuf>,
    date_format: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawCharts {
    top_n: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawServer {
    host: Option<String>,
    port: Option<u16>,
    allowed_origins: Option<Vec<String>>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<DashboardConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = DashboardConfig::default();

    if let Some(data) = raw.data {
        if let Some(file) = data.file {
            config.data_file = file;
        }
        if let Some(format) = data.date_format {
            config.date_format = format;
        }
    }

    if let Some(charts) = raw.charts {
        if let Some(top_n) = charts.top_n {
            if top_n == 0 {
                return Err(Error::Config("charts.top_n must be at least 1".to_string()));
            }
            config.chart_top_n = top_n;
        }
    }

    if let Some(server) = raw.server {
        if let Some(host) = server.host {
            config.host = host;
        }
        if let Some(port) = server.port {
            config.port = port;
        }
        if let Some(origins) = server.allowed_origins {
            config.allowed_origins = origins;
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_default_config() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.bind_address(), "127.0.0.1:8050");
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = parse_config(
            r#"
            [charts]
            top_n = 5

            [server]
            port = 9000
            allowed_origins = ["http://localhost:3000"]
            unknown_key = true
            "#,
        )
        .unwrap();

        assert_eq!(config.chart_top_n, 5);
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.allowed_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.date_format, "%m-%d-%y");
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            parse_config("[charts\ntop_n = "),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            parse_config("[charts]\ntop_n = 0"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            parse_config("[server]\nport = \"http\""),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[data]\nfile = \"/srv/sales.csv\"").unwrap();

        let config = DashboardConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.data_file, PathBuf::from("/srv/sales.csv"));
        assert_eq!(config.chart_top_n, DEFAULT_TOP_N);
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let result = DashboardConfig::load(Some(Path::new("/nonexistent/dashboard.toml")));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
