//! Salesdash Core Library
//!
//! Shared functionality for the salesdash sales analytics dashboard:
//! - Dataset loading and cleaning from the sales report CSV
//! - Filter engine for category/state/status selections
//! - Aggregations (totals, means, rankings, status counts)
//! - Question intent matcher answering free-text questions
//! - Dashboard projection (KPIs and chart series)
//! - Configuration with embedded defaults and file overrides

pub mod aggregate;
pub mod charts;
pub mod config;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod format;
pub mod intent;
pub mod models;

pub use aggregate::{GroupAmount, StatusCount};
pub use charts::{Chart, ChartKind, ChartPoint, Dashboard, KpiCard, Kpis};
pub use config::DashboardConfig;
pub use dataset::{Dataset, FilterOptions};
pub use error::{Error, Result};
pub use filter::{FilterSpec, FilteredView};
pub use format::Metric;
pub use intent::{Answer, Intent, IntentMatcher};
pub use models::{Field, Record};
