//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (config and dataset loading) and the filters listing
//! - `ask` - Question answering
//! - `serve` - Web server command
//! - `summary` - KPI and chart summary

pub mod ask;
pub mod core;
pub mod serve;
pub mod summary;

// Re-export command functions for main.rs
pub use ask::*;
pub use core::*;
pub use serve::*;
pub use summary::*;
