//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod ask;
pub mod dashboard;
pub mod filters;

// Re-export all handlers for use in router
pub use ask::*;
pub use dashboard::*;
pub use filters::*;
