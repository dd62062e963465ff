//! Recast CLI - command-line wiring for the Recast rewriting engine
//!
//! Builds a [`RecastConfig`](recast_core::RecastConfig) from an optional
//! configuration file and command-line overrides, selects rules from the
//! catalogue and runs the batch runner.

pub mod cli;
pub mod report;

// Re-export commonly used items for convenience
pub use cli::{build_command, execute, resolve_config, resolve_process_config, Status};
pub use report::{render_rules, render_summary};
