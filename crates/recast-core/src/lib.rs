//! # Recast Core
//!
//! Batch source-to-source rewriting of PHP syntax trees, including:
//! - Syntax tree model with stable node ids and a source printer
//! - Modifier and visibility manipulation with node-kind preconditions
//! - Scope-bounded node search and shared name comparison
//! - The rule contract and a deterministic fixed-point engine
//! - A catalogue of rules and a batch runner over many units
//!
//! One engine run owns one tree. Rules hold no per-unit state, so units can
//! be rewritten in parallel by independent engines.

#![warn(clippy::all)]

pub mod ast;
pub mod batch;
pub mod config;
pub mod engine;
pub mod node_finder;
pub mod node_manipulator;
pub mod node_name;
pub mod rules;

// Re-export commonly used types
pub use ast::{KindSet, Modifiers, Node, NodeData, NodeId, NodeKind, SyntaxTree, ToSource};
pub use batch::{BatchRunner, BatchSummary, FailureKind, UnitFailure, UnitReport};
pub use config::{LanguageVersion, OutputFormat, RecastConfig, DEFAULT_MAX_PASSES};
pub use engine::{Engine, Outcome, Rule, RuleContext, RuleDefinition, RunSummary};
pub use node_finder::NodeFinder;
pub use node_manipulator::{ModifierError, VisibilityManipulator};
pub use node_name::NameResolver;

/// Recast version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize tracing for Recast components.
///
/// `RUST_LOG` wins when set; otherwise Recast crates log at info, or at
/// debug when `verbose` is set. Calling this twice is harmless.
pub fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("recast_core={level},recast_cli={level}"))
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Error types for Recast operations
#[derive(thiserror::Error, Debug)]
pub enum RewriteError {
    /// A modifier operation was misused by a rule
    #[error("Modifier error: {0}")]
    Modifier(#[from] ModifierError),

    /// The pass budget ran out while passes were still changing the tree
    #[error("Rewriting did not converge within {budget} passes")]
    NonConvergence { budget: usize },

    /// A rule asked to remove a node that is not in a statement list
    #[error("Rule {rule} cannot remove a {kind} node outside a statement list")]
    InvalidRemoval { rule: &'static str, kind: NodeKind },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed tree or configuration document
    #[error("Document error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for Recast operations
pub type Result<T> = std::result::Result<T, RewriteError>;
