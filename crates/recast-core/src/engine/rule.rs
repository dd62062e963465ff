/*!
# Rewrite Rules

Core trait and utilities for defining rewrite rules.
*/

use std::time::Duration;

use crate::ast::{KindSet, Node};
use crate::config::LanguageVersion;
use crate::Result;

/// What a rule wants done with the node it was offered
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Unchanged,
    /// Put this node where the offered node was
    Replace(Node),
    /// Detach the offered node from its parent's statement list
    Remove,
}

impl Outcome {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Outcome::Unchanged)
    }
}

/// Human-readable documentation of a rule with a before/after sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleDefinition {
    pub description: &'static str,
    pub before: &'static str,
    pub after: &'static str,
}

/// Read-only view of where the offered node sits in the tree
#[derive(Debug, Clone)]
pub struct RuleContext<'a> {
    ancestors: Vec<&'a Node>,
    pass: usize,
    unit: Option<&'a str>,
}

impl<'a> RuleContext<'a> {
    pub fn new(ancestors: Vec<&'a Node>, pass: usize, unit: Option<&'a str>) -> Self {
        Self {
            ancestors,
            pass,
            unit,
        }
    }

    /// Context for a node examined outside the engine, e.g. in tests
    pub fn detached() -> Self {
        Self::new(Vec::new(), 0, None)
    }

    /// Ancestors from the root down to the parent
    pub fn ancestors(&self) -> &[&'a Node] {
        &self.ancestors
    }

    pub fn parent(&self) -> Option<&'a Node> {
        self.ancestors.last().copied()
    }

    /// Nearest ancestor whose kind is in `kinds`
    pub fn enclosing(&self, kinds: KindSet) -> Option<&'a Node> {
        self.ancestors
            .iter()
            .rev()
            .find(|node| kinds.contains_kind(node.kind()))
            .copied()
    }

    /// Number of the pass in progress, starting at 1
    pub fn pass(&self) -> usize {
        self.pass
    }

    /// Name of the unit being rewritten, usually its path
    pub fn unit(&self) -> Option<&'a str> {
        self.unit
    }
}

/// Core trait for rewrite rules
///
/// A rule is stateless across invocations. It may read anything reachable
/// from the offered node and its context, but it only changes the offered
/// node, by returning a replacement or asking for its removal.
///
/// Rules must be locally idempotent: offered the node it just produced, a
/// rule returns [`Outcome::Unchanged`].
pub trait Rule: Send + Sync {
    /// Stable identifier, used in configuration and reports
    fn name(&self) -> &'static str;

    fn definition(&self) -> RuleDefinition;

    /// Kinds this rule is offered; read once when the rule is registered
    fn applicable_kinds(&self) -> KindSet;

    /// Lowest target language version the rewrite is valid for
    fn min_version(&self) -> Option<LanguageVersion> {
        None
    }

    fn apply(&self, node: &Node, ctx: &RuleContext<'_>) -> Result<Outcome>;
}

/// A rule built from a closure
pub struct FnRule<F>
where
    F: Fn(&Node, &RuleContext<'_>) -> Result<Outcome> + Send + Sync,
{
    pub name: &'static str,
    pub description: &'static str,
    pub kinds: KindSet,
    pub apply: F,
}

impl<F> FnRule<F>
where
    F: Fn(&Node, &RuleContext<'_>) -> Result<Outcome> + Send + Sync,
{
    pub fn new(name: &'static str, kinds: KindSet, apply: F) -> Self {
        Self {
            name,
            description: "",
            kinds,
            apply,
        }
    }

    pub fn with_description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }
}

impl<F> Rule for FnRule<F>
where
    F: Fn(&Node, &RuleContext<'_>) -> Result<Outcome> + Send + Sync,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn definition(&self) -> RuleDefinition {
        RuleDefinition {
            description: self.description,
            before: "",
            after: "",
        }
    }

    fn applicable_kinds(&self) -> KindSet {
        self.kinds
    }

    fn apply(&self, node: &Node, ctx: &RuleContext<'_>) -> Result<Outcome> {
        (self.apply)(node, ctx)
    }
}

/// Rule execution statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleStats {
    pub rule_name: String,
    /// Times the rule was offered a node
    pub applications: u64,
    /// Replacements and removals that changed the tree
    pub changes: u64,
    pub errors: u64,
    pub total_time: Duration,
}

impl RuleStats {
    pub fn new(rule_name: String) -> Self {
        Self {
            rule_name,
            ..Default::default()
        }
    }

    pub fn change_rate(&self) -> f64 {
        if self.applications == 0 {
            0.0
        } else {
            (self.changes as f64) / (self.applications as f64)
        }
    }

    pub fn average_time(&self) -> Duration {
        if self.applications == 0 {
            Duration::ZERO
        } else {
            self.total_time.div_f64(self.applications as f64)
        }
    }
}
