//! Assembles the rule set for a run.
//!
//! Catalogue order is invocation order:
//! 1. `explicit_public_visibility`
//! 2. `privatize_final_class_property`
//! 3. `return_type_from_strict_new_array`

use std::sync::Arc;

use tracing::debug;

use crate::ast::{KindSet, Node};
use crate::config::{LanguageVersion, RecastConfig};
use crate::engine::{Outcome, Rule, RuleContext, RuleDefinition};
use crate::{Result, RewriteError};

use super::{ExplicitPublicVisibility, PrivatizeFinalClassProperty, ReturnTypeFromStrictNewArray};

/// Turns a rule off when the target version is below its minimum.
///
/// The engine never looks at versions; a gated-off rule is still registered
/// and simply never changes anything.
pub struct VersionGate {
    inner: Arc<dyn Rule>,
    active: bool,
}

impl VersionGate {
    pub fn new(inner: Arc<dyn Rule>, target: LanguageVersion) -> Self {
        let active = inner.min_version().map_or(true, |min| target >= min);
        Self { inner, active }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Rule for VersionGate {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn definition(&self) -> RuleDefinition {
        self.inner.definition()
    }

    fn applicable_kinds(&self) -> KindSet {
        self.inner.applicable_kinds()
    }

    fn min_version(&self) -> Option<LanguageVersion> {
        self.inner.min_version()
    }

    fn apply(&self, node: &Node, ctx: &RuleContext<'_>) -> Result<Outcome> {
        if !self.active {
            return Ok(Outcome::Unchanged);
        }
        self.inner.apply(node, ctx)
    }
}

/// Every known rule, configured for `target`, in catalogue order
pub fn all_rules(target: LanguageVersion) -> Vec<Arc<dyn Rule>> {
    vec![
        Arc::new(ExplicitPublicVisibility::new(target)),
        Arc::new(PrivatizeFinalClassProperty),
        Arc::new(ReturnTypeFromStrictNewArray),
    ]
}

/// Rule set for a run: the catalogue, narrowed to `config.rules` when that is
/// not empty, each rule gated on `config.target_version`
pub fn build(config: &RecastConfig) -> Result<Vec<Arc<dyn Rule>>> {
    let target = config.target_version;
    let catalogue = all_rules(target);

    if let Some(unknown) = config
        .rules
        .iter()
        .find(|name| !catalogue.iter().any(|rule| rule.name() == name.as_str()))
    {
        let known: Vec<&str> = catalogue.iter().map(|rule| rule.name()).collect();
        return Err(RewriteError::Config(format!(
            "unknown rule {unknown:?}, known rules: {}",
            known.join(", ")
        )));
    }

    let rules = catalogue
        .into_iter()
        .filter(|rule| config.rules.is_empty() || config.rules.iter().any(|name| name == rule.name()))
        .map(|rule| {
            let gate = VersionGate::new(rule, target);
            if !gate.is_active() {
                debug!(rule = gate.name(), target = %target, "rule inactive for target version");
            }
            Arc::new(gate) as Arc<dyn Rule>
        })
        .collect();
    Ok(rules)
}
