/*!
# Fixed-Point Engine

Drives registered rules over one tree until a full pass changes nothing.

Each pass walks the tree in pre-order (parent before children, children in
source order). Every visited node is offered to each rule whose kind set
contains the node's kind, in registration order; a mutation is applied
immediately, so the next rule and the rest of the pass see the new shape.
The walk continues into a replacement's children. Passes repeat until one is
clean or the pass budget runs out.
*/

use std::sync::Arc;
use std::time::Instant;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::ast::{KindSet, Node, NodeId, SyntaxTree};
use crate::config::DEFAULT_MAX_PASSES;
use crate::{Result, RewriteError};

use super::rule::{Outcome, Rule, RuleContext, RuleStats};

/// A rule together with the kind set it declared at registration
pub struct Registration {
    pub kinds: KindSet,
    pub rule: Arc<dyn Rule>,
}

/// State of the pass in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassState {
    Scanning,
    /// At least one mutation was applied
    Dirty,
    /// The pass finished without a mutation
    Clean,
}

impl PassState {
    fn finish(self) -> PassState {
        match self {
            PassState::Dirty => PassState::Dirty,
            PassState::Scanning | PassState::Clean => PassState::Clean,
        }
    }
}

/// Outcome of one traversal pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassReport {
    pub pass: usize,
    pub state: PassState,
    pub mutations: usize,
    pub removals: usize,
}

impl PassReport {
    fn new(pass: usize) -> Self {
        Self {
            pass,
            state: PassState::Scanning,
            mutations: 0,
            removals: 0,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.state == PassState::Dirty
    }
}

/// Totals of a converged run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub passes: usize,
    pub mutations: usize,
    pub removals: usize,
}

impl RunSummary {
    pub fn changed(&self) -> bool {
        self.mutations + self.removals > 0
    }

    fn record(&mut self, report: &PassReport) {
        self.passes = report.pass;
        self.mutations += report.mutations;
        self.removals += report.removals;
    }
}

/// Fixed-point rewriting engine for a single tree
///
/// The budget counts every pass, including the clean pass that confirms
/// convergence.
pub struct Engine {
    registrations: Vec<Registration>,
    stats: IndexMap<&'static str, RuleStats>,
    max_passes: usize,
    unit: Option<String>,
}

impl Engine {
    pub fn new() -> Self {
        Self {
            registrations: Vec::new(),
            stats: IndexMap::new(),
            max_passes: DEFAULT_MAX_PASSES,
            unit: None,
        }
    }

    /// Set the pass budget. A budget of zero is raised to one: the engine
    /// always runs at least one pass.
    pub fn max_passes(mut self, max: usize) -> Self {
        self.max_passes = max.max(1);
        self
    }

    /// Name the unit being rewritten; rules see it in their context
    pub fn for_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Register a rule; it is invoked after all rules registered before it
    pub fn register(&mut self, rule: Arc<dyn Rule>) {
        let kinds = rule.applicable_kinds();
        self.stats
            .entry(rule.name())
            .or_insert_with(|| RuleStats::new(rule.name().to_string()));
        self.registrations.push(Registration { kinds, rule });
    }

    pub fn add_rule<R: Rule + 'static>(&mut self, rule: R) {
        self.register(Arc::new(rule));
    }

    pub fn registrations(&self) -> &[Registration] {
        &self.registrations
    }

    /// Rewrite `tree` until a pass applies no mutation.
    ///
    /// Fails with [`RewriteError::NonConvergence`] when the budget is spent
    /// on dirty passes; the tree is then partially rewritten and must not be
    /// used as output.
    pub fn run(&mut self, tree: &mut SyntaxTree) -> Result<RunSummary> {
        self.clear_stats();
        let mut summary = RunSummary::default();
        let mut pass = 0;

        loop {
            pass += 1;
            let report = self.run_pass(tree, pass)?;
            summary.record(&report);
            trace!(
                pass,
                mutations = report.mutations,
                removals = report.removals,
                state = ?report.state,
                "pass finished"
            );

            if !report.is_dirty() {
                debug!(
                    unit = self.unit.as_deref().unwrap_or("<anonymous>"),
                    passes = summary.passes,
                    mutations = summary.mutations,
                    "converged"
                );
                return Ok(summary);
            }
            if pass >= self.max_passes {
                return Err(RewriteError::NonConvergence {
                    budget: self.max_passes,
                });
            }
        }
    }

    /// Run a single traversal pass over `tree`
    pub fn run_pass(&mut self, tree: &mut SyntaxTree, pass: usize) -> Result<PassReport> {
        let mut report = PassReport::new(pass);
        let mut cursor: Vec<usize> = Vec::new();

        loop {
            let removed = self.visit(tree, &cursor, &mut report)?;

            if removed {
                // the next sibling, if any, now occupies the same index
                if tree.get(&cursor).is_some() {
                    continue;
                }
                cursor.pop();
            } else if tree
                .get(&cursor)
                .is_some_and(|node| node.child(0).is_some())
            {
                cursor.push(0);
                continue;
            }

            if !advance(tree, &mut cursor) {
                break;
            }
        }

        report.state = report.state.finish();
        Ok(report)
    }

    /// Offer the node at `path` to every matching rule. Returns true when a
    /// rule removed it.
    ///
    /// The node and its ancestors are resolved once and shared by the rules
    /// that leave it unchanged; they are resolved again only after a mutation.
    fn visit(
        &mut self,
        tree: &mut SyntaxTree,
        path: &[usize],
        report: &mut PassReport,
    ) -> Result<bool> {
        let mut next = 0;

        while next < self.registrations.len() {
            let (index, kind, outcome, started) = {
                let Some((node, ancestors)) = tree.get_with_ancestors(path) else {
                    return Ok(false);
                };
                let kind = node.kind();
                let ctx = RuleContext::new(ancestors, report.pass, self.unit.as_deref());

                let mut mutation = None;
                for (index, registration) in self.registrations.iter().enumerate().skip(next) {
                    if !registration.kinds.contains_kind(kind) {
                        continue;
                    }
                    let started = Instant::now();
                    let name = registration.rule.name();
                    let outcome = registration.rule.apply(node, &ctx);

                    let stats = self
                        .stats
                        .entry(name)
                        .or_insert_with(|| RuleStats::new(name.to_string()));
                    stats.applications += 1;
                    match outcome {
                        Ok(Outcome::Unchanged) => stats.total_time += started.elapsed(),
                        Ok(outcome) => {
                            mutation = Some((index, outcome, started));
                            break;
                        }
                        Err(e) => {
                            stats.errors += 1;
                            return Err(e);
                        }
                    }
                }

                let Some((index, outcome, started)) = mutation else {
                    return Ok(false);
                };
                (index, kind, outcome, started)
            };

            let name = self.registrations[index].rule.name();
            let stats = self
                .stats
                .entry(name)
                .or_insert_with(|| RuleStats::new(name.to_string()));

            match outcome {
                Outcome::Unchanged => {}
                Outcome::Replace(mut replacement) => {
                    let Some(slot) = tree.get_mut(path) else {
                        return Ok(false);
                    };
                    if slot.structurally_eq(&replacement) {
                        trace!(rule = name, node = %slot.id, "replacement identical to node");
                    } else {
                        replacement.id = slot.id;
                        replacement.span = slot.span;
                        release_id(&mut replacement, slot.id);
                        debug!(
                            rule = name,
                            kind = %kind,
                            node = %slot.id,
                            pass = report.pass,
                            "replaced node"
                        );
                        *slot = replacement;
                        tree.assign_ids(path);
                        stats.changes += 1;
                        report.mutations += 1;
                        report.state = PassState::Dirty;
                    }
                }
                Outcome::Remove => {
                    if !remove_node(tree, path) {
                        stats.errors += 1;
                        return Err(RewriteError::InvalidRemoval { rule: name, kind });
                    }
                    debug!(rule = name, kind = %kind, pass = report.pass, "removed node");
                    stats.changes += 1;
                    stats.total_time += started.elapsed();
                    report.removals += 1;
                    report.state = PassState::Dirty;
                    return Ok(true);
                }
            }

            stats.total_time += started.elapsed();
            next = index + 1;
        }

        Ok(false)
    }

    /// Per-rule statistics of the last run, in registration order
    pub fn stats(&self) -> &IndexMap<&'static str, RuleStats> {
        &self.stats
    }

    pub fn clear_stats(&mut self) {
        for stats in self.stats.values_mut() {
            *stats = RuleStats::new(stats.rule_name.clone());
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// Unassigns descendants of `node` that carry `id`, so a replacement that
/// wraps the node it replaces does not end up with two nodes sharing one id
fn release_id(node: &mut Node, id: NodeId) {
    let mut stack = node.children_mut();
    while let Some(child) = stack.pop() {
        if child.id == id {
            child.id = NodeId::UNASSIGNED;
        }
        stack.extend(child.children_mut());
    }
}

fn remove_node(tree: &mut SyntaxTree, path: &[usize]) -> bool {
    !path.is_empty() && tree.remove(path).is_some()
}

/// Move `cursor` to the next node in pre-order that is not below it.
/// Returns false when the walk is complete.
fn advance(tree: &SyntaxTree, cursor: &mut Vec<usize>) -> bool {
    while let Some(index) = cursor.pop() {
        cursor.push(index + 1);
        if tree.get(cursor).is_some() {
            return true;
        }
        cursor.pop();
    }
    false
}
