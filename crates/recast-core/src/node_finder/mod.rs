/*!
# Scoped Node Finder

Answers "does X occur in this function's body" without matching occurrences
inside a nested closure or function that has its own variable scope.

The search walks the subtree below the root in pre-order (parent before
children, children in source order). A nested function-like node is still
yielded when its kind is requested, but its body is opaque unless the caller
asks for an unscoped search. The root itself is never yielded.
*/

use crate::ast::{KindSet, Node};

#[cfg(test)]
mod finder_tests;

/// Whether a search descends into nested function-like nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Stop at nested function, method and closure bodies
    Local,
    /// Walk the whole subtree
    Crossing,
}

/// Entry points for scope-bounded searches
pub struct NodeFinder;

impl NodeFinder {
    /// All nodes of `kinds` in the local scope of `root`
    pub fn find_scoped(root: &Node, kinds: KindSet) -> ScopedNodes<'_> {
        ScopedNodes::new(root, kinds, Scope::Local)
    }

    /// All nodes of `kinds` anywhere below `root`
    pub fn find_unscoped(root: &Node, kinds: KindSet) -> ScopedNodes<'_> {
        ScopedNodes::new(root, kinds, Scope::Crossing)
    }

    pub fn find_first_scoped(root: &Node, kinds: KindSet) -> Option<&Node> {
        Self::find_scoped(root, kinds).next()
    }

    pub fn has_scoped(root: &Node, kinds: KindSet) -> bool {
        Self::find_first_scoped(root, kinds).is_some()
    }
}

/// Lazy pre-order search; each call to the finder starts a fresh traversal
#[derive(Debug, Clone)]
pub struct ScopedNodes<'a> {
    stack: Vec<&'a Node>,
    kinds: KindSet,
    scope: Scope,
}

impl<'a> ScopedNodes<'a> {
    pub fn new(root: &'a Node, kinds: KindSet, scope: Scope) -> Self {
        let mut stack = root.children();
        stack.reverse();
        Self { stack, kinds, scope }
    }
}

impl<'a> Iterator for ScopedNodes<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            if self.scope == Scope::Crossing || !node.is_function_like() {
                let mut children = node.children();
                children.reverse();
                self.stack.extend(children);
            }
            if self.kinds.contains_kind(node.kind()) {
                return Some(node);
            }
        }
        None
    }
}
