//! Name resolution and comparison shared by all rules.
//!
//! PHP binds variables, properties and constants case-sensitively, while
//! function, method and class names are case-insensitive. Rules compare names
//! through [`NameResolver::are_names_equal`] so they all follow the same policy.

use std::borrow::Cow;

use crate::ast::{Node, NodeKind};

pub struct NameResolver;

impl NameResolver {
    /// Canonical name of a name-bearing node
    pub fn resolve(node: &Node) -> Option<Cow<'_, str>> {
        let name = node.name()?;
        if Self::is_case_insensitive(node.kind()) {
            Some(Cow::Owned(name.to_ascii_lowercase()))
        } else {
            Some(Cow::Borrowed(name))
        }
    }

    pub fn are_names_equal(a: &Node, b: &Node) -> bool {
        match (Self::resolve(a), Self::resolve(b)) {
            (Some(left), Some(right)) => left == right,
            _ => false,
        }
    }

    /// Compares a node's canonical name with a plain name
    pub fn is_name(node: &Node, name: &str) -> bool {
        match Self::resolve(node) {
            Some(resolved) if Self::is_case_insensitive(node.kind()) => {
                resolved.eq_ignore_ascii_case(name)
            }
            Some(resolved) => resolved == name,
            None => false,
        }
    }

    fn is_case_insensitive(kind: NodeKind) -> bool {
        matches!(
            kind,
            NodeKind::Class | NodeKind::Method | NodeKind::Function | NodeKind::Call
        )
    }
}
