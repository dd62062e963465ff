// Tests for scope-bounded node search

use pretty_assertions::assert_eq;

use super::*;
use crate::ast::build::*;
use crate::ast::{NodeKind, SyntaxTree};

fn function_with_nested_closure() -> Node {
    function(
        "outer",
        vec![
            assign_stmt("items", empty_array()),
            stmt(assign(
                variable("mapper"),
                closure(&[], vec![assign_stmt("items", int(1)), ret(variable("items"))]),
            )),
            if_else(
                variable("flag"),
                vec![ret(variable("items"))],
                Some(vec![ret(null())]),
            ),
        ],
    )
}

#[test]
fn test_return_inside_nested_closure_is_excluded() {
    let root = function_with_nested_closure();
    let returns: Vec<&Node> = NodeFinder::find_scoped(&root, KindSet::RETURN).collect();
    assert_eq!(returns.len(), 2);
    for ret in returns {
        let inner = ret.children()[0];
        assert_ne!(inner.kind(), NodeKind::Closure);
    }
}

#[test]
fn test_unscoped_search_crosses_nested_closure() {
    let root = function_with_nested_closure();
    assert_eq!(NodeFinder::find_unscoped(&root, KindSet::RETURN).count(), 3);
    assert_eq!(NodeFinder::find_unscoped(&root, KindSet::ASSIGN).count(), 3);
    assert_eq!(NodeFinder::find_scoped(&root, KindSet::ASSIGN).count(), 2);
}

#[test]
fn test_nested_function_like_node_itself_is_yielded() {
    let root = function_with_nested_closure();
    let closures: Vec<&Node> = NodeFinder::find_scoped(&root, KindSet::FUNCTION_LIKE).collect();
    assert_eq!(closures.len(), 1);
    assert_eq!(closures[0].kind(), NodeKind::Closure);
}

#[test]
fn test_results_follow_pre_order() {
    let tree = SyntaxTree::new(function_with_nested_closure());
    let ids: Vec<u32> = NodeFinder::find_scoped(tree.root(), KindSet::VARIABLE)
        .map(|node| node.id.0)
        .collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    // ids are assigned in pre-order, so pre-order results come out sorted
    assert_eq!(ids, sorted);

    let names: Vec<&str> = NodeFinder::find_scoped(tree.root(), KindSet::VARIABLE)
        .filter_map(Node::name)
        .collect();
    assert_eq!(names, vec!["items", "mapper", "flag", "items"]);
}

#[test]
fn test_root_is_not_yielded() {
    let root = function("f", vec![ret_void()]);
    assert!(!NodeFinder::has_scoped(&root, KindSet::FUNCTION));
    assert!(NodeFinder::has_scoped(&root, KindSet::RETURN));
}

#[test]
fn test_search_is_restartable() {
    let root = function_with_nested_closure();
    let search = NodeFinder::find_scoped(&root, KindSet::RETURN);
    let first: Vec<_> = search.clone().collect();
    let second: Vec<_> = search.collect();
    assert_eq!(first, second);
    assert_eq!(
        NodeFinder::find_first_scoped(&root, KindSet::RETURN),
        first.first().copied()
    );
}

#[test]
fn test_yield_in_closure_does_not_count() {
    let root = method(
        "run",
        crate::ast::Modifiers::PUBLIC,
        vec![stmt(closure(&[], vec![stmt(yield_value(int(1)))]))],
    );
    assert!(!NodeFinder::has_scoped(&root, KindSet::YIELD));
    assert!(NodeFinder::find_unscoped(&root, KindSet::YIELD).next().is_some());
}
