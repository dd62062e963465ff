/*!
# End-to-End Rewriting Scenarios

Whole-tree runs of the engine with catalogue rules.
*/

use pretty_assertions::assert_eq;

use recast_core::ast::build::*;
use recast_core::ast::{Modifiers, SyntaxTree, ToSource};
use recast_core::engine::{Engine, Outcome, Rule, RuleContext};
use recast_core::rules::{catalogue, ReturnTypeFromStrictNewArray};
use recast_core::{LanguageVersion, RecastConfig, VisibilityManipulator};

fn values_function(body_prefix: Vec<recast_core::Node>) -> SyntaxTree {
    let mut body = vec![assign_stmt("values", empty_array())];
    body.extend(body_prefix);
    body.push(ret(variable("values")));
    SyntaxTree::new(program(vec![function("values", body)]))
}

#[test]
fn test_new_array_function_gains_return_type() -> anyhow::Result<()> {
    let mut tree = values_function(vec![]);
    let mut engine = Engine::new();
    engine.add_rule(ReturnTypeFromStrictNewArray);

    let first = engine.run_pass(&mut tree, 1)?;
    assert!(first.is_dirty());
    assert_eq!(first.mutations, 1);
    assert_eq!(tree.get(&[0]).unwrap().return_type(), Some("array"));

    let second = engine.run_pass(&mut tree, 2)?;
    assert!(!second.is_dirty());
    let rule_again =
        ReturnTypeFromStrictNewArray.apply(tree.get(&[0]).unwrap(), &RuleContext::detached())?;
    assert_eq!(rule_again, Outcome::Unchanged);
    Ok(())
}

#[test]
fn test_computed_reassignment_keeps_function_untouched() -> anyhow::Result<()> {
    let mut tree = values_function(vec![assign_stmt("values", call("computeSomething", vec![]))]);
    let before = tree.clone();

    let mut engine = Engine::new();
    engine.add_rule(ReturnTypeFromStrictNewArray);
    let summary = engine.run(&mut tree)?;

    assert!(!summary.changed());
    assert_eq!(tree, before);
    Ok(())
}

#[test]
fn test_declared_return_type_is_unchanged_immediately() -> anyhow::Result<()> {
    let function = function_returning(
        "values",
        "array",
        vec![assign_stmt("values", empty_array()), ret(variable("values"))],
    );
    let outcome = ReturnTypeFromStrictNewArray.apply(&function, &RuleContext::detached())?;
    assert_eq!(outcome, Outcome::Unchanged);
    Ok(())
}

#[test]
fn test_removing_absent_visibility_is_a_no_op() -> anyhow::Result<()> {
    let mut node = property("value", Modifiers::empty());
    let before = node.clone();
    VisibilityManipulator::remove_visibility(&mut node)?;
    assert_eq!(node, before);
    Ok(())
}

#[test]
fn test_catalogue_rewrites_a_class() -> anyhow::Result<()> {
    let mut tree = SyntaxTree::new(program(vec![class(
        "SomeClass",
        Modifiers::FINAL,
        vec![
            property("cache", Modifiers::PROTECTED),
            property("items", Modifiers::empty()),
            method(
                "run",
                Modifiers::empty(),
                vec![assign_stmt("values", empty_array()), ret(variable("values"))],
            ),
        ],
    )]));

    let rules = catalogue::build(&RecastConfig::default())?;
    let mut engine = Engine::new();
    for rule in rules {
        engine.register(rule);
    }
    let summary = engine.run(&mut tree)?;

    assert_eq!(summary.passes, 2);
    assert_eq!(summary.mutations, 4);
    assert_eq!(
        tree.to_source(),
        "<?php\n\
         \n\
         final class SomeClass\n\
         {\n\
         \x20   private $cache;\n\
         \n\
         \x20   public $items;\n\
         \n\
         \x20   public function run(): array\n\
         \x20   {\n\
         \x20       $values = [];\n\
         \x20       return $values;\n\
         \x20   }\n\
         }\n"
    );
    Ok(())
}

#[test]
fn test_old_target_gates_return_type_rule() -> anyhow::Result<()> {
    let mut tree = values_function(vec![]);
    let config = RecastConfig {
        target_version: LanguageVersion::new(5, 6),
        ..Default::default()
    };

    let mut engine = Engine::new();
    for rule in catalogue::build(&config)? {
        engine.register(rule);
    }
    let summary = engine.run(&mut tree)?;

    assert_eq!(summary.passes, 1);
    assert_eq!(tree.get(&[0]).unwrap().return_type(), None);
    Ok(())
}
