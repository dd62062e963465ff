/*!
# Batch Runner Integration Tests

Rewrites tree documents on disk, including units that fail.
*/

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use recast_core::ast::build::*;
use recast_core::ast::{KindSet, Modifiers, Node, SyntaxTree};
use recast_core::engine::{FnRule, Outcome, Rule, RuleContext};
use recast_core::rules::ReturnTypeFromStrictNewArray;
use recast_core::{
    BatchRunner, FailureKind, OutputFormat, RecastConfig, RewriteError, VisibilityManipulator,
};

fn array_builder() -> Node {
    program(vec![function(
        "values",
        vec![assign_stmt("values", empty_array()), ret(variable("values"))],
    )])
}

fn untyped_noop() -> Node {
    program(vec![stmt(call("noop", vec![]))])
}

fn private_property() -> Node {
    program(vec![class(
        "Box",
        Modifiers::empty(),
        vec![property("value", Modifiers::PRIVATE)],
    )])
}

fn write_tree(path: &Path, root: Node) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, SyntaxTree::new(root).to_json()?)?;
    Ok(())
}

fn read_tree(path: &Path) -> anyhow::Result<SyntaxTree> {
    Ok(SyntaxTree::from_json(&fs::read_to_string(path)?)?)
}

fn array_rule_only() -> Vec<Arc<dyn Rule>> {
    vec![Arc::new(ReturnTypeFromStrictNewArray)]
}

/// Flips property visibility back and forth forever
fn oscillating_rules() -> Vec<Arc<dyn Rule>> {
    let flip = |from: Modifiers, to: Modifiers| {
        move |node: &Node, _: &RuleContext<'_>| -> recast_core::Result<Outcome> {
            if !node.modifiers().is_some_and(|flags| flags.contains(from)) {
                return Ok(Outcome::Unchanged);
            }
            let mut node = node.clone();
            VisibilityManipulator::change_visibility(&mut node, to)?;
            Ok(Outcome::Replace(node))
        }
    };
    vec![
        Arc::new(FnRule::new(
            "publicize",
            KindSet::PROPERTY,
            flip(Modifiers::PRIVATE, Modifiers::PUBLIC),
        )),
        Arc::new(FnRule::new(
            "privatize",
            KindSet::PROPERTY,
            flip(Modifiers::PUBLIC, Modifiers::PRIVATE),
        )),
    ]
}

#[test]
fn test_directory_is_mirrored_into_output_dir() -> anyhow::Result<()> {
    let input = tempfile::tempdir()?;
    let output = tempfile::tempdir()?;
    write_tree(&input.path().join("a/values.json"), array_builder())?;
    write_tree(&input.path().join("b/nested/noop.json"), untyped_noop())?;
    fs::write(input.path().join("notes.txt"), "not a tree")?;

    let config = RecastConfig {
        output_dir: Some(output.path().to_path_buf()),
        ..Default::default()
    };
    let runner = BatchRunner::new(config, array_rule_only());
    let summary = runner.run(&[input.path().to_path_buf()])?;

    assert_eq!(summary.units, 2);
    assert_eq!(summary.changed, 1);
    assert_eq!(summary.unchanged, 1);
    assert!(summary.success());
    assert_eq!(summary.reports[0].path, input.path().join("a/values.json"));

    let rewritten = read_tree(&output.path().join("a/values.json"))?;
    assert_eq!(rewritten.get(&[0]).unwrap().return_type(), Some("array"));
    assert!(output.path().join("b/nested/noop.json").exists());
    assert!(!output.path().join("notes.txt").exists());

    // the input is left alone
    let original = read_tree(&input.path().join("a/values.json"))?;
    assert_eq!(original.get(&[0]).unwrap().return_type(), None);
    Ok(())
}

#[test]
fn test_non_converging_unit_does_not_abort_batch() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    write_tree(&dir.path().join("good.json"), array_builder())?;
    write_tree(&dir.path().join("loop.json"), private_property())?;
    let loop_before = fs::read_to_string(dir.path().join("loop.json"))?;

    let mut rules = array_rule_only();
    rules.extend(oscillating_rules());
    let config = RecastConfig {
        max_passes: 3,
        ..Default::default()
    };
    let summary = BatchRunner::new(config, rules).run(&[dir.path().to_path_buf()])?;

    assert_eq!(summary.units, 2);
    assert_eq!(summary.changed, 1);
    assert_eq!(summary.failures.len(), 1);
    let failure = &summary.failures[0];
    assert_eq!(failure.path, dir.path().join("loop.json"));
    assert_eq!(failure.kind, FailureKind::NonConvergence);
    assert!(failure.message.contains("3 passes"));

    // the partially rewritten tree is never written
    assert_eq!(fs::read_to_string(dir.path().join("loop.json"))?, loop_before);
    let good = read_tree(&dir.path().join("good.json"))?;
    assert_eq!(good.get(&[0]).unwrap().return_type(), Some("array"));
    Ok(())
}

#[test]
fn test_malformed_unit_is_reported() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("broken.json"), "{ \"data\": ")?;
    write_tree(&dir.path().join("values.json"), array_builder())?;

    let summary = BatchRunner::new(RecastConfig::default(), array_rule_only())
        .run(&[dir.path().to_path_buf()])?;

    assert_eq!(summary.units, 2);
    assert_eq!(summary.changed, 1);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].kind, FailureKind::Parse);
    assert!(summary.failures[0].message.contains("broken.json"));
    Ok(())
}

#[test]
fn test_dry_run_writes_nothing() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("values.json");
    write_tree(&path, array_builder())?;
    let before = fs::read_to_string(&path)?;

    let config = RecastConfig {
        dry_run: true,
        output_format: OutputFormat::Source,
        ..Default::default()
    };
    let summary = BatchRunner::new(config, array_rule_only()).run(&[path.clone()])?;

    assert_eq!(summary.changed, 1);
    assert_eq!(summary.reports[0].written, None);
    assert_eq!(fs::read_to_string(&path)?, before);
    assert!(!dir.path().join("values.php").exists());
    Ok(())
}

#[test]
fn test_source_output_is_printed_php() -> anyhow::Result<()> {
    let input = tempfile::tempdir()?;
    let output = tempfile::tempdir()?;
    write_tree(&input.path().join("lib/values.json"), array_builder())?;

    let config = RecastConfig {
        output_format: OutputFormat::Source,
        output_dir: Some(output.path().to_path_buf()),
        ..Default::default()
    };
    let summary = BatchRunner::new(config, array_rule_only()).run(&[input.path().to_path_buf()])?;

    let printed = output.path().join("lib/values.php");
    assert_eq!(summary.reports[0].written.as_deref(), Some(printed.as_path()));
    let source = fs::read_to_string(printed)?;
    assert!(source.starts_with("<?php"));
    assert!(source.contains("function values(): array"));
    Ok(())
}

#[test]
fn test_unchanged_unit_is_not_rewritten_in_place() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("noop.json");
    // no ids in the document; a rewrite would add them
    fs::write(&path, r#"{ "data": { "Program": { "stmts": [] } } }"#)?;

    let summary = BatchRunner::new(RecastConfig::default(), array_rule_only()).run(&[path.clone()])?;

    assert_eq!(summary.unchanged, 1);
    assert_eq!(summary.reports[0].written, None);
    assert_eq!(
        fs::read_to_string(&path)?,
        r#"{ "data": { "Program": { "stmts": [] } } }"#
    );
    Ok(())
}

#[test]
fn test_parallel_and_sequential_runs_agree() -> anyhow::Result<()> {
    let mut results = Vec::new();
    for parallel in [true, false] {
        let dir = tempfile::tempdir()?;
        for index in 0..8 {
            let root = if index % 2 == 0 { array_builder() } else { untyped_noop() };
            write_tree(&dir.path().join(format!("unit_{index}.json")), root)?;
        }
        let config = RecastConfig {
            parallel,
            dry_run: true,
            ..Default::default()
        };
        let summary = BatchRunner::new(config, array_rule_only()).run(&[dir.path().to_path_buf()])?;
        let names: Vec<String> = summary
            .reports
            .iter()
            .map(|report| report.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        results.push((summary.units, summary.changed, summary.passes, names));
    }

    assert_eq!(results[0], results[1]);
    assert_eq!(results[0].1, 4);
    assert_eq!(results[0].3[0], "unit_0.json");
    Ok(())
}

#[test]
fn test_missing_input_fails_the_run() {
    let runner = BatchRunner::new(RecastConfig::default(), array_rule_only());
    let result = runner.run(&[PathBuf::from("/definitely/not/here")]);
    assert!(matches!(result, Err(RewriteError::Config(_))));
}

#[test]
fn test_runner_from_config_uses_catalogue() -> anyhow::Result<()> {
    let config = RecastConfig {
        rules: vec!["privatize_final_class_property".to_string()],
        ..Default::default()
    };
    let runner = BatchRunner::from_config(config)?;
    let names: Vec<&str> = runner.rules().iter().map(|rule| rule.name()).collect();
    assert_eq!(names, vec!["privatize_final_class_property"]);
    Ok(())
}

#[test]
fn test_colliding_destinations_fail_the_run() -> anyhow::Result<()> {
    let input = tempfile::tempdir()?;
    let output = tempfile::tempdir()?;
    let first = input.path().join("a/units.json");
    let second = input.path().join("b/units.json");
    write_tree(&first, array_builder())?;
    write_tree(&second, untyped_noop())?;

    let config = RecastConfig {
        output_dir: Some(output.path().to_path_buf()),
        ..Default::default()
    };
    let runner = BatchRunner::new(config, array_rule_only());
    match runner.run(&[first.clone(), second.clone()]) {
        Err(RewriteError::Config(message)) => assert!(message.contains("units.json")),
        other => panic!("Expected a configuration error, got {:?}", other),
    }
    assert_eq!(fs::read_dir(output.path())?.count(), 0);

    // mirroring the common parent keeps them apart
    let summary = runner.run(&[input.path().to_path_buf()])?;
    assert_eq!(summary.units, 2);
    assert!(output.path().join("a/units.json").exists());
    assert!(output.path().join("b/units.json").exists());
    Ok(())
}
