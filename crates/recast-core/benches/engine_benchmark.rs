use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use recast_core::ast::build::*;
use recast_core::ast::{Modifiers, Node, SyntaxTree};
use recast_core::engine::Engine;
use recast_core::rules::catalogue;
use recast_core::LanguageVersion;

/// A final class with `methods` array-building methods and as many
/// protected properties
fn synthetic_class(methods: usize) -> Node {
    let mut members = Vec::with_capacity(methods * 2);
    for index in 0..methods {
        members.push(property(&format!("field{index}"), Modifiers::PROTECTED));
        members.push(method(
            &format!("values{index}"),
            Modifiers::empty(),
            vec![
                assign_stmt("values", empty_array()),
                foreach(
                    variable("items"),
                    variable("item"),
                    vec![assign_stmt("values", array(vec![variable("item")]))],
                ),
                ret(variable("values")),
            ],
        ));
    }
    program(vec![class("Generated", Modifiers::FINAL, members)])
}

fn bench_catalogue(c: &mut Criterion) {
    let mut group = c.benchmark_group("catalogue");

    for methods in [10, 100, 1000] {
        let tree = SyntaxTree::new(synthetic_class(methods));
        group.bench_with_input(BenchmarkId::new("converge", methods), &tree, |b, tree| {
            b.iter(|| {
                let mut tree = tree.clone();
                let mut engine = Engine::new();
                for rule in catalogue::all_rules(LanguageVersion::PHP_80) {
                    engine.register(rule);
                }
                black_box(engine.run(&mut tree).unwrap())
            })
        });
    }

    group.finish();
}

fn bench_clean_pass(c: &mut Criterion) {
    let mut tree = SyntaxTree::new(synthetic_class(1000));
    let mut engine = Engine::new();
    for rule in catalogue::all_rules(LanguageVersion::PHP_80) {
        engine.register(rule);
    }
    engine.run(&mut tree).unwrap();

    c.bench_function("clean_pass_1000_methods", |b| {
        b.iter(|| black_box(engine.run_pass(&mut tree, 1).unwrap()))
    });
}

criterion_group!(benches, bench_catalogue, bench_clean_pass);
criterion_main!(benches);
