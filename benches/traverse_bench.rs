//! Traversal benchmarks.
//!
//! Measures path materialization, scope crawling and member-chain matching
//! over synthesized programs of increasing size.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use estrav::prelude::*;
use estrav::traverse::Result;

/// A module with one import and `count` statements of the form
/// `const vN = React.createElement("div", vN-1);`, every tenth one wrapped
/// in a function.
fn synthesize(count: usize) -> (NodeArena, NodeIndex) {
    let mut arena = NodeArena::new();
    let default = arena.import_default_specifier("React");
    let import = arena.import_declaration(vec![default], "react");
    let mut body = vec![import];

    for i in 0..count {
        let callee = arena.member_chain("React.createElement");
        let tag = arena.string_literal("div");
        let mut arguments = vec![tag];
        if i > 0 {
            arguments.push(arena.identifier(&format!("v{}", i - 1)));
        }
        let call = arena.call(callee, arguments);
        let decl = arena.var(VariableKind::Const, &format!("v{i}"), call);
        if i % 10 == 0 {
            body.push(arena.function_declaration(&format!("f{i}"), &["props"], vec![decl]));
        } else {
            body.push(decl);
        }
    }
    let program = arena.program(body, SourceType::Module);
    (arena, program)
}

struct CountCreateElement {
    matched: usize,
}

impl Visitor for CountCreateElement {
    fn enter(&mut self, state: &mut TraverseState, path: PathId) -> Result<VisitResult> {
        if state.is_node_type(path, NodeType::MemberExpression)
            && state.matches_pattern(path, "React.createElement", false)?
        {
            self.matched += 1;
        }
        Ok(VisitResult::Continue)
    }
}

fn bench_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("walk");
    for size in [100, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::new("match_pattern", size), &size, |b, &size| {
            b.iter_batched(
                || {
                    let (arena, program) = synthesize(size);
                    TraverseState::new(arena, program).unwrap()
                },
                |mut state| {
                    let mut visitor = CountCreateElement { matched: 0 };
                    traverse(&mut state, &mut visitor).unwrap();
                    black_box(visitor.matched)
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_crawl(c: &mut Criterion) {
    let mut group = c.benchmark_group("crawl");
    for size in [100, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::new("program", size), &size, |b, &size| {
            b.iter_batched(
                || {
                    let (arena, program) = synthesize(size);
                    TraverseState::new(arena, program).unwrap()
                },
                |mut state| {
                    state.crawl_program().unwrap();
                    black_box(state.path_count())
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_references_import(c: &mut Criterion) {
    let (arena, program) = synthesize(1_000);
    let mut state = TraverseState::new(arena, program).unwrap();
    let object = state
        .get(ROOT_PATH, "body.500.declarations.0.init.callee.object")
        .unwrap()
        .unwrap();
    // Crawl once outside the measurement.
    state.crawl_program().unwrap();

    c.bench_function("references_import/cached", |b| {
        b.iter(|| {
            black_box(
                state
                    .references_import(black_box(object), "react", Some("default"))
                    .unwrap(),
            )
        });
    });
}

criterion_group!(benches, bench_walk, bench_crawl, bench_references_import);
criterion_main!(benches);
