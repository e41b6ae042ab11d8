//! Parse, match and evaluate benchmarks for path specs.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use shiftpath::path::{
    Matchable, MatchedElement, ParsedPath, PathElement, Role, WalkedPath,
};
use std::hint::black_box;

const LHS_PATTERNS: [&str; 4] =
    ["rating", "rating-*", "tuna-*-marlin-*", "a*b*c*d*e"];

const RHS_PATHS: [&str; 3] = [
    "SecondaryRatings.&1.Value",
    "tuna[&(1,1)].marlin[&(1,2)].&(0,1)",
    "photos-&(1,1)-&(0,1)_x.ids[]",
];

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for raw in RHS_PATHS {
        group.bench_with_input(
            BenchmarkId::from_parameter(raw),
            raw,
            |b, raw| {
                b.iter(|| ParsedPath::parse(black_box(raw), Role::Rhs));
            },
        );
    }
    group.finish();
}

fn bench_match(c: &mut Criterion) {
    let keys = [
        "rating",
        "rating-BBB",
        "tuna-A-marlin-AAA",
        "a-1-b-2-c-3-d-4-e",
        "no-match-at-all",
    ];
    let walked = WalkedPath::new();

    let mut group = c.benchmark_group("match");
    for raw in LHS_PATTERNS {
        let Ok(element) = PathElement::parse(raw, Role::Lhs) else {
            continue;
        };
        group.bench_with_input(
            BenchmarkId::from_parameter(raw),
            &element,
            |b, element| {
                b.iter(|| {
                    keys.iter()
                        .filter_map(|key| {
                            element.match_key(black_box(key), &walked)
                        })
                        .count()
                });
            },
        );
    }
    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let mut walked = WalkedPath::new();
    walked.push(
        None,
        MatchedElement::with_captures("tuna-2-marlin-3", ["2", "3"]),
    );
    walked.push(None, MatchedElement::with_captures("rating-BBB", ["BBB"]));

    let mut group = c.benchmark_group("evaluate");
    for raw in RHS_PATHS {
        let Ok(output) = ParsedPath::parse(raw, Role::Rhs) else {
            continue;
        };
        group.bench_with_input(
            BenchmarkId::from_parameter(raw),
            &output,
            |b, output| {
                b.iter(|| output.evaluate(black_box(&walked)));
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_match, bench_evaluate);
criterion_main!(benches);
