//! Criterion benchmarks for the substitution table's cascading expansion
//! pass.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ensrun_bench::cascading_subst_table;

fn bench_expand(c: &mut Criterion, label: &str, depth: usize) {
    let table = cascading_subst_table(depth);
    c.bench_function(label, |b| {
        b.iter(|| {
            let expanded = table.expand("<KEY_0>").unwrap();
            black_box(expanded);
        });
    });
}

fn bench_shallow_chain(c: &mut Criterion) {
    bench_expand(c, "subst_expand_depth_4", 4);
}

fn bench_deep_chain(c: &mut Criterion) {
    bench_expand(c, "subst_expand_depth_64", 64);
}

criterion_group!(benches, bench_shallow_chain, bench_deep_chain);
criterion_main!(benches);
