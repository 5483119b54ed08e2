//! Criterion benchmarks for the restart-block reader's per-keyword
//! dispatch loop.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ensrun_bench::{bench_iens, restart_fixture};
use ensrun_core::ReportStep;
use ensrun_restart::read_restart_block;

fn bench_dispatch(c: &mut Criterion, label: &str, num_fields: usize, num_static: usize) {
    c.bench_function(label, |b| {
        b.iter_batched(
            || restart_fixture(num_fields, num_static),
            |mut fixture| {
                let report = read_restart_block(
                    &fixture.block,
                    &mut fixture.registry,
                    &fixture.catalog,
                    &fixture.store,
                    &fixture.log,
                    &fixture.subst,
                    &fixture.run_path,
                    bench_iens(),
                    ReportStep::new(0),
                    ReportStep::new(1),
                    true,
                )
                .unwrap();
                black_box(report);
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

fn bench_small_block(c: &mut Criterion) {
    bench_dispatch(c, "restart_dispatch_50_fields", 50, 20);
}

fn bench_large_block(c: &mut Criterion) {
    bench_dispatch(c, "restart_dispatch_500_fields", 500, 100);
}

criterion_group!(benches, bench_small_block, bench_large_block);
criterion_main!(benches);
