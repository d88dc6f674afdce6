use criterion::{black_box, criterion_group, criterion_main, Criterion};
use circuitlab::prelude::*;
use circuitlab::evaluate;

fn bench_evaluate(c: &mut Criterion) {
    let config = CircuitConfig::new(10.0, 1000.0, 200.0)
        .with_capacitance_uf(100.0)
        .with_switch_closed(true);

    c.bench_function("evaluate_rc_delay", |b| {
        b.iter(|| {
            evaluate(
                black_box(CircuitTopology::RcDelay),
                black_box(&config),
                black_box(0.05),
            )
        });
    });

    c.bench_function("evaluate_parallel", |b| {
        b.iter(|| {
            evaluate(
                black_box(CircuitTopology::Parallel),
                black_box(&config),
                black_box(0.0),
            )
        });
    });
}

fn bench_render_frame(c: &mut Criterion) {
    let config = CircuitConfig::new(9.0, 100.0, 200.0).with_switch_closed(true);
    let sim = CircuitSimulation::new(CircuitTopology::Series, config).unwrap();

    c.bench_function("frame_at", |b| {
        b.iter(|| sim.frame_at(black_box(0.0), black_box(250.0)));
    });
}

criterion_group!(benches, bench_evaluate, bench_render_frame);
criterion_main!(benches);
