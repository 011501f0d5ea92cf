use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use seqiahr::prelude::*;
use std::hint::black_box;

static NODES: u32 = 5000;
static TOTPOP: f64 = 100_000.0;

fn parameters() -> ModelParameters {
    ModelParameters {
        beta: 0.000_002,
        alpha: 0.2,
        phi: 0.1,
        delta: 0.1,
        rho: 0.5,
        p: 0.3,
        ..ModelParameters::default()
    }
}

fn nodes() -> Vec<NodeSeries> {
    (0..NODES)
        .map(|k| {
            let infectious = f64::from(k % 50 + 1);
            NodeSeries::new(
                TOTPOP,
                InitialConditions {
                    i: infectious,
                    s: TOTPOP - infectious,
                    ..InitialConditions::default()
                },
            )
        })
        .collect()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let inits = CompartmentState::new(12.0, 30.0, 8.0, 4.0, 99_000.0);
    let context = SimulationContext::new(2, TOTPOP);
    let initial_conditions = InitialConditions::default();
    let parameters = parameters();
    c.bench_function("single step", |bencher| {
        bencher.iter(|| {
            step(
                black_box(&inits),
                black_box(&context),
                &initial_conditions,
                black_box(&parameters),
            )
        });
    });

    let model = Seqiahr::default();
    let inputs = vec![
        NodeInput {
            parameters,
            ..NodeInput::default()
        };
        NODES as usize
    ];
    c.bench_function("step nodes", |bencher| {
        bencher.iter_batched(
            nodes,
            |mut nodes| {
                step_nodes(&model, &mut nodes, &inputs).unwrap();
                nodes
            },
            BatchSize::LargeInput,
        );
    });
}

criterion_group!(step_benches, criterion_benchmark);
criterion_main!(step_benches);
