use criterion::{black_box, criterion_group, Criterion};
use migrad_scalar::{ScalarGraph, Value};

// Chain lengths
const SIZES: [(usize, &str); 2] = [(1000, "small"), (10000, "medium")];

fn polynomial_chain<'g>(graph: &'g ScalarGraph, len: usize) -> Value<'g> {
    let x = graph.leaf(0.5);
    (0..len).fold(x, |acc, i| (acc * x + (i % 7) as f64).tanh())
}

pub fn backward(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("scalar/backward");
    group.warm_up_time(core::time::Duration::from_millis(500));
    group.measurement_time(core::time::Duration::from_secs(3));
    group.sample_size(50);

    for &(size, label) in &SIZES {
        group.bench_function(format!("forward_{}", label), |b| {
            b.iter(|| {
                let graph = ScalarGraph::with_capacity(size * 4);
                black_box(polynomial_chain(&graph, size).data())
            })
        });

        group.bench_function(format!("forward_backward_{}", label), |b| {
            b.iter(|| {
                let graph = ScalarGraph::with_capacity(size * 4);
                let out = polynomial_chain(&graph, size);
                out.backward();
                black_box(graph.grad(out.parents()[0].id()))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, backward);
