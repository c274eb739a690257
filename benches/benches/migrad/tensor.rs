use criterion::{black_box, criterion_group, Criterion};
use migrad_core::{error::Result, random::manual_seed};
use migrad_tensor::{IndexData, TensorData, TensorGraph};

const SIZES: [(usize, &str); 2] = [(32, "small"), (128, "medium")];

fn matmul_square(size: usize) -> Result<TensorData> {
    let a = TensorData::randn(&[size, size])?;
    let b = TensorData::randn(&[size, size])?;
    a.matmul(&b)
}

fn classifier_step(size: usize) -> Result<f64> {
    let graph = TensorGraph::new();
    let x = graph.randn(&[size, size])?;
    let w = graph.randn(&[size, 10])?;
    let targets = IndexData::random_uniform(&[size], 0, 10)?;

    let loss = x.matmul(w)?.tanh()?.cross_entropy(&targets)?;
    loss.backward()?;
    loss.item()
}

pub fn basic(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("tensor/basic");
    group.warm_up_time(core::time::Duration::from_millis(500));
    group.measurement_time(core::time::Duration::from_secs(3));
    group.sample_size(50);
    manual_seed(0);

    for &(size, label) in &SIZES {
        group.bench_function(format!("matmul_{}", label), |b| b.iter(|| black_box(matmul_square(size)).unwrap()));
        group.bench_function(format!("classifier_step_{}", label), |b| {
            b.iter(|| black_box(classifier_step(size)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, basic);
