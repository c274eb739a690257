mod scalar;
mod tensor;

use criterion::criterion_main;

criterion_main!(scalar::benches, tensor::benches);
