pub use crate::core::{
    error::{Error, Result},
    grad::{grad_mode, no_grad_mode},
    random::manual_seed,
};
#[cfg(feature = "nn")]
pub use crate::nn::{
    module::Module,
    optimizer::Optimizer,
    Layer, Mlp, Neuron, Sgd,
};
pub use crate::scalar::{ScalarGraph, Value};
pub use crate::tensor::{IndexData, Tensor, TensorData, TensorGraph};
pub use crate::init_tracing;
