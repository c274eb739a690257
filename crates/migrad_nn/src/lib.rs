pub mod module;
pub mod optimizer;

pub mod layers;
pub mod losses;
pub mod optimizers;

pub use crate::{
    layers::{layer::Layer, mlp::Mlp, neuron::Neuron},
    losses::{
        max_margin::{accuracy, max_margin_loss},
        regularization::l2_regularization,
    },
    optimizers::sgd::Sgd,
};
