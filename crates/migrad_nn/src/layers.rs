pub mod layer;
pub mod mlp;
pub mod neuron;
