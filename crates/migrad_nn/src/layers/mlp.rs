use crate::{layers::layer::Layer, module::Module};
use migrad_core::error::Result;
use migrad_scalar::{ScalarGraph, Value};
use std::fmt;

/// Stack of fully connected layers. Every layer but the last applies ReLU.
#[derive(Module, Clone)]
pub struct Mlp<'g> {
    layers: Vec<Layer<'g>>,
}

impl<'g> Mlp<'g> {
    pub fn new(graph: &'g ScalarGraph, nin: usize, nouts: &[usize]) -> Self {
        let sizes: Vec<usize> = std::iter::once(nin).chain(nouts.iter().copied()).collect();
        let last = nouts.len().saturating_sub(1);
        let layers = sizes
            .windows(2)
            .enumerate()
            .map(|(i, pair)| Layer::new(graph, pair[0], pair[1], i != last))
            .collect();

        let mlp = Self { layers };
        tracing::debug!(target: "migrad::nn", layers = nouts.len(), parameters = mlp.parameters().len(), "mlp created");
        mlp
    }

    pub fn forward(&self, input: &[Value<'g>]) -> Result<Vec<Value<'g>>> {
        let mut x = input.to_vec();
        for layer in &self.layers {
            x = layer.forward(&x)?;
        }
        Ok(x)
    }

    pub fn parameters(&self) -> Vec<Value<'g>> {
        self.layers.iter().flat_map(|l| l.parameters()).collect()
    }

    pub fn layers(&self) -> &[Layer<'g>] {
        &self.layers
    }
}

impl fmt::Display for Mlp<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Layers [")?;
        for (i, layer) in self.layers.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", layer)?;
        }
        write!(f, "]")
    }
}
