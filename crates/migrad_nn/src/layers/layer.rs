use crate::{layers::neuron::Neuron, module::Module};
use migrad_core::error::Result;
use migrad_scalar::{ScalarGraph, Value};
use std::fmt;

/// `nout` independent neurons sharing the same input.
#[derive(Module, Clone)]
pub struct Layer<'g> {
    neurons: Vec<Neuron<'g>>,
}

impl<'g> Layer<'g> {
    pub fn new(graph: &'g ScalarGraph, nin: usize, nout: usize, nonlin: bool) -> Self {
        Self {
            neurons: (0..nout).map(|_| Neuron::new(graph, nin, nonlin)).collect(),
        }
    }

    pub fn forward(&self, input: &[Value<'g>]) -> Result<Vec<Value<'g>>> {
        self.neurons.iter().map(|n| n.forward(input)).collect()
    }

    pub fn parameters(&self) -> Vec<Value<'g>> {
        self.neurons.iter().flat_map(|n| n.parameters()).collect()
    }

    pub fn neurons(&self) -> &[Neuron<'g>] {
        &self.neurons
    }

    pub fn nin(&self) -> usize {
        self.neurons.first().map_or(0, |n| n.nin())
    }

    pub fn nout(&self) -> usize {
        self.neurons.len()
    }
}

impl fmt::Display for Layer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Layer {{in: {}, out: {}}}", self.nin(), self.nout())
    }
}
