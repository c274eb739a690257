use crate::module::Module;
use migrad_core::{
    error::{Error, Result},
    random::with_rng,
};
use migrad_scalar::{ScalarGraph, Value};
use rand::Rng;
use std::fmt;

/// A single unit computing `b + Σ wᵢxᵢ`, optionally followed by ReLU.
#[derive(Module, Clone)]
#[module(output = single)]
pub struct Neuron<'g> {
    weights: Vec<Value<'g>>,
    bias: Value<'g>,
    nonlin: bool,
}

impl<'g> Neuron<'g> {
    /// Weights are drawn uniformly from `[-1, 1)`, the bias starts at zero.
    pub fn new(graph: &'g ScalarGraph, nin: usize, nonlin: bool) -> Self {
        let weights = with_rng(|rng| (0..nin).map(|_| rng.gen_range(-1.0..1.0)).collect::<Vec<f64>>())
            .into_iter()
            .map(|w| graph.leaf(w))
            .collect();

        Self {
            weights,
            bias: graph.leaf(0.0),
            nonlin,
        }
    }

    pub fn forward(&self, input: &[Value<'g>]) -> Result<Value<'g>> {
        if input.len() != self.weights.len() {
            return Err(Error::ShapeMismatch {
                expected: self.weights.len(),
                got: input.len(),
                msg: "neuron input".to_string(),
            });
        }

        let act = self.weights.iter().zip(input).fold(self.bias, |acc, (&w, &x)| acc + w * x);

        Ok(if self.nonlin { act.relu() } else { act })
    }

    /// The bias followed by the weights.
    pub fn parameters(&self) -> Vec<Value<'g>> {
        std::iter::once(self.bias).chain(self.weights.iter().copied()).collect()
    }

    pub fn nin(&self) -> usize {
        self.weights.len()
    }

    pub fn is_nonlinear(&self) -> bool {
        self.nonlin
    }

    pub fn weights(&self) -> &[Value<'g>] {
        &self.weights
    }

    pub fn bias(&self) -> Value<'g> {
        self.bias
    }
}

impl fmt::Display for Neuron<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Neuron(w=[")?;
        for (i, w) in self.weights.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", w)?;
        }
        write!(f, "], b={})", self.bias)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migrad_core::random::manual_seed;

    #[test]
    fn neuron_forward() -> Result<()> {
        let graph = ScalarGraph::new();
        let neuron = Neuron::new(&graph, 2, false);
        neuron.weights()[0].set_data(0.5);
        neuron.weights()[1].set_data(-1.0);
        neuron.bias().set_data(0.25);

        let x = [graph.leaf(2.0), graph.leaf(3.0)];
        let out = neuron.forward(&x)?;
        assert!((out.data() - (0.25 + 1.0 - 3.0)).abs() < 1e-12);

        let relu = Neuron::new(&graph, 2, true);
        relu.weights()[0].set_data(0.5);
        relu.weights()[1].set_data(-1.0);
        assert_eq!(relu.forward(&x)?.data(), 0.0);

        Ok(())
    }

    #[test]
    fn neuron_init_range() {
        manual_seed(3);
        let graph = ScalarGraph::new();
        let neuron = Neuron::new(&graph, 64, true);

        assert_eq!(neuron.bias().data(), 0.0);
        assert!(neuron.weights().iter().all(|w| (-1.0..1.0).contains(&w.data())));
        assert_eq!(neuron.parameters()[0].id(), neuron.bias().id());
        assert_eq!(neuron.parameters().len(), 65);
    }

    #[test]
    fn neuron_input_mismatch() {
        let graph = ScalarGraph::new();
        let neuron = Neuron::new(&graph, 3, true);
        let err = neuron.forward(&[graph.leaf(1.0)]).unwrap_err();
        assert!(err.is_shape_error());
    }
}
