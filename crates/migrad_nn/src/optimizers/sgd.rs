use crate::optimizer::Optimizer;
use migrad_core::error::Result;
use migrad_scalar::Value;
use migrad_tensor::Tensor;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Plain gradient descent: `p -= learning_rate * grad`.
#[derive(Optimizer, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sgd {
    learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Self {
        Self { learning_rate }
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn step(&mut self, parameters: &[Value<'_>]) -> Result<()> {
        tracing::trace!(target: "migrad::nn", parameters = parameters.len(), lr = self.learning_rate, "sgd step");
        for param in parameters {
            param.set_data(param.data() - self.learning_rate * param.grad());
        }
        Ok(())
    }

    pub fn zero_grad(&mut self, parameters: &[Value<'_>]) -> Result<()> {
        for param in parameters {
            param.set_grad(0.0);
        }
        Ok(())
    }

    pub fn set_learning_rate(&mut self, learning_rate: f64) {
        self.learning_rate = learning_rate;
    }

    /// Same update for tensor-graph parameters. Parameters without a gradient
    /// are left untouched.
    pub fn step_tensors(&mut self, parameters: &[Tensor<'_>]) -> Result<()> {
        tracing::trace!(target: "migrad::nn", parameters = parameters.len(), lr = self.learning_rate, "sgd tensor step");
        let lr = self.learning_rate;
        for param in parameters {
            param.update(|data, grad| match grad {
                Some(grad) => data.add_assign(&grad.scale(-lr)),
                None => Ok(()),
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migrad_scalar::ScalarGraph;
    use migrad_tensor::TensorGraph;

    #[test]
    fn sgd_step() -> Result<()> {
        let graph = ScalarGraph::new();
        let p = graph.leaf(1.0);
        p.set_grad(2.0);

        let mut sgd = Sgd::new(0.1);
        sgd.step(&[p])?;
        assert!((p.data() - 0.8).abs() < 1e-12);

        sgd.zero_grad(&[p])?;
        assert_eq!(p.grad(), 0.0);

        sgd.set_learning_rate(0.5);
        assert_eq!(sgd.learning_rate(), 0.5);
        Ok(())
    }

    #[test]
    fn sgd_step_tensors() -> Result<()> {
        let graph = TensorGraph::new();
        let w = graph.tensor(vec![1.0, 2.0])?;
        let untouched = graph.tensor(vec![5.0])?;
        let loss = w.tanh()?.mean()?;
        loss.backward()?;

        let grad = w.grad().map(|g| g.to_flatten_vec()).unwrap_or_default();
        let mut sgd = Sgd::new(0.5);
        sgd.step_tensors(&[w, untouched])?;

        let updated = w.to_flatten_vec();
        assert!((updated[0] - (1.0 - 0.5 * grad[0])).abs() < 1e-12);
        assert!((updated[1] - (2.0 - 0.5 * grad[1])).abs() < 1e-12);
        assert_eq!(untouched.to_flatten_vec(), vec![5.0]);
        Ok(())
    }
}
