use crate::{IndexData, Tensor, TensorOp};
use migrad_core::error::Result;

impl<'g> Tensor<'g> {
    pub fn mean(self) -> Result<Tensor<'g>> {
        let id = self.graph.record(&[self.id], TensorOp::Mean, |x| Ok(x[0].mean()))?;
        Ok(self.graph.tensor_at(id))
    }

    pub fn softmax(self, dim: usize) -> Result<Tensor<'g>> {
        let id = self.graph.record(&[self.id], TensorOp::Softmax { dim }, |x| x[0].softmax(dim))?;
        Ok(self.graph.tensor_at(id))
    }

    /// Fused softmax + negative log-likelihood against integer class targets.
    pub fn cross_entropy(self, target: &IndexData) -> Result<Tensor<'g>> {
        let op = TensorOp::CrossEntropy { target: target.clone() };
        let id = self.graph.record(&[self.id], op, |x| x[0].cross_entropy(target))?;
        Ok(self.graph.tensor_at(id))
    }
}
