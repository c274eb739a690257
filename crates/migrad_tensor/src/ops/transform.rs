use crate::{Tensor, TensorOp};
use migrad_core::error::Result;

impl<'g> Tensor<'g> {
    /// Differentiable reshape; one dimension may be `-1`.
    pub fn view(self, shape: &[isize]) -> Result<Tensor<'g>> {
        let id = self.graph.record(&[self.id], TensorOp::View, |x| x[0].view(shape))?;
        Ok(self.graph.tensor_at(id))
    }

    pub fn reshape(self, shape: &[usize]) -> Result<Tensor<'g>> {
        let id = self.graph.record(&[self.id], TensorOp::View, |x| x[0].reshape(shape))?;
        Ok(self.graph.tensor_at(id))
    }
}
