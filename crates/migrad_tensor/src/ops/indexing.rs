use crate::{IndexData, Tensor, TensorOp};
use migrad_core::error::Result;

impl<'g> Tensor<'g> {
    pub fn gather(self, dim: usize, index: &IndexData) -> Result<Tensor<'g>> {
        let op = TensorOp::Gather {
            dim,
            index: index.clone(),
        };
        let id = self.graph.record(&[self.id], op, |x| x[0].gather(dim, index))?;
        Ok(self.graph.tensor_at(id))
    }

    /// Embedding-style lookup of whole leading-dimension frames.
    pub fn index(self, by: &IndexData) -> Result<Tensor<'g>> {
        let op = TensorOp::Index { by: by.clone() };
        let id = self.graph.record(&[self.id], op, |x| x[0].index(by))?;
        Ok(self.graph.tensor_at(id))
    }
}
