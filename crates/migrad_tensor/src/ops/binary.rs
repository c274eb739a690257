use crate::{Tensor, TensorOp};
use migrad_core::error::Result;

impl<'g> Tensor<'g> {
    /// Elementwise sum; a scalar-broadcast operand adopts the other's shape.
    pub fn add(self, rhs: Tensor<'g>) -> Result<Tensor<'g>> {
        debug_assert!(self.same_graph(&rhs), "operands belong to different graphs");
        let id = self.graph.record(&[self.id, rhs.id], TensorOp::Add, |x| x[0].add(x[1]))?;
        Ok(self.graph.tensor_at(id))
    }

    /// Rank-dispatched multiply; see [`TensorData::matmul`](crate::TensorData::matmul).
    pub fn matmul(self, rhs: Tensor<'g>) -> Result<Tensor<'g>> {
        debug_assert!(self.same_graph(&rhs), "operands belong to different graphs");
        let id = self.graph.record(&[self.id, rhs.id], TensorOp::MatMul, |x| x[0].matmul(x[1]))?;
        Ok(self.graph.tensor_at(id))
    }
}
