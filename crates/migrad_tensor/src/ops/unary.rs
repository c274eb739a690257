use crate::{Tensor, TensorData, TensorOp};
use migrad_core::error::Result;

impl<'g> Tensor<'g> {
    pub fn tanh(self) -> Result<Tensor<'g>> {
        self.unary(TensorOp::Tanh, |x| x.tanh())
    }

    pub fn neg(self) -> Result<Tensor<'g>> {
        self.unary(TensorOp::Neg, |x| x.neg())
    }

    pub fn log(self) -> Result<Tensor<'g>> {
        self.unary(TensorOp::Log, |x| x.log())
    }

    fn unary<F>(self, op: TensorOp, f: F) -> Result<Tensor<'g>>
    where
        F: FnOnce(&TensorData) -> TensorData,
    {
        let id = self.graph.record(&[self.id], op, |x| Ok(f(x[0])))?;
        Ok(self.graph.tensor_at(id))
    }
}
