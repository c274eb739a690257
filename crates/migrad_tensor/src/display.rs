use crate::Tensor;
use std::fmt;

impl fmt::Display for Tensor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.data())?;
        match self.grad() {
            Some(grad) => write!(f, " grad: {:?}", grad.as_slice()),
            None => write!(f, " grad: none"),
        }
    }
}

impl fmt::Debug for Tensor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("id", &self.id().index())
            .field("op", &self.op().label())
            .field("shape", &self.shape())
            .finish()
    }
}
