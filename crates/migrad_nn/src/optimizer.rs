use migrad_core::error::Result;
pub use migrad_nn_macros::Optimizer;
use migrad_scalar::Value;

pub trait Optimizer {
    fn step(&mut self, parameters: &[Value<'_>]) -> Result<()>;
    fn zero_grad(&mut self, parameters: &[Value<'_>]) -> Result<()>;
    fn set_learning_rate(&mut self, learning_rate: f64);
}
