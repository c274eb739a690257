pub use migrad_nn_macros::Module;
use migrad_core::error::Result;
use migrad_scalar::Value;

/// A differentiable function of scalar inputs with trainable parameters that
/// live in the graph `'g`.
pub trait Module<'g> {
    type Output;

    fn forward(&self, input: &[Value<'g>]) -> Result<Self::Output>;
    fn parameters(&self) -> Vec<Value<'g>>;

    /// Sets the gradient of every parameter to zero.
    fn zero_grad(&self) {
        for param in self.parameters() {
            param.set_grad(0.0);
        }
    }
}
