use crate::TensorData;
use migrad_core::error::{Error, Result};
use paste::paste;

macro_rules! impl_binary_ops {
    ($($name:ident => $op:tt),* $(,)?) => {
        paste! {
            impl TensorData {
                $(
                    #[doc = "Elementwise `" $name "`. Shapes must match unless one operand is scalar-broadcast."]
                    pub fn $name(&self, rhs: &TensorData) -> Result<TensorData> {
                        self.zip_broadcast(rhs, stringify!($name), |a, b| a $op b)
                    }
                )*
            }
        }
    };
}

impl_binary_ops!(add => +, sub => -, mul => *, div => /);

impl TensorData {
    pub fn scale(&self, factor: f64) -> TensorData {
        self.map(|x| x * factor)
    }

    /// In-place `self += rhs`; both buffers must hold the same number of values.
    pub fn add_assign(&mut self, rhs: &TensorData) -> Result<()> {
        if self.size() != rhs.size() {
            return Err(Error::ShapeMismatch {
                expected: self.size(),
                got: rhs.size(),
                msg: format!("accumulating {:?} into {:?}", rhs.shape(), self.shape()),
            });
        }
        for (x, y) in self.as_mut_slice().iter_mut().zip(rhs.as_slice()) {
            *x += y;
        }
        Ok(())
    }

    fn zip_broadcast<F>(&self, rhs: &TensorData, op: &str, f: F) -> Result<TensorData>
    where
        F: Fn(f64, f64) -> f64,
    {
        let scalar = self.is_scalar() && rhs.is_scalar();

        if self.shape() == rhs.shape() && self.size() == rhs.size() {
            let data = self.as_slice().iter().zip(rhs.as_slice()).map(|(&a, &b)| f(a, b)).collect();
            return Ok(TensorData::from_raw(data, self.layout().clone(), scalar));
        }
        if rhs.is_scalar() {
            let b = rhs.as_slice()[0];
            let data = self.as_slice().iter().map(|&a| f(a, b)).collect();
            return Ok(TensorData::from_raw(data, self.layout().clone(), scalar));
        }
        if self.is_scalar() {
            let a = self.as_slice()[0];
            let data = rhs.as_slice().iter().map(|&b| f(a, b)).collect();
            return Ok(TensorData::from_raw(data, rhs.layout().clone(), scalar));
        }

        Err(Error::IncompatibleShape(format!(
            "{}: {:?} and {:?}",
            op,
            self.shape(),
            rhs.shape()
        )))
    }
}
