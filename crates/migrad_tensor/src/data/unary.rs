use crate::TensorData;
use paste::paste;

macro_rules! impl_unary_ops {
    ($($name:ident),* $(,)?) => {
        paste! {
            impl TensorData {
                $(
                    #[doc = "Elementwise `" $name "`."]
                    pub fn $name(&self) -> TensorData {
                        self.map(f64::$name)
                    }
                )*
            }
        }
    };
}

impl_unary_ops!(tanh, exp);

impl TensorData {
    pub fn map<F>(&self, f: F) -> TensorData
    where
        F: Fn(f64) -> f64,
    {
        let data = self.as_slice().iter().map(|&x| f(x)).collect();
        TensorData::from_raw(data, self.layout().clone(), self.is_scalar())
    }

    /// Natural logarithm; non-positive inputs give `-inf` or `NaN`.
    pub fn log(&self) -> TensorData {
        self.map(f64::ln)
    }

    pub fn neg(&self) -> TensorData {
        self.map(|x| -x)
    }
}
