mod binary;
mod creation;
mod index_data;
pub(crate) mod indexing;
pub(crate) mod matmul;
pub(crate) mod reduction;
mod transform;
mod unary;

pub use index_data::IndexData;

use migrad_core::{
    error::{Error, Result},
    layout::Layout,
};
use std::fmt;

/// Dense row-major buffer of `f64` with a logical shape.
///
/// `data.len()` equals the product of the shape, except for scalar-broadcast
/// tensors: those carry exactly one value whatever their logical shape, and
/// combine with any other operand in elementwise arithmetic.
#[derive(Clone, Debug, PartialEq)]
pub struct TensorData {
    data: Vec<f64>,
    layout: Layout,
    scalar: bool,
}

impl TensorData {
    /// Builds a tensor from its raw parts, checking the element count.
    pub fn from_parts(shape: &[usize], data: Vec<f64>, scalar: bool) -> Result<Self> {
        let layout = Layout::from_shape(shape);
        let expected = if scalar { 1 } else { layout.size() };
        if data.len() != expected {
            return Err(Error::ShapeMismatch {
                expected,
                got: data.len(),
                msg: format!("buffer for shape {:?}", shape),
            });
        }
        Ok(Self { data, layout, scalar })
    }

    pub(crate) fn from_raw(data: Vec<f64>, layout: Layout, scalar: bool) -> Self {
        Self { data, layout, scalar }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }
    pub fn shape(&self) -> &[usize] {
        self.layout.shape()
    }
    pub fn ndim(&self) -> usize {
        self.layout.ndim()
    }
    /// Number of stored values (1 for scalar-broadcast tensors).
    pub fn size(&self) -> usize {
        self.data.len()
    }
    pub fn is_scalar(&self) -> bool {
        self.scalar
    }
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }
    pub fn to_flatten_vec(&self) -> Vec<f64> {
        self.data.clone()
    }
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    pub fn get(&self, indices: &[usize]) -> Result<f64> {
        let offset = self.offset_of(indices)?;
        Ok(self.data[offset])
    }

    pub fn set(&mut self, indices: &[usize], value: f64) -> Result<()> {
        let offset = self.offset_of(indices)?;
        self.data[offset] = value;
        Ok(())
    }

    /// The single value of a one-element tensor.
    pub fn item(&self) -> Result<f64> {
        match self.data.as_slice() {
            [value] => Ok(*value),
            _ => Err(Error::ShapeMismatch {
                expected: 1,
                got: self.data.len(),
                msg: "item() needs exactly one element".to_string(),
            }),
        }
    }

    fn offset_of(&self, indices: &[usize]) -> Result<usize> {
        let offset = self.layout.flat_index(indices)?;
        Ok(if self.is_broadcast() { 0 } else { offset })
    }

    /// True when one stored value stands for a larger logical shape.
    pub(crate) fn is_broadcast(&self) -> bool {
        self.data.len() != self.layout.size()
    }

    pub(crate) fn ensure_dense(&self, op: &str) -> Result<()> {
        if self.is_broadcast() {
            return Err(Error::UnsupportedOperation(format!(
                "{} on a scalar-broadcast tensor of shape {:?}",
                op,
                self.shape()
            )));
        }
        Ok(())
    }
}

impl fmt::Display for TensorData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TensorData(shape={:?}, data={:?}", self.shape(), self.data)?;
        if self.scalar {
            write!(f, ", scalar")?;
        }
        write!(f, ")")
    }
}
