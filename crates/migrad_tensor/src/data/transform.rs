use crate::TensorData;
use migrad_core::{
    error::{Error, Result},
    layout::Layout,
};

impl TensorData {
    /// Same values under a new shape with the same element count.
    pub fn reshape(&self, shape: &[usize]) -> Result<TensorData> {
        self.ensure_dense("reshape")?;
        let mut layout = self.layout().clone();
        layout.reshape(shape)?;
        let scalar = self.is_scalar() && shape.is_empty();
        Ok(TensorData::from_raw(self.as_slice().to_vec(), layout, scalar))
    }

    /// [`TensorData::reshape`] where one dimension may be `-1`.
    pub fn view(&self, shape: &[isize]) -> Result<TensorData> {
        let resolved = Layout::resolve_view_shape(self.layout().size(), shape)?;
        self.reshape(&resolved)
    }

    /// Swaps the two axes of a matrix.
    pub fn transpose(&self) -> Result<TensorData> {
        self.ensure_dense("transpose")?;
        let &[rows, cols] = self.shape() else {
            return Err(Error::UnsupportedOperation(format!(
                "transpose needs a 2D tensor, got shape {:?}",
                self.shape()
            )));
        };

        let src = self.as_slice();
        let mut out = Vec::with_capacity(src.len());
        for c in 0..cols {
            for r in 0..rows {
                out.push(src[r * cols + c]);
            }
        }
        Ok(TensorData::from_raw(out, Layout::from_shape(&[cols, rows]), false))
    }
}
