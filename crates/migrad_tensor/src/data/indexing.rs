use crate::{IndexData, TensorData};
use migrad_core::{
    error::{Error, Result},
    layout::Layout,
};

impl TensorData {
    /// Picks along `dim`: `out[mi] = self[mi with mi[dim] = index[mi]]`.
    ///
    /// `index` has the same rank as `self`, and the output takes its shape.
    pub fn gather(&self, dim: usize, index: &IndexData) -> Result<TensorData> {
        self.ensure_dense("gather")?;
        check_gather_args(self.shape(), dim, index)?;

        let mut out = Vec::with_capacity(index.size());
        for (flat, &i) in index.as_slice().iter().enumerate() {
            let mut position = index.layout().unravel_index(flat);
            position[dim] = i;
            out.push(self.as_slice()[self.layout().flat_index(&position)?]);
        }
        Ok(TensorData::from_raw(out, index.layout().clone(), false))
    }

    /// Selects frames along the leading dimension.
    ///
    /// The output shape is `by.shape() ++ self.shape()[1..]`: every index in
    /// `by` is replaced by the whole frame it names.
    pub fn index(&self, by: &IndexData) -> Result<TensorData> {
        self.ensure_dense("index")?;
        let (data, shape) = select_frames(self.as_slice(), self.shape(), by)?;
        Ok(TensorData::from_raw(data, Layout::from_shape(&shape), false))
    }
}

fn check_gather_args(shape: &[usize], dim: usize, index: &IndexData) -> Result<()> {
    if dim >= shape.len() {
        return Err(Error::DimensionOutOfBounds {
            dim: dim as i64,
            ndim: shape.len(),
        });
    }
    if index.ndim() != shape.len() {
        return Err(Error::DimensionMismatch {
            expected: shape.to_vec(),
            got: index.shape().to_vec(),
        });
    }
    for (d, (&extent, &size)) in index.shape().iter().zip(shape).enumerate() {
        if d != dim && extent > size {
            return Err(Error::IndexOutOfBounds { index: extent, size });
        }
    }
    if let Some(&bad) = index.as_slice().iter().find(|&&i| i >= shape[dim]) {
        return Err(Error::IndexOutOfBounds {
            index: bad,
            size: shape[dim],
        });
    }
    Ok(())
}

/// Copies the leading-dimension frames of `src` named by `by`; returns the
/// gathered buffer and its shape.
pub(crate) fn select_frames<T: Copy>(src: &[T], shape: &[usize], by: &IndexData) -> Result<(Vec<T>, Vec<usize>)> {
    let Some((&rows, trailing)) = shape.split_first() else {
        return Err(Error::UnsupportedOperation("index on a 0-dimensional tensor".to_string()));
    };
    let frame = Layout::compute_size(trailing);

    let mut out = Vec::with_capacity(by.size() * frame);
    for &i in by.as_slice() {
        if i >= rows {
            return Err(Error::IndexOutOfBounds { index: i, size: rows });
        }
        out.extend_from_slice(&src[i * frame..(i + 1) * frame]);
    }
    Ok((out, [by.shape(), trailing].concat()))
}

/// Adjoint of [`TensorData::gather`]: scatters `grad` back into a zero tensor
/// of `shape`, summing where indices repeat.
pub(crate) fn gather_backward(shape: &[usize], dim: usize, index: &IndexData, grad: &TensorData) -> Result<TensorData> {
    check_gather_args(shape, dim, index)?;
    check_grad_len(grad, index.size())?;
    let mut out = TensorData::zeros(shape);
    for (flat, (&i, &g)) in index.as_slice().iter().zip(grad.as_slice()).enumerate() {
        let mut position = index.layout().unravel_index(flat);
        position[dim] = i;
        let offset = out.layout().flat_index(&position)?;
        out.as_mut_slice()[offset] += g;
    }
    Ok(out)
}

/// Adjoint of [`TensorData::index`]: adds every gradient frame into the source
/// frame it was read from.
pub(crate) fn index_backward(shape: &[usize], by: &IndexData, grad: &TensorData) -> Result<TensorData> {
    let mut out = TensorData::zeros(shape);
    let frame = Layout::compute_size(&shape[1.min(shape.len())..]);
    let rows = shape.first().copied().unwrap_or(0);
    check_grad_len(grad, by.size() * frame)?;

    for (k, &i) in by.as_slice().iter().enumerate() {
        if i >= rows {
            return Err(Error::IndexOutOfBounds { index: i, size: rows });
        }
        let src = &grad.as_slice()[k * frame..(k + 1) * frame];
        for (o, g) in out.as_mut_slice()[i * frame..(i + 1) * frame].iter_mut().zip(src) {
            *o += g;
        }
    }
    Ok(out)
}

fn check_grad_len(grad: &TensorData, expected: usize) -> Result<()> {
    if grad.size() != expected {
        return Err(Error::ShapeMismatch {
            expected,
            got: grad.size(),
            msg: "upstream gradient".to_string(),
        });
    }
    Ok(())
}
