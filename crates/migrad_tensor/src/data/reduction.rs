use crate::{IndexData, TensorData};
use migrad_core::error::{Error, Result};

impl TensorData {
    pub fn sum(&self) -> TensorData {
        TensorData::scalar(self.as_slice().iter().sum())
    }

    /// Average of all stored values as a scalar tensor. Empty input gives `NaN`.
    pub fn mean(&self) -> TensorData {
        TensorData::scalar(self.as_slice().iter().sum::<f64>() / self.size() as f64)
    }

    /// Softmax along the last dimension of a 1D or 2D tensor.
    ///
    /// Plain exponentiate-and-normalize with no max shift: logits above ~709
    /// overflow to `inf` and the row becomes `NaN`.
    pub fn softmax(&self, dim: usize) -> Result<TensorData> {
        self.ensure_dense("softmax")?;
        let cols = softmax_cols(self.shape(), dim)?;
        let mut out = self.as_slice().to_vec();
        if cols == 0 {
            return Ok(TensorData::from_raw(out, self.layout().clone(), false));
        }

        for row in out.chunks_mut(cols) {
            let mut total = 0.0;
            for x in row.iter_mut() {
                *x = x.exp();
                total += *x;
            }
            for x in row.iter_mut() {
                *x /= total;
            }
        }
        Ok(TensorData::from_raw(out, self.layout().clone(), false))
    }

    /// Mean negative log-likelihood of `target` classes under the softmax of
    /// `self` (logits `[N, C]`, or `[C]` for a single sample).
    ///
    /// Composed as softmax, gather, log, negate, mean; there is no log-sum-exp
    /// shortcut, so a probability that underflows to zero gives an infinite loss.
    pub fn cross_entropy(&self, target: &IndexData) -> Result<TensorData> {
        let (rows, _) = class_rows(self.shape())?;
        if target.size() != rows {
            return Err(Error::ShapeMismatch {
                expected: rows,
                got: target.size(),
                msg: format!("cross_entropy targets for logits {:?}", self.shape()),
            });
        }

        let last = self.ndim() - 1;
        let probs = self.softmax(last)?;
        let picked_shape = if self.ndim() == 2 { vec![rows, 1] } else { vec![1] };
        let picked = probs.gather(last, &target.reshape(&picked_shape)?)?;

        Ok(picked.log().neg().mean())
    }
}

pub(crate) fn softmax_cols(shape: &[usize], dim: usize) -> Result<usize> {
    match shape.len() {
        1 | 2 if dim == shape.len() - 1 => Ok(shape[dim]),
        ndim => Err(Error::UnsupportedOperation(format!(
            "softmax over dim {} of a {}D tensor (only the last dim of 1D or 2D input)",
            dim, ndim
        ))),
    }
}

/// `(rows, classes)` of a logits tensor.
pub(crate) fn class_rows(shape: &[usize]) -> Result<(usize, usize)> {
    match shape {
        [classes] => Ok((1, *classes)),
        [rows, classes] => Ok((*rows, *classes)),
        _ => Err(Error::UnsupportedOperation(format!(
            "cross_entropy needs 1D or 2D logits, got shape {:?}",
            shape
        ))),
    }
}
