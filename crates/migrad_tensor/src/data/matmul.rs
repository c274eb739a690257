use crate::TensorData;
use migrad_core::{
    error::{Error, Result},
    layout::Layout,
};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

impl TensorData {
    /// Rank-dispatched multiply.
    ///
    /// - 1D × 1D: elementwise, a length-1 operand broadcasting over the other.
    /// - 2D × 2D: matrix product.
    /// - 1D × 2D: row vector times matrix.
    /// - 2D × 1D: matrix times column vector.
    ///
    /// Batched (rank > 2) products are not implemented.
    pub fn matmul(&self, rhs: &TensorData) -> Result<TensorData> {
        self.ensure_dense("matmul")?;
        rhs.ensure_dense("matmul")?;

        match (self.ndim(), rhs.ndim()) {
            (1, 1) => self.mul_1d(rhs),
            (2, 2) => self.mul_2d(rhs),
            (1, 2) => self.mul_1d_2d(rhs),
            (2, 1) => self.mul_2d_1d(rhs),
            (l, r) if l > 2 && r > 2 => {
                let (k, k2) = (self.shape()[l - 1], rhs.shape()[r - 2]);
                if k != k2 {
                    return Err(incompatible(self, rhs));
                }
                Err(Error::UnsupportedOperation(format!("batched matmul of {}D and {}D tensors", l, r)))
            }
            (l, r) => Err(Error::UnsupportedOperation(format!("matmul of {}D and {}D tensors", l, r))),
        }
    }

    pub(crate) fn mul_1d(&self, rhs: &TensorData) -> Result<TensorData> {
        match (self.size(), rhs.size()) {
            (n, m) if n == m => {
                let data = self.as_slice().iter().zip(rhs.as_slice()).map(|(a, b)| a * b).collect();
                Ok(TensorData::from_raw(data, self.layout().clone(), false))
            }
            (1, _) => Ok(rhs.scale(self.as_slice()[0])),
            (_, 1) => Ok(self.scale(rhs.as_slice()[0])),
            (n, m) => Err(Error::ShapeMismatch {
                expected: n,
                got: m,
                msg: "1D multiply needs equal lengths or a length-1 operand".to_string(),
            }),
        }
    }

    fn mul_2d(&self, rhs: &TensorData) -> Result<TensorData> {
        let (m, k) = (self.shape()[0], self.shape()[1]);
        let (k2, n) = (rhs.shape()[0], rhs.shape()[1]);
        if k != k2 {
            return Err(incompatible(self, rhs));
        }
        let data = matmul_kernel(self.as_slice(), rhs.as_slice(), m, k, n);
        Ok(TensorData::from_raw(data, Layout::from_shape(&[m, n]), false))
    }

    fn mul_1d_2d(&self, rhs: &TensorData) -> Result<TensorData> {
        let k = self.size();
        let (k2, n) = (rhs.shape()[0], rhs.shape()[1]);
        if k != k2 {
            return Err(incompatible(self, rhs));
        }
        let data = matmul_kernel(self.as_slice(), rhs.as_slice(), 1, k, n);
        Ok(TensorData::from_raw(data, Layout::from_shape(&[n]), false))
    }

    fn mul_2d_1d(&self, rhs: &TensorData) -> Result<TensorData> {
        let (m, k) = (self.shape()[0], self.shape()[1]);
        if k != rhs.size() {
            return Err(incompatible(self, rhs));
        }
        let data = matmul_kernel(self.as_slice(), rhs.as_slice(), m, k, 1);
        Ok(TensorData::from_raw(data, Layout::from_shape(&[m]), false))
    }
}

/// `[a.len(), b.len()]` matrix with entries `a[i] * b[j]`.
pub(crate) fn outer(a: &TensorData, b: &TensorData) -> TensorData {
    let data = a
        .as_slice()
        .iter()
        .flat_map(|&x| b.as_slice().iter().map(move |&y| x * y))
        .collect();
    TensorData::from_raw(data, Layout::from_shape(&[a.size(), b.size()]), false)
}

fn incompatible(lhs: &TensorData, rhs: &TensorData) -> Error {
    Error::IncompatibleShape(format!("matmul: {:?} and {:?}", lhs.shape(), rhs.shape()))
}

/// Row-major `[m, k] x [k, n]`.
fn matmul_kernel(a: &[f64], b: &[f64], m: usize, k: usize, n: usize) -> Vec<f64> {
    let mut out = vec![0.0; m * n];
    if out.is_empty() {
        return out;
    }

    let row = |(i, out_row): (usize, &mut [f64])| {
        for p in 0..k {
            let a_ip = a[i * k + p];
            let b_row = &b[p * n..(p + 1) * n];
            for (o, &b_pj) in out_row.iter_mut().zip(b_row) {
                *o += a_ip * b_pj;
            }
        }
    };

    #[cfg(feature = "parallel")]
    out.par_chunks_mut(n).enumerate().for_each(row);
    #[cfg(not(feature = "parallel"))]
    out.chunks_mut(n).enumerate().for_each(row);

    out
}
