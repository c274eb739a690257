use crate::error::{Error, Result};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Row-major shape and strides of a dense buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Layout {
    shape: Vec<usize>,
    strides: Vec<usize>,
}

impl Layout {
    pub fn from_shape(shape: &[usize]) -> Self {
        Self {
            shape: shape.to_vec(),
            strides: Self::compute_strides(shape),
        }
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }
    pub fn dim_size(&self, dim: usize) -> Option<usize> {
        self.shape.get(dim).copied()
    }
    pub fn size(&self) -> usize {
        self.shape.iter().product()
    }
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Replaces the shape, keeping the element count.
    pub fn reshape(&mut self, new_shape: &[usize]) -> Result<()> {
        let old_size = self.size();
        let new_size = Self::compute_size(new_shape);

        if old_size != new_size {
            return Err(Error::ShapeMismatch {
                expected: old_size,
                got: new_size,
                msg: format!("cannot reshape {:?} to {:?}", self.shape, new_shape),
            });
        }

        self.shape = new_shape.to_vec();
        self.strides = Self::compute_strides(new_shape);

        Ok(())
    }

    /// Like [`Layout::reshape`], but one dimension may be `-1` and is inferred
    /// as `size / product(other dims)`.
    pub fn view(&mut self, new_shape: &[isize]) -> Result<()> {
        let resolved = Self::resolve_view_shape(self.size(), new_shape)?;
        self.reshape(&resolved)
    }

    /// Row-major flat offset of `indices`.
    pub fn flat_index(&self, indices: &[usize]) -> Result<usize> {
        if indices.len() != self.ndim() {
            return Err(Error::DimensionMismatch {
                expected: self.shape.clone(),
                got: indices.to_vec(),
            });
        }

        let mut offset = 0;
        for ((&idx, &dim), &stride) in indices.iter().zip(self.shape.iter()).zip(self.strides.iter()) {
            if idx >= dim {
                return Err(Error::IndexOutOfBounds { index: idx, size: dim });
            }
            offset += idx * stride;
        }
        Ok(offset)
    }

    /// Inverse of [`Layout::flat_index`].
    pub fn unravel_index(&self, mut flat: usize) -> Vec<usize> {
        let mut indices = vec![0; self.ndim()];
        for (d, &stride) in self.strides.iter().enumerate() {
            if stride == 0 {
                continue;
            }
            indices[d] = flat / stride;
            flat %= stride;
        }
        indices
    }

    // helper

    pub fn compute_strides(shape: &[usize]) -> Vec<usize> {
        // Handle scalar case (empty shape)
        if shape.is_empty() {
            return vec![];
        }

        let mut strides = vec![1; shape.len()];
        for i in (0..shape.len() - 1).rev() {
            strides[i] = strides[i + 1] * shape[i + 1];
        }
        strides
    }

    pub fn compute_size(shape: &[usize]) -> usize {
        shape.iter().product()
    }

    pub fn resolve_view_shape(size: usize, new_shape: &[isize]) -> Result<Vec<usize>> {
        let mut inferred = None;
        let mut known = 1usize;

        for (d, &dim) in new_shape.iter().enumerate() {
            match dim {
                -1 => {
                    if inferred.replace(d).is_some() {
                        return Err(Error::InvalidArgument(
                            "view: only one dimension can be inferred".to_string(),
                        ));
                    }
                }
                dim if dim < 0 => {
                    return Err(Error::InvalidArgument(format!("view: invalid dimension {}", dim)));
                }
                dim => known *= dim as usize,
            }
        }

        let mut resolved: Vec<usize> = new_shape.iter().map(|&d| d.max(0) as usize).collect();
        if let Some(d) = inferred {
            if known == 0 || size % known != 0 {
                return Err(Error::ShapeMismatch {
                    expected: size,
                    got: known,
                    msg: format!("view: cannot infer dimension {} of {:?}", d, new_shape),
                });
            }
            resolved[d] = size / known;
        }

        Ok(resolved)
    }
}
