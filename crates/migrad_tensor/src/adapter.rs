use migrad_core::error::{Error, Result};

/// Nested host data that can seed a tensor buffer.
///
/// Implemented for scalars and `Vec` nestings up to rank 4. Ragged input is
/// rejected when flattening, so `to_shape` only has to look at the first
/// element of every level.
pub trait TensorAdapter: Sized {
    type Elem: Clone;

    fn to_flatten_vec(self) -> Result<Vec<Self::Elem>>;
    fn to_shape(&self) -> Vec<usize>;
}

fn check_row_len(expected: usize, got: usize, depth: usize) -> Result<()> {
    if expected != got {
        return Err(Error::ShapeMismatch {
            expected,
            got,
            msg: format!("ragged input at depth {}", depth),
        });
    }
    Ok(())
}

macro_rules! impl_tensor_adapter {
    ($t:ty) => {
        impl TensorAdapter for $t {
            type Elem = $t;

            fn to_flatten_vec(self) -> Result<Vec<$t>> {
                Ok(vec![self])
            }
            fn to_shape(&self) -> Vec<usize> {
                vec![]
            }
        }

        impl TensorAdapter for Vec<$t> {
            type Elem = $t;

            fn to_flatten_vec(self) -> Result<Vec<$t>> {
                Ok(self)
            }
            fn to_shape(&self) -> Vec<usize> {
                vec![self.len()]
            }
        }

        impl TensorAdapter for Vec<Vec<$t>> {
            type Elem = $t;

            fn to_flatten_vec(self) -> Result<Vec<$t>> {
                let cols = self.first().map_or(0, Vec::len);
                let mut flat = Vec::with_capacity(self.len() * cols);
                for row in self {
                    check_row_len(cols, row.len(), 1)?;
                    flat.extend(row);
                }
                Ok(flat)
            }
            fn to_shape(&self) -> Vec<usize> {
                match self.first() {
                    Some(row) => vec![self.len(), row.len()],
                    None => vec![0, 0],
                }
            }
        }

        impl TensorAdapter for Vec<Vec<Vec<$t>>> {
            type Elem = $t;

            fn to_flatten_vec(self) -> Result<Vec<$t>> {
                let shape = self.to_shape();
                let mut flat = Vec::new();
                for matrix in self {
                    let matrix_shape = matrix.to_shape();
                    if matrix_shape[..] != shape[1..] {
                        return Err(Error::DimensionMismatch {
                            expected: shape[1..].to_vec(),
                            got: matrix_shape,
                        });
                    }
                    flat.extend(matrix.to_flatten_vec()?);
                }
                Ok(flat)
            }
            fn to_shape(&self) -> Vec<usize> {
                match self.first() {
                    Some(matrix) => [vec![self.len()], matrix.to_shape()].concat(),
                    None => vec![0, 0, 0],
                }
            }
        }

        impl TensorAdapter for Vec<Vec<Vec<Vec<$t>>>> {
            type Elem = $t;

            fn to_flatten_vec(self) -> Result<Vec<$t>> {
                let shape = self.to_shape();
                let mut flat = Vec::new();
                for cube in self {
                    let cube_shape = cube.to_shape();
                    if cube_shape[..] != shape[1..] {
                        return Err(Error::DimensionMismatch {
                            expected: shape[1..].to_vec(),
                            got: cube_shape,
                        });
                    }
                    flat.extend(cube.to_flatten_vec()?);
                }
                Ok(flat)
            }
            fn to_shape(&self) -> Vec<usize> {
                match self.first() {
                    Some(cube) => [vec![self.len()], cube.to_shape()].concat(),
                    None => vec![0, 0, 0, 0],
                }
            }
        }
    };
}

impl_tensor_adapter!(f64);
impl_tensor_adapter!(usize);
