use crate::{
    adapter::TensorAdapter,
    data::{creation::grown_shape, indexing::select_frames},
};
use migrad_core::{
    error::{Error, Result},
    layout::Layout,
    random::with_rng,
};
use rand::distributions::{Distribution, Uniform};
use std::fmt;

/// Dense row-major buffer of integer indices.
///
/// Used for vocabulary lookups, class targets and gather indices; it never
/// takes part in differentiation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexData {
    data: Vec<usize>,
    layout: Layout,
}

impl IndexData {
    pub fn new<T>(data: T) -> Result<Self>
    where
        T: TensorAdapter<Elem = usize>,
    {
        let shape = data.to_shape();
        Self::from_shape_vec(&shape, data.to_flatten_vec()?)
    }

    pub fn from_shape_vec(shape: &[usize], data: Vec<usize>) -> Result<Self> {
        let layout = Layout::from_shape(shape);
        if data.len() != layout.size() {
            return Err(Error::ShapeMismatch {
                expected: layout.size(),
                got: data.len(),
                msg: format!("index buffer for shape {:?}", shape),
            });
        }
        Ok(Self { data, layout })
    }

    pub fn zeros(shape: &[usize]) -> Self {
        let layout = Layout::from_shape(shape);
        Self {
            data: vec![0; layout.size()],
            layout,
        }
    }

    /// Integers drawn uniformly from `[low, high)`.
    pub fn random_uniform(shape: &[usize], low: usize, high: usize) -> Result<Self> {
        let mut index = Self::zeros(shape);
        index.randomize_uniform(low, high)?;
        Ok(index)
    }

    pub fn randomize_uniform(&mut self, low: usize, high: usize) -> Result<()> {
        if low >= high {
            return Err(Error::InvalidArgument(format!("uniform range [{}, {}) is empty", low, high)));
        }
        let uniform = Uniform::new(low, high);
        with_rng(|rng| {
            for x in self.data.iter_mut() {
                *x = uniform.sample(rng);
            }
        });
        Ok(())
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
    pub fn size(&self) -> usize {
        self.data.len()
    }
    pub fn as_slice(&self) -> &[usize] {
        &self.data
    }
    pub fn to_flatten_vec(&self) -> Vec<usize> {
        self.data.clone()
    }

    pub fn get(&self, indices: &[usize]) -> Result<usize> {
        Ok(self.data[self.layout.flat_index(indices)?])
    }

    pub fn set(&mut self, indices: &[usize], value: usize) -> Result<()> {
        let offset = self.layout.flat_index(indices)?;
        self.data[offset] = value;
        Ok(())
    }

    pub fn append_frame(&mut self, frame: &[usize]) -> Result<()> {
        let shape = grown_shape(self.shape(), frame.len())?;
        self.data.extend_from_slice(frame);
        self.layout = Layout::from_shape(&shape);
        Ok(())
    }

    pub fn reshape(&self, shape: &[usize]) -> Result<Self> {
        let mut layout = self.layout.clone();
        layout.reshape(shape)?;
        Ok(Self {
            data: self.data.clone(),
            layout,
        })
    }

    /// Selects whole frames along the leading dimension; see
    /// [`TensorData::index`](crate::TensorData::index).
    pub fn index(&self, by: &IndexData) -> Result<IndexData> {
        let (data, shape) = select_frames(&self.data, self.shape(), by)?;
        Self::from_shape_vec(&shape, data)
    }
}

impl fmt::Display for IndexData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IndexData(shape={:?}, data={:?})", self.shape(), self.data)
    }
}
