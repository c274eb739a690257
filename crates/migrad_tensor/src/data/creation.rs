use crate::{adapter::TensorAdapter, TensorData};
use migrad_core::{
    error::{Error, Result},
    layout::Layout,
    random::with_rng,
};
use rand::distributions::{Distribution, Uniform};
use rand_distr::Normal;

impl TensorData {
    /// Builds a tensor from nested host data. A bare `f64` becomes a
    /// scalar-broadcast tensor of shape `[]`.
    pub fn new<T>(data: T) -> Result<Self>
    where
        T: TensorAdapter<Elem = f64>,
    {
        let shape = data.to_shape();
        let scalar = shape.is_empty();
        Self::from_parts(&shape, data.to_flatten_vec()?, scalar)
    }

    pub fn from_shape_vec(shape: &[usize], data: Vec<f64>) -> Result<Self> {
        Self::from_parts(shape, data, false)
    }

    pub fn scalar(value: f64) -> Self {
        Self::from_raw(vec![value], Layout::from_shape(&[]), true)
    }

    pub fn zeros(shape: &[usize]) -> Self {
        Self::full(shape, 0.0)
    }

    pub fn ones(shape: &[usize]) -> Self {
        Self::full(shape, 1.0)
    }

    pub fn full(shape: &[usize], value: f64) -> Self {
        let layout = Layout::from_shape(shape);
        Self::from_raw(vec![value; layout.size()], layout, false)
    }

    /// Same shape, scalar flag and element count as `src`, filled with `value`.
    pub fn full_like(src: &TensorData, value: f64) -> Self {
        Self::from_raw(vec![value; src.size()], src.layout().clone(), src.is_scalar())
    }

    pub fn zeros_like(src: &TensorData) -> Self {
        Self::full_like(src, 0.0)
    }

    /// Standard normal samples drawn from the thread-local generator.
    pub fn randn(shape: &[usize]) -> Result<Self> {
        let mut tensor = Self::zeros(shape);
        tensor.randomize_normal()?;
        Ok(tensor)
    }

    /// Uniform samples in `[low, high)`.
    pub fn rand_uniform(shape: &[usize], low: f64, high: f64) -> Result<Self> {
        let mut tensor = Self::zeros(shape);
        tensor.randomize_uniform(low, high)?;
        Ok(tensor)
    }

    pub fn fill(&mut self, value: f64) {
        self.as_mut_slice().fill(value);
    }

    pub fn randomize_normal(&mut self) -> Result<()> {
        let normal = Normal::new(0.0, 1.0).map_err(|_e| Error::External {
            message: "Failed to create normal distribution with mean=0.0 and std=1.0".to_string(),
        })?;
        with_rng(|rng| {
            for x in self.as_mut_slice() {
                *x = normal.sample(rng);
            }
        });
        Ok(())
    }

    pub fn randomize_uniform(&mut self, low: f64, high: f64) -> Result<()> {
        let uniform = uniform_range(low, high)?;
        with_rng(|rng| {
            for x in self.as_mut_slice() {
                *x = uniform.sample(rng);
            }
        });
        Ok(())
    }

    /// Grows the leading dimension by one, appending `frame` (one slice of the
    /// trailing dimensions) to the buffer.
    pub fn append_frame(&mut self, frame: &[f64]) -> Result<()> {
        self.ensure_dense("append_frame")?;
        let shape = grown_shape(self.shape(), frame.len())?;
        self.data.extend_from_slice(frame);
        self.layout = Layout::from_shape(&shape);
        self.scalar = false;
        Ok(())
    }
}

fn uniform_range(low: f64, high: f64) -> Result<Uniform<f64>> {
    if !(low < high) || !(high - low).is_finite() {
        return Err(Error::InvalidArgument(format!("uniform range [{}, {}) is empty or unbounded", low, high)));
    }
    Ok(Uniform::new(low, high))
}

/// Shape after appending one frame of `frame_len` values.
pub(crate) fn grown_shape(shape: &[usize], frame_len: usize) -> Result<Vec<usize>> {
    let Some((&leading, trailing)) = shape.split_first() else {
        return Err(Error::UnsupportedOperation("append_frame on a 0-dimensional tensor".to_string()));
    };
    let frame_size = Layout::compute_size(trailing);
    if frame_len != frame_size {
        return Err(Error::ShapeMismatch {
            expected: frame_size,
            got: frame_len,
            msg: format!("frame for shape {:?}", shape),
        });
    }
    Ok([&[leading + 1][..], trailing].concat())
}
