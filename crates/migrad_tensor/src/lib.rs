pub mod adapter;
mod backward;
mod data;
mod display;
mod ops;
#[cfg(feature = "serde")]
mod serde;

pub use data::{IndexData, TensorData};

#[cfg(feature = "serde")]
use ::serde::{Deserialize, Serialize};
use adapter::TensorAdapter;
use migrad_core::{
    error::{Error, Result},
    grad::is_grad_enabled,
};
use std::cell::RefCell;

// ────────────────────────────────────────────────────────────────────────────
//  Node
// ────────────────────────────────────────────────────────────────────────────

/// Stable index of a node inside its [`TensorGraph`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TensorId(usize);

impl TensorId {
    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}

/// The operation that produced a node. Non-differentiable operands (class
/// targets, gather indices) are stored here rather than as parents.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TensorOp {
    Leaf,
    Add,
    MatMul,
    Tanh,
    Neg,
    Log,
    Mean,
    Softmax { dim: usize },
    CrossEntropy { target: IndexData },
    Gather { dim: usize, index: IndexData },
    Index { by: IndexData },
    View,
}

impl TensorOp {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Leaf => "",
            Self::Add => "+",
            Self::MatMul => "*",
            Self::Tanh => "tanh",
            Self::Neg => "neg",
            Self::Log => "log",
            Self::Mean => "mean",
            Self::Softmax { .. } => "softmax",
            Self::CrossEntropy { .. } => "cross_entropy",
            Self::Gather { .. } => "gather",
            Self::Index { .. } => "index",
            Self::View => "view",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TensorNode {
    data: TensorData,
    grad: Option<TensorData>,
    parents: Vec<TensorId>,
    op: TensorOp,
}

impl TensorNode {
    pub fn data(&self) -> &TensorData {
        &self.data
    }

    /// `None` until a backward pass reaches this node.
    pub fn grad(&self) -> Option<&TensorData> {
        self.grad.as_ref()
    }

    pub fn parents(&self) -> &[TensorId] {
        &self.parents
    }

    pub fn op(&self) -> &TensorOp {
        &self.op
    }
}

// ────────────────────────────────────────────────────────────────────────────
//  Graph
// ────────────────────────────────────────────────────────────────────────────

/// Arena holding every tensor node of a computation.
///
/// Same shape as the scalar arena: parents always precede their consumers,
/// handles borrow the graph, and node storage is interior-mutable.
#[derive(Debug, Default)]
pub struct TensorGraph {
    nodes: RefCell<Vec<TensorNode>>,
}

impl TensorGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: RefCell::new(Vec::with_capacity(capacity)),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.borrow().is_empty()
    }

    pub fn leaf(&self, data: TensorData) -> Tensor<'_> {
        let id = self.push(data, TensorOp::Leaf, Vec::new());
        self.tensor_at(id)
    }

    /// Leaf from nested host data.
    pub fn tensor<T>(&self, data: T) -> Result<Tensor<'_>>
    where
        T: TensorAdapter<Elem = f64>,
    {
        Ok(self.leaf(TensorData::new(data)?))
    }

    /// Leaf from a flat buffer; see [`TensorData::from_parts`].
    pub fn from_parts(&self, shape: &[usize], data: Vec<f64>, scalar: bool) -> Result<Tensor<'_>> {
        Ok(self.leaf(TensorData::from_parts(shape, data, scalar)?))
    }

    pub fn zeros(&self, shape: &[usize]) -> Tensor<'_> {
        self.leaf(TensorData::zeros(shape))
    }

    pub fn randn(&self, shape: &[usize]) -> Result<Tensor<'_>> {
        Ok(self.leaf(TensorData::randn(shape)?))
    }

    pub fn rand_uniform(&self, shape: &[usize], low: f64, high: f64) -> Result<Tensor<'_>> {
        Ok(self.leaf(TensorData::rand_uniform(shape, low, high)?))
    }

    pub fn tensor_at(&self, id: TensorId) -> Tensor<'_> {
        Tensor { graph: self, id }
    }

    pub(crate) fn push(&self, data: TensorData, op: TensorOp, parents: Vec<TensorId>) -> TensorId {
        let (op, parents) = if is_grad_enabled() { (op, parents) } else { (TensorOp::Leaf, Vec::new()) };

        let mut nodes = self.nodes.borrow_mut();
        let id = TensorId(nodes.len());
        nodes.push(TensorNode {
            data,
            grad: None,
            parents,
            op,
        });
        id
    }

    /// Runs `forward` on the data of `inputs` and records the result as a node.
    pub(crate) fn record<F>(&self, inputs: &[TensorId], op: TensorOp, forward: F) -> Result<TensorId>
    where
        F: FnOnce(&[&TensorData]) -> Result<TensorData>,
    {
        let data = {
            let nodes = self.nodes.borrow();
            let operands: Vec<&TensorData> = inputs.iter().map(|id| &nodes[id.0].data).collect();
            forward(&operands)?
        };
        Ok(self.push(data, op, inputs.to_vec()))
    }

    pub fn data(&self, id: TensorId) -> TensorData {
        self.nodes.borrow()[id.0].data.clone()
    }

    pub fn with_data<F, R>(&self, id: TensorId, func: F) -> R
    where
        F: FnOnce(&TensorData) -> R,
    {
        func(&self.nodes.borrow()[id.0].data)
    }

    /// Replaces a node's value; the shape must not change.
    pub fn set_data(&self, id: TensorId, data: TensorData) -> Result<()> {
        let mut nodes = self.nodes.borrow_mut();
        let node = &mut nodes[id.0];
        if node.data.shape() != data.shape() || node.data.size() != data.size() {
            return Err(Error::DimensionMismatch {
                expected: node.data.shape().to_vec(),
                got: data.shape().to_vec(),
            });
        }
        node.data = data;
        Ok(())
    }

    /// Mutates a node's value in place with read access to its gradient.
    pub fn update<F, R>(&self, id: TensorId, func: F) -> R
    where
        F: FnOnce(&mut TensorData, Option<&TensorData>) -> R,
    {
        let mut nodes = self.nodes.borrow_mut();
        let node = &mut nodes[id.0];
        func(&mut node.data, node.grad.as_ref())
    }

    pub fn grad(&self, id: TensorId) -> Option<TensorData> {
        self.nodes.borrow()[id.0].grad.clone()
    }

    pub fn op(&self, id: TensorId) -> TensorOp {
        self.nodes.borrow()[id.0].op.clone()
    }

    pub fn parents(&self, id: TensorId) -> Vec<TensorId> {
        self.nodes.borrow()[id.0].parents.clone()
    }

    /// Drops every node created at or after index `len`.
    pub fn truncate(&self, len: usize) {
        self.nodes.borrow_mut().truncate(len);
    }

    /// Clears the gradient of every node in the arena.
    pub fn zero_grad_all(&self) {
        for node in self.nodes.borrow_mut().iter_mut() {
            node.grad = None;
        }
    }

    pub fn snapshot(&self) -> Vec<TensorNode> {
        self.nodes.borrow().clone()
    }
}

// ────────────────────────────────────────────────────────────────────────────
//  Tensor handle
// ────────────────────────────────────────────────────────────────────────────

/// A differentiable tensor: a handle to one node of a [`TensorGraph`].
#[derive(Clone, Copy)]
pub struct Tensor<'g> {
    graph: &'g TensorGraph,
    id: TensorId,
}

impl<'g> Tensor<'g> {
    #[inline]
    pub fn id(&self) -> TensorId {
        self.id
    }

    #[inline]
    pub fn graph(&self) -> &'g TensorGraph {
        self.graph
    }

    pub fn data(&self) -> TensorData {
        self.graph.data(self.id)
    }

    pub fn grad(&self) -> Option<TensorData> {
        self.graph.grad(self.id)
    }

    pub fn shape(&self) -> Vec<usize> {
        self.graph.with_data(self.id, |d| d.shape().to_vec())
    }

    pub fn ndim(&self) -> usize {
        self.graph.with_data(self.id, TensorData::ndim)
    }

    pub fn size(&self) -> usize {
        self.graph.with_data(self.id, TensorData::size)
    }

    pub fn to_flatten_vec(&self) -> Vec<f64> {
        self.graph.with_data(self.id, TensorData::to_flatten_vec)
    }

    pub fn item(&self) -> Result<f64> {
        self.graph.with_data(self.id, TensorData::item)
    }

    pub fn set_data(&self, data: TensorData) -> Result<()> {
        self.graph.set_data(self.id, data)
    }

    pub fn update<F, R>(&self, func: F) -> R
    where
        F: FnOnce(&mut TensorData, Option<&TensorData>) -> R,
    {
        self.graph.update(self.id, func)
    }

    pub fn op(&self) -> TensorOp {
        self.graph.op(self.id)
    }

    pub fn parents(&self) -> Vec<Tensor<'g>> {
        self.graph.parents(self.id).into_iter().map(|id| self.graph.tensor_at(id)).collect()
    }

    pub fn is_leaf(&self) -> bool {
        self.graph.op(self.id) == TensorOp::Leaf
    }

    pub fn backward(&self) -> Result<()> {
        self.graph.backward(self.id)
    }

    pub fn zero_grad(&self) {
        self.graph.zero_grad(self.id)
    }

    fn same_graph(&self, other: &Tensor<'g>) -> bool {
        std::ptr::eq(self.graph, other.graph)
    }
}
