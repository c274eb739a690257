mod backward;
mod display;
mod operators;
mod ops;
#[cfg(feature = "serde")]
mod serde;

#[cfg(feature = "serde")]
use ::serde::{Deserialize, Serialize};
use migrad_core::grad::is_grad_enabled;
use std::cell::RefCell;

// ────────────────────────────────────────────────────────────────────────────
//  Node
// ────────────────────────────────────────────────────────────────────────────

/// Stable index of a node inside its [`ScalarGraph`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ValueId(usize);

impl ValueId {
    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}

/// The operation that produced a node, carrying whatever its derivative rule
/// needs beyond the parents' data.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ScalarOp {
    Leaf,
    Add,
    Mul,
    Pow(f64),
    Relu,
    Exp,
    Tanh,
}

impl ScalarOp {
    pub fn label(&self) -> String {
        match self {
            Self::Leaf => String::new(),
            Self::Add => "+".to_string(),
            Self::Mul => "*".to_string(),
            Self::Pow(exponent) => format!("^{}", exponent),
            Self::Relu => "ReLU".to_string(),
            Self::Exp => "exp".to_string(),
            Self::Tanh => "tanh".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScalarNode {
    data: f64,
    grad: f64,
    parents: Vec<ValueId>,
    op: ScalarOp,
}

impl ScalarNode {
    pub fn data(&self) -> f64 {
        self.data
    }

    pub fn grad(&self) -> f64 {
        self.grad
    }

    pub fn parents(&self) -> &[ValueId] {
        &self.parents
    }

    pub fn op(&self) -> ScalarOp {
        self.op
    }
}

// ────────────────────────────────────────────────────────────────────────────
//  Graph
// ────────────────────────────────────────────────────────────────────────────

/// Arena holding every scalar node of a computation.
///
/// Parent edges always point at earlier indices, so the arena can never hold
/// a cycle. Handles ([`Value`]) borrow the graph immutably; node storage uses
/// interior mutability so that building expressions only needs `&self`.
#[derive(Debug, Default)]
pub struct ScalarGraph {
    nodes: RefCell<Vec<ScalarNode>>,
}

impl ScalarGraph {
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

    /// Creates an input or parameter node.
    pub fn leaf(&self, data: f64) -> Value<'_> {
        let id = self.push(data, ScalarOp::Leaf, Vec::new());
        self.value(id)
    }

    pub fn value(&self, id: ValueId) -> Value<'_> {
        Value { graph: self, id }
    }

    pub(crate) fn push(&self, data: f64, op: ScalarOp, parents: Vec<ValueId>) -> ValueId {
        let (op, parents) = if is_grad_enabled() { (op, parents) } else { (ScalarOp::Leaf, Vec::new()) };

        let mut nodes = self.nodes.borrow_mut();
        let id = ValueId(nodes.len());
        nodes.push(ScalarNode {
            data,
            grad: 0.0,
            parents,
            op,
        });
        id
    }

    pub fn data(&self, id: ValueId) -> f64 {
        self.nodes.borrow()[id.0].data
    }

    pub fn set_data(&self, id: ValueId, data: f64) {
        self.nodes.borrow_mut()[id.0].data = data;
    }

    pub fn grad(&self, id: ValueId) -> f64 {
        self.nodes.borrow()[id.0].grad
    }

    pub fn set_grad(&self, id: ValueId, grad: f64) {
        self.nodes.borrow_mut()[id.0].grad = grad;
    }

    pub fn op(&self, id: ValueId) -> ScalarOp {
        self.nodes.borrow()[id.0].op
    }

    pub fn parents(&self, id: ValueId) -> Vec<ValueId> {
        self.nodes.borrow()[id.0].parents.clone()
    }

    /// Drops every node created at or after index `len`.
    ///
    /// Nodes below `len` never reference later ones, so the remaining arena is
    /// still well formed. Handles to dropped nodes must not be used afterwards.
    pub fn truncate(&self, len: usize) {
        self.nodes.borrow_mut().truncate(len);
    }

    /// Resets the gradient of every node in the arena.
    pub fn zero_grad_all(&self) {
        for node in self.nodes.borrow_mut().iter_mut() {
            node.grad = 0.0;
        }
    }

    /// Copy of the arena for inspection.
    pub fn snapshot(&self) -> Vec<ScalarNode> {
        self.nodes.borrow().clone()
    }
}

// ────────────────────────────────────────────────────────────────────────────
//  Value handle
// ────────────────────────────────────────────────────────────────────────────

/// A differentiable real number: a handle to one node of a [`ScalarGraph`].
#[derive(Clone, Copy)]
pub struct Value<'g> {
    graph: &'g ScalarGraph,
    id: ValueId,
}

impl<'g> Value<'g> {
    #[inline]
    pub fn id(&self) -> ValueId {
        self.id
    }

    #[inline]
    pub fn graph(&self) -> &'g ScalarGraph {
        self.graph
    }

    pub fn data(&self) -> f64 {
        self.graph.data(self.id)
    }

    pub fn set_data(&self, data: f64) {
        self.graph.set_data(self.id, data)
    }

    pub fn grad(&self) -> f64 {
        self.graph.grad(self.id)
    }

    pub fn set_grad(&self, grad: f64) {
        self.graph.set_grad(self.id, grad)
    }

    pub fn op(&self) -> ScalarOp {
        self.graph.op(self.id)
    }

    pub fn parents(&self) -> Vec<Value<'g>> {
        self.graph.parents(self.id).into_iter().map(|id| self.graph.value(id)).collect()
    }

    pub fn is_leaf(&self) -> bool {
        self.graph.op(self.id) == ScalarOp::Leaf
    }

    pub fn backward(&self) {
        self.graph.backward(self.id)
    }

    pub fn zero_grad(&self) {
        self.graph.zero_grad(self.id)
    }

    pub fn render_graph(&self) -> String {
        self.graph.render_graph(self.id)
    }

    fn constant(&self, data: f64) -> Value<'g> {
        self.graph.leaf(data)
    }

    fn same_graph(&self, other: &Value<'g>) -> bool {
        std::ptr::eq(self.graph, other.graph)
    }
}
