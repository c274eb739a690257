use crate::{
    data::{
        indexing::{gather_backward, index_backward},
        matmul::outer,
        reduction::{class_rows, softmax_cols},
    },
    IndexData, TensorData, TensorGraph, TensorId, TensorNode, TensorOp,
};
use migrad_core::{
    error::{Error, Result},
    graph::post_order,
};
use tracing::{debug, trace, warn};

impl TensorGraph {
    /// Depth-first post-order of every node reachable from `root`.
    pub fn topo_order(&self, root: TensorId) -> Vec<TensorId> {
        let nodes = self.nodes.borrow();
        post_order(root.0, nodes.len(), |id, k| nodes[id].parents.get(k).map(|p| p.0))
            .into_iter()
            .map(TensorId)
            .collect()
    }

    /// Accumulates `d root / d node` into the gradient of every node reachable
    /// from `root`. The root's gradient is overwritten with ones.
    pub fn backward(&self, root: TensorId) -> Result<()> {
        let order = self.topo_order(root);
        debug!(target: "migrad::tensor", root = root.0, nodes = order.len(), "backward");

        let mut nodes = self.nodes.borrow_mut();
        let seed = TensorData::full_like(&nodes[root.0].data, 1.0);
        nodes[root.0].grad = Some(seed);

        for &id in order.iter().rev() {
            trace!(target: "migrad::tensor", node = id.0, op = nodes[id.0].op.label(), "local backward");
            for (parent, contribution) in local_gradients(&nodes, id)? {
                accumulate(&mut nodes[parent.0], contribution)?;
            }
        }

        let non_finite = order.iter().any(|id| {
            nodes[id.0]
                .grad
                .as_ref()
                .is_some_and(|g| g.as_slice().iter().any(|x| !x.is_finite()))
        });
        if non_finite {
            warn!(target: "migrad::tensor", root = root.0, "backward produced a non-finite gradient");
        }
        Ok(())
    }

    /// Clears the gradient of every node reachable from `root`.
    pub fn zero_grad(&self, root: TensorId) {
        let order = self.topo_order(root);
        let mut nodes = self.nodes.borrow_mut();
        for id in order {
            nodes[id.0].grad = None;
        }
    }
}

fn accumulate(node: &mut TensorNode, contribution: TensorData) -> Result<()> {
    match node.grad.as_mut() {
        Some(grad) => grad.add_assign(&contribution),
        None => {
            if contribution.size() != node.data.size() {
                return Err(Error::ShapeMismatch {
                    expected: node.data.size(),
                    got: contribution.size(),
                    msg: "gradient for node".to_string(),
                });
            }
            node.grad = Some(contribution);
            Ok(())
        }
    }
}

/// Gradient contributions from node `id` to each of its parents.
fn local_gradients(nodes: &[TensorNode], id: TensorId) -> Result<Vec<(TensorId, TensorData)>> {
    let node = &nodes[id.0];
    let Some(grad) = node.grad.as_ref() else {
        return Ok(Vec::new());
    };
    let operand = |k: usize| -> Result<(TensorId, &TensorData)> {
        node.parents
            .get(k)
            .map(|&p| (p, &nodes[p.0].data))
            .ok_or_else(|| Error::InvalidArgument(format!("{} node {} is missing operand {}", node.op.label(), id.0, k)))
    };

    let contributions = match &node.op {
        TensorOp::Leaf => Vec::new(),
        TensorOp::Add => {
            let (a, a_data) = operand(0)?;
            let (b, b_data) = operand(1)?;
            vec![(a, reduce_to(grad, a_data)?), (b, reduce_to(grad, b_data)?)]
        }
        TensorOp::MatMul => {
            let (a, a_data) = operand(0)?;
            let (b, b_data) = operand(1)?;
            let (ga, gb) = matmul_backward(grad, a_data, b_data)?;
            vec![(a, ga), (b, gb)]
        }
        TensorOp::Tanh => {
            let (x, _) = operand(0)?;
            let local = node.data.map(|y| 1.0 - y * y);
            vec![(x, grad.mul(&local)?)]
        }
        TensorOp::Neg => {
            let (x, _) = operand(0)?;
            vec![(x, grad.neg())]
        }
        TensorOp::Log => {
            let (x, x_data) = operand(0)?;
            vec![(x, grad.div(x_data)?)]
        }
        TensorOp::Mean => {
            let (x, x_data) = operand(0)?;
            let share = grad.item()? / x_data.size() as f64;
            vec![(x, TensorData::full_like(x_data, share))]
        }
        TensorOp::Softmax { dim } => {
            let (x, _) = operand(0)?;
            vec![(x, softmax_backward(&node.data, grad, *dim)?)]
        }
        TensorOp::CrossEntropy { target } => {
            let (x, x_data) = operand(0)?;
            vec![(x, cross_entropy_backward(x_data, target, grad.item()?)?)]
        }
        TensorOp::Gather { dim, index } => {
            let (x, x_data) = operand(0)?;
            vec![(x, gather_backward(x_data.shape(), *dim, index, grad)?)]
        }
        TensorOp::Index { by } => {
            let (x, x_data) = operand(0)?;
            vec![(x, index_backward(x_data.shape(), by, grad)?)]
        }
        TensorOp::View => {
            let (x, x_data) = operand(0)?;
            vec![(x, grad.reshape(x_data.shape())?)]
        }
    };
    Ok(contributions)
}

/// Brings an upstream gradient back to the shape of an operand, summing over
/// the positions a single-value operand was broadcast to.
fn reduce_to(grad: &TensorData, target: &TensorData) -> Result<TensorData> {
    if grad.size() == target.size() {
        return TensorData::from_parts(target.shape(), grad.to_flatten_vec(), target.is_scalar());
    }
    if target.size() == 1 {
        let total = grad.as_slice().iter().sum();
        return TensorData::from_parts(target.shape(), vec![total], target.is_scalar());
    }
    Err(Error::IncompatibleShape(format!(
        "cannot reduce gradient {:?} to operand {:?}",
        grad.shape(),
        target.shape()
    )))
}

fn matmul_backward(grad: &TensorData, a: &TensorData, b: &TensorData) -> Result<(TensorData, TensorData)> {
    match (a.ndim(), b.ndim()) {
        (1, 1) => {
            let ga = reduce_to(&grad.mul_1d(b)?, a)?;
            let gb = reduce_to(&grad.mul_1d(a)?, b)?;
            Ok((ga, gb))
        }
        // [m, k] x [k, n]
        (2, 2) => Ok((grad.matmul(&b.transpose()?)?, a.transpose()?.matmul(grad)?)),
        // [k] x [k, n]
        (1, 2) => Ok((b.matmul(grad)?, outer(a, grad))),
        // [m, k] x [k]
        (2, 1) => Ok((outer(grad, b), a.transpose()?.matmul(grad)?)),
        (l, r) => Err(Error::UnsupportedOperation(format!(
            "matmul backward for {}D and {}D operands",
            l, r
        ))),
    }
}

/// `dx_i = y_i * (g_i - sum_j g_j * y_j)` row by row.
fn softmax_backward(y: &TensorData, grad: &TensorData, dim: usize) -> Result<TensorData> {
    let cols = softmax_cols(y.shape(), dim)?;
    let mut out = Vec::with_capacity(y.size());
    if cols > 0 {
        for (y_row, g_row) in y.as_slice().chunks(cols).zip(grad.as_slice().chunks(cols)) {
            let dot: f64 = y_row.iter().zip(g_row).map(|(y, g)| y * g).sum();
            out.extend(y_row.iter().zip(g_row).map(|(y, g)| y * (g - dot)));
        }
    }
    Ok(TensorData::from_raw(out, y.layout().clone(), false))
}

/// `(softmax(x) - onehot(target)) * g / N`.
fn cross_entropy_backward(logits: &TensorData, target: &IndexData, scale: f64) -> Result<TensorData> {
    let (rows, cols) = class_rows(logits.shape())?;
    let mut probs = logits.softmax(logits.ndim() - 1)?;
    let data = probs.as_mut_slice();
    for (r, &t) in target.as_slice().iter().enumerate().take(rows) {
        data[r * cols + t] -= 1.0;
    }
    Ok(probs.scale(scale / rows as f64))
}
