use crate::{ScalarGraph, ScalarNode, ScalarOp, ValueId};
use migrad_core::graph::post_order;
use tracing::{debug, trace, warn};

impl ScalarGraph {
    /// Depth-first post-order of every node reachable from `root`; each node
    /// appears once and after all of its parents.
    pub fn topo_order(&self, root: ValueId) -> Vec<ValueId> {
        let nodes = self.nodes.borrow();
        post_order(root.0, nodes.len(), |id, k| nodes[id].parents.get(k).map(|p| p.0))
            .into_iter()
            .map(ValueId)
            .collect()
    }

    /// Accumulates `d root / d node` into the gradient of every node reachable
    /// from `root`. The root's own gradient is set to 1.
    pub fn backward(&self, root: ValueId) {
        let order = self.topo_order(root);
        debug!(target: "migrad::scalar", root = root.0, nodes = order.len(), "backward");

        let mut nodes = self.nodes.borrow_mut();
        nodes[root.0].grad = 1.0;

        for &id in order.iter().rev() {
            trace!(target: "migrad::scalar", node = id.0, op = %nodes[id.0].op.label(), "local backward");
            apply_local_backward(&mut nodes, id);
        }

        if order.iter().any(|id| !nodes[id.0].grad.is_finite()) {
            warn!(target: "migrad::scalar", root = root.0, "backward produced a non-finite gradient");
        }
    }

    /// Resets the gradient of every node reachable from `root`.
    pub fn zero_grad(&self, root: ValueId) {
        let order = self.topo_order(root);
        let mut nodes = self.nodes.borrow_mut();
        for id in order {
            nodes[id.0].grad = 0.0;
        }
    }
}

fn apply_local_backward(nodes: &mut [ScalarNode], id: ValueId) {
    let node = &nodes[id.0];
    let (op, out_data, out_grad) = (node.op, node.data, node.grad);
    let (first, second) = (node.parents.first().copied(), node.parents.get(1).copied());

    match (op, first, second) {
        (ScalarOp::Leaf, _, _) => {}
        (ScalarOp::Add, Some(lhs), Some(rhs)) => {
            nodes[lhs.0].grad += out_grad;
            nodes[rhs.0].grad += out_grad;
        }
        (ScalarOp::Mul, Some(lhs), Some(rhs)) => {
            let (l_data, r_data) = (nodes[lhs.0].data, nodes[rhs.0].data);
            nodes[lhs.0].grad += r_data * out_grad;
            nodes[rhs.0].grad += l_data * out_grad;
        }
        (ScalarOp::Pow(exponent), Some(base), None) => {
            let b_data = nodes[base.0].data;
            nodes[base.0].grad += exponent * b_data.powf(exponent - 1.0) * out_grad;
        }
        (ScalarOp::Relu, Some(input), None) => {
            if nodes[input.0].data > 0.0 {
                nodes[input.0].grad += out_grad;
            }
        }
        (ScalarOp::Exp, Some(input), None) => {
            nodes[input.0].grad += out_data * out_grad;
        }
        (ScalarOp::Tanh, Some(input), None) => {
            nodes[input.0].grad += (1.0 - out_data * out_data) * out_grad;
        }
        (op, _, _) => {
            warn!(target: "migrad::scalar", node = id.0, ?op, "malformed node skipped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topo_order_lists_parents_first() {
        let graph = ScalarGraph::new();
        let a = graph.leaf(1.0);
        let b = graph.leaf(2.0);
        let c = a.mul(b);
        let d = c.add(a);

        let order = graph.topo_order(d.id());
        let pos = |v: ValueId| order.iter().position(|&x| x == v);

        assert_eq!(order.len(), 4);
        assert!(pos(a.id()) < pos(c.id()));
        assert!(pos(b.id()) < pos(c.id()));
        assert!(pos(c.id()) < pos(d.id()));
        assert_eq!(order.last(), Some(&d.id()));
    }

    #[test]
    fn topo_order_skips_unreachable_nodes() {
        let graph = ScalarGraph::new();
        let a = graph.leaf(1.0);
        let _unused = graph.leaf(5.0);
        let b = a.relu();

        assert_eq!(graph.topo_order(b.id()), vec![a.id(), b.id()]);
    }
}
