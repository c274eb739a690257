#![allow(dead_code)]

use migrad_scalar::{ScalarGraph, Value};

pub const EPS: f64 = 1e-6;
pub const TOLERANCE: f64 = 1e-4;

/// Centered finite difference of `f` with respect to input `index`.
pub fn numeric_grad<F>(f: &F, inputs: &[f64], index: usize) -> f64
where
    F: for<'g> Fn(&[Value<'g>]) -> Value<'g>,
{
    let eval = |delta: f64| {
        let graph = ScalarGraph::new();
        let leaves: Vec<Value> = inputs
            .iter()
            .enumerate()
            .map(|(i, &x)| graph.leaf(if i == index { x + delta } else { x }))
            .collect();
        f(&leaves).data()
    };
    (eval(EPS) - eval(-EPS)) / (2.0 * EPS)
}

/// Runs `f` once, backpropagates, and compares every leaf gradient against
/// the centered finite difference.
pub fn check_gradients<F>(f: F, inputs: &[f64])
where
    F: for<'g> Fn(&[Value<'g>]) -> Value<'g>,
{
    let graph = ScalarGraph::new();
    let leaves: Vec<Value> = inputs.iter().map(|&x| graph.leaf(x)).collect();
    let out = f(&leaves);
    out.backward();

    for (i, leaf) in leaves.iter().enumerate() {
        let expected = numeric_grad(&f, inputs, i);
        assert!(
            (leaf.grad() - expected).abs() < TOLERANCE * expected.abs().max(1.0),
            "input {}: analytic {} vs numeric {}",
            i,
            leaf.grad(),
            expected
        );
    }
}
