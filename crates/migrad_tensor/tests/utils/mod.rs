#![allow(dead_code)]

use migrad_core::error::Result;
use migrad_tensor::{Tensor, TensorData, TensorGraph};

pub const EPS: f64 = 1e-6;
pub const TOLERANCE: f64 = 1e-4;

pub fn assert_close(actual: &[f64], expected: &[f64], tolerance: f64) {
    assert_eq!(actual.len(), expected.len(), "length mismatch: {:?} vs {:?}", actual, expected);
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!((a - e).abs() <= tolerance, "element {}: got {}, expected {}", i, a, e);
    }
}

/// Sum of the output of `f` evaluated on fresh leaves holding `inputs`.
fn evaluate<F>(inputs: &[TensorData], f: &F) -> Result<f64>
where
    F: for<'g> Fn(&[Tensor<'g>]) -> Result<Tensor<'g>>,
{
    let graph = TensorGraph::new();
    let leaves: Vec<Tensor> = inputs.iter().cloned().map(|d| graph.leaf(d)).collect();
    Ok(f(&leaves)?.to_flatten_vec().iter().sum())
}

/// Compares backward gradients of `sum(f(inputs))` against central
/// differences, element by element.
pub fn check_gradients<F>(inputs: &[TensorData], f: F) -> Result<()>
where
    F: for<'g> Fn(&[Tensor<'g>]) -> Result<Tensor<'g>>,
{
    let graph = TensorGraph::new();
    let leaves: Vec<Tensor> = inputs.iter().cloned().map(|d| graph.leaf(d)).collect();
    f(&leaves)?.backward()?;

    for (k, leaf) in leaves.iter().enumerate() {
        let analytic = leaf.grad().map(TensorData::into_vec).unwrap_or_else(|| vec![0.0; leaf.size()]);

        for i in 0..inputs[k].size() {
            let mut plus = inputs.to_vec();
            plus[k].as_mut_slice()[i] += EPS;
            let mut minus = inputs.to_vec();
            minus[k].as_mut_slice()[i] -= EPS;

            let numeric = (evaluate(&plus, &f)? - evaluate(&minus, &f)?) / (2.0 * EPS);
            assert!(
                (analytic[i] - numeric).abs() <= TOLERANCE * (1.0 + numeric.abs()),
                "input {} element {}: analytic {} vs numeric {}",
                k,
                i,
                analytic[i],
                numeric
            );
        }
    }
    Ok(())
}
