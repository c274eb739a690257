mod utils;

use migrad_core::error::{Error, Result};
use migrad_tensor::TensorGraph;

#[test]
fn reshape_round_trip() -> Result<()> {
    let graph = TensorGraph::new();
    let t = graph.from_parts(&[2, 3, 4], (0..24).map(f64::from).collect(), false)?;

    let flat = t.reshape(&[6, 4])?;
    let back = flat.reshape(&[2, 3, 4])?;

    assert_eq!(flat.size(), 24);
    assert_eq!(back.shape(), vec![2, 3, 4]);
    assert_eq!(back.to_flatten_vec(), t.to_flatten_vec());
    Ok(())
}

#[test]
fn view_infers_minus_one() -> Result<()> {
    let graph = TensorGraph::new();
    let t = graph.zeros(&[32, 3, 10]);

    let v = t.view(&[32, -1])?;
    assert_eq!(v.shape(), vec![32, 30]);

    let back = v.view(&[-1, 3, 10])?;
    assert_eq!(back.shape(), vec![32, 3, 10]);
    Ok(())
}

#[test]
fn element_count_must_match() -> Result<()> {
    let graph = TensorGraph::new();
    let t = graph.zeros(&[2, 3]);

    assert!(matches!(t.reshape(&[4, 2]), Err(Error::ShapeMismatch { expected: 6, got: 8, .. })));
    assert!(t.view(&[-1, 4]).unwrap_err().is_shape_error());
    assert!(matches!(t.view(&[-1, -1]), Err(Error::InvalidArgument(_))));
    Ok(())
}
