mod utils;

use migrad_core::error::{Error, Result};
use migrad_tensor::{IndexData, TensorGraph};

#[test]
fn index_repeats_frames() -> Result<()> {
    let graph = TensorGraph::new();
    let t = graph.tensor(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]])?;
    let by = IndexData::new(vec![0usize, 1, 0, 1, 0, 1])?;
    let out = t.index(&by)?;

    assert_eq!(out.shape(), vec![6, 3]);
    assert_eq!(
        out.to_flatten_vec(),
        [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]].repeat(3).concat()
    );
    Ok(())
}

#[test]
fn index_with_matrix_of_ids_builds_embeddings() -> Result<()> {
    // vocabulary of 4 tokens with 2-dim embeddings, a minibatch of 2 contexts of 3 tokens
    let graph = TensorGraph::new();
    let table = graph.from_parts(&[4, 2], (0..8).map(f64::from).collect(), false)?;
    let contexts = IndexData::new(vec![vec![0usize, 0, 3], vec![1, 2, 3]])?;
    let emb = table.index(&contexts)?;

    assert_eq!(emb.shape(), vec![2, 3, 2]);
    assert_eq!(emb.data().get(&[0, 2, 1])?, 7.0);
    assert_eq!(emb.data().get(&[1, 0, 0])?, 2.0);
    Ok(())
}

#[test]
fn index_out_of_range() -> Result<()> {
    let graph = TensorGraph::new();
    let t = graph.tensor(vec![vec![1.0, 2.0], vec![3.0, 4.0]])?;
    let err = t.index(&IndexData::new(vec![2usize])?).unwrap_err();
    assert_eq!(err, Error::IndexOutOfBounds { index: 2, size: 2 });
    Ok(())
}

#[test]
fn gather_picks_along_dim() -> Result<()> {
    let graph = TensorGraph::new();
    let t = graph.tensor(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]])?;

    let cols = t.gather(1, &IndexData::new(vec![vec![2usize, 0], vec![1, 1]])?)?;
    assert_eq!(cols.shape(), vec![2, 2]);
    assert_eq!(cols.to_flatten_vec(), vec![3.0, 1.0, 5.0, 5.0]);

    let rows = t.gather(0, &IndexData::new(vec![vec![1usize, 0, 1]])?)?;
    assert_eq!(rows.to_flatten_vec(), vec![4.0, 2.0, 6.0]);
    Ok(())
}

#[test]
fn gather_rejects_bad_indices() -> Result<()> {
    let graph = TensorGraph::new();
    let t = graph.tensor(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]])?;

    // value past the gathered dimension
    let err = t.gather(1, &IndexData::new(vec![vec![3usize]])?).unwrap_err();
    assert_eq!(err, Error::IndexOutOfBounds { index: 3, size: 3 });

    // index tensor larger than the source on a non-gathered dimension
    let tall = IndexData::new(vec![vec![0usize]; 3])?;
    assert!(matches!(t.gather(1, &tall), Err(Error::IndexOutOfBounds { .. })));

    // rank mismatch and bad dim
    assert!(matches!(t.gather(0, &IndexData::new(vec![0usize])?), Err(Error::DimensionMismatch { .. })));
    assert!(matches!(
        t.gather(2, &IndexData::new(vec![vec![0usize]])?),
        Err(Error::DimensionOutOfBounds { dim: 2, ndim: 2 })
    ));
    Ok(())
}
