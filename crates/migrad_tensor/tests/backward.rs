mod utils;

use migrad_core::{
    error::Result,
    grad::no_grad_mode,
    random::manual_seed,
};
use migrad_tensor::{IndexData, TensorData, TensorGraph, TensorOp};
use paste::paste;
use utils::{assert_close, check_gradients};

fn data<T>(input: T) -> TensorData
where
    T: migrad_tensor::adapter::TensorAdapter<Elem = f64>,
{
    TensorData::new(input).expect("test input")
}

macro_rules! gradient_case {
    ($name:ident: [$($input:expr),+ $(,)?], $f:expr) => {
        paste! {
            #[test]
            fn [<grad_ $name>]() -> Result<()> {
                check_gradients(&[$(data($input)),+], $f)
            }
        }
    };
}

gradient_case!(add: [vec![1.0, -2.0, 3.0], vec![0.5, 0.25, -1.0]], |x| x[0].add(x[1])?.tanh());
gradient_case!(add_scalar_broadcast: [vec![1.0, -2.0, 3.0], 0.7], |x| x[0].add(x[1])?.tanh());
gradient_case!(add_scalar_on_left: [0.7, vec![vec![1.0, 2.0], vec![-1.0, 0.0]]], |x| x[0].add(x[1])?.tanh());
gradient_case!(
    matmul_2d: [vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]], vec![vec![0.1, -0.4], vec![0.2, 0.5], vec![-0.3, 0.6]]],
    |x| x[0].matmul(x[1])?.tanh()
);
gradient_case!(
    matmul_1d_2d: [vec![0.3, -0.2, 0.1], vec![vec![0.1, -0.4], vec![0.2, 0.5], vec![-0.3, 0.6]]],
    |x| x[0].matmul(x[1])?.tanh()
);
gradient_case!(
    matmul_2d_1d: [vec![vec![0.1, 0.2, -0.3], vec![0.4, -0.5, 0.6]], vec![0.3, -0.2, 0.1]],
    |x| x[0].matmul(x[1])?.tanh()
);
gradient_case!(matmul_1d_elementwise: [vec![0.3, -0.2], vec![0.5, 0.7]], |x| x[0].matmul(x[1])?.tanh());
gradient_case!(matmul_1d_broadcast: [vec![0.3, -0.2, 0.4], vec![0.5]], |x| x[0].matmul(x[1])?.tanh());
gradient_case!(tanh: [vec![vec![0.1, -1.2], vec![2.0, 0.0]]], |x| x[0].tanh());
gradient_case!(neg: [vec![1.0, 2.0]], |x| x[0].neg()?.tanh());
gradient_case!(log: [vec![0.5, 1.5, 3.0]], |x| x[0].log()?.tanh());
gradient_case!(mean: [vec![vec![1.0, 2.0], vec![3.0, -4.0]]], |x| x[0].tanh()?.mean());
gradient_case!(softmax_rows: [vec![vec![0.1, 0.9, -0.3], vec![1.0, 0.0, 0.5]]], |x| {
    let weights = x[0].graph().tensor(vec![vec![1.0, -2.0, 0.5], vec![0.3, 0.7, -1.1]])?;
    let s = x[0].softmax(1)?;
    s.log()?.add(weights)?.tanh()
});
gradient_case!(softmax_vector: [vec![0.2, -0.1, 0.4]], |x| x[0].softmax(0)?.log()?.neg()?.tanh());
gradient_case!(cross_entropy: [vec![vec![0.2, -1.0, 0.4], vec![1.5, 0.3, -0.2]]], |x| {
    x[0].cross_entropy(&IndexData::new(vec![2usize, 0])?)
});
gradient_case!(cross_entropy_single: [vec![0.2, -1.0, 0.4]], |x| x[0].cross_entropy(&IndexData::new(vec![1usize])?));
gradient_case!(gather_repeated: [vec![vec![0.2, -1.0, 0.4], vec![1.5, 0.3, -0.2]]], |x| {
    let index = IndexData::new(vec![vec![2usize, 2], vec![0, 1]])?;
    x[0].gather(1, &index)?.tanh()
});
gradient_case!(index_frames: [vec![vec![0.2, -1.0], vec![1.5, 0.3], vec![0.4, -0.2]]], |x| {
    let by = IndexData::new(vec![vec![0usize, 2], vec![2, 2]])?;
    x[0].index(&by)?.tanh()
});
gradient_case!(view: [vec![vec![0.2, -1.0, 0.3], vec![1.5, 0.3, 0.4]]], |x| {
    let w = x[0].graph().tensor(vec![0.5, -0.5])?;
    x[0].view(&[-1, 2])?.matmul(w)?.tanh()
});

#[test]
fn matmul_backward_values() -> Result<()> {
    let graph = TensorGraph::new();
    let matrix = graph.tensor(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]])?;
    let vector = graph.tensor(vec![2.0, 1.0, 3.0])?;
    let out = matrix.matmul(vector)?;
    out.backward()?;

    assert_eq!(out.to_flatten_vec(), vec![13.0, 31.0]);
    assert_eq!(matrix.grad().map(TensorData::into_vec), Some(vec![2.0, 1.0, 3.0, 2.0, 1.0, 3.0]));
    assert_eq!(vector.grad().map(TensorData::into_vec), Some(vec![5.0, 7.0, 9.0]));
    Ok(())
}

#[test]
fn broadcast_operand_gets_summed_gradient() -> Result<()> {
    let graph = TensorGraph::new();
    let v = graph.tensor(vec![1.0, 2.0, 3.0])?;
    let s = graph.tensor(10.0)?;
    v.add(s)?.mean()?.backward()?;

    let s_grad = s.grad().expect("scalar gradient");
    assert!(s_grad.is_scalar());
    assert!((s_grad.item()? - 1.0).abs() < 1e-12);
    assert_close(&v.grad().expect("vector gradient").into_vec(), &[1.0 / 3.0; 3], 1e-12);
    Ok(())
}

#[test]
fn shared_parent_accumulates() -> Result<()> {
    let graph = TensorGraph::new();
    let x = graph.tensor(vec![0.5, -0.5])?;
    let y = x.add(x)?.add(x.tanh()?)?;
    y.backward()?;

    let expected: Vec<f64> = [0.5f64, -0.5].iter().map(|v| 2.0 + (1.0 - v.tanh().powi(2))).collect();
    assert_close(&x.grad().expect("gradient").into_vec(), &expected, 1e-12);
    Ok(())
}

#[test]
fn gradients_start_unset_and_root_is_seeded() -> Result<()> {
    let graph = TensorGraph::new();
    let a = graph.tensor(vec![vec![1.0, 2.0], vec![3.0, 4.0]])?;
    let b = a.tanh()?;
    assert!(a.grad().is_none());

    b.backward()?;
    assert_eq!(b.grad().map(TensorData::into_vec), Some(vec![1.0; 4]));
    assert_eq!(a.grad().map(|g| g.shape().to_vec()), Some(vec![2, 2]));
    Ok(())
}

#[test]
fn zero_grad_then_backward_is_idempotent() -> Result<()> {
    let graph = TensorGraph::new();
    let w = graph.tensor(vec![vec![0.1, 0.2], vec![0.3, 0.4]])?;
    let x = graph.tensor(vec![1.0, -1.0])?;
    let loss = x.matmul(w)?.tanh()?.mean()?;

    loss.backward()?;
    let first = w.grad().expect("gradient");

    loss.zero_grad();
    assert!(w.grad().is_none());
    loss.backward()?;
    assert_eq!(w.grad().expect("gradient"), first);
    Ok(())
}

#[test]
fn backward_without_zero_grad_accumulates() -> Result<()> {
    let graph = TensorGraph::new();
    let x = graph.tensor(vec![0.5, -1.0])?;
    let y = x.neg()?;

    y.backward()?;
    y.backward()?;

    assert_eq!(x.grad().map(TensorData::into_vec), Some(vec![-2.0, -2.0]));
    Ok(())
}

#[test]
fn backward_on_leaf_only_seeds_itself() -> Result<()> {
    let graph = TensorGraph::new();
    let a = graph.tensor(vec![3.0, 4.0])?;
    let unrelated = graph.tensor(vec![1.0])?;
    a.backward()?;
    assert_eq!(a.grad().map(TensorData::into_vec), Some(vec![1.0, 1.0]));
    assert!(unrelated.grad().is_none());
    Ok(())
}

#[test]
fn op_tags_record_operands() -> Result<()> {
    let graph = TensorGraph::new();
    let logits = graph.zeros(&[2, 3]);
    let target = IndexData::new(vec![0usize, 2])?;
    let loss = logits.cross_entropy(&target)?;

    assert_eq!(loss.op(), TensorOp::CrossEntropy { target });
    assert_eq!(loss.op().label(), "cross_entropy");
    assert_eq!(loss.parents()[0].id(), logits.id());
    Ok(())
}

#[test]
fn no_grad_builds_leaves() -> Result<()> {
    let graph = TensorGraph::new();
    let a = graph.tensor(vec![1.0, 2.0])?;
    let b = {
        let _guard = no_grad_mode();
        a.tanh()?
    };
    assert!(b.is_leaf());
    b.backward()?;
    assert!(a.grad().is_none());
    Ok(())
}

#[test]
fn truncate_discards_step_nodes() -> Result<()> {
    let graph = TensorGraph::new();
    let w = graph.tensor(vec![vec![0.5, -0.5], vec![0.25, 1.0]])?;
    let checkpoint = graph.len();

    for _ in 0..3 {
        let x = graph.tensor(vec![1.0, 2.0])?;
        x.matmul(w)?.tanh()?.mean()?.backward()?;
        graph.truncate(checkpoint);
    }

    assert_eq!(graph.len(), checkpoint);
    assert!(w.grad().is_some());
    Ok(())
}

/// Character-level MLP on a tiny corpus: embedding lookup, hidden tanh layer,
/// softmax classifier. The loss must drop well below its starting value.
#[test]
fn embedding_mlp_learns_tiny_corpus() -> Result<()> {
    manual_seed(42);

    const VOCAB: usize = 4;
    const BLOCK: usize = 2;
    const EMBED: usize = 3;
    const HIDDEN: usize = 16;

    // contexts of two tokens and the token that follows them
    let mut xs = IndexData::zeros(&[0, BLOCK]);
    let mut ys = IndexData::zeros(&[0]);
    for word in [[1usize, 2, 3, 0], [2, 1, 3, 0], [3, 3, 1, 0]] {
        let mut context = vec![0usize; BLOCK];
        for &ch in &word {
            xs.append_frame(&context)?;
            ys.append_frame(&[ch])?;
            context.remove(0);
            context.push(ch);
        }
    }
    let n = ys.size();

    let graph = TensorGraph::new();
    let c = graph.randn(&[VOCAB, EMBED])?;
    let w1 = graph.rand_uniform(&[BLOCK * EMBED, HIDDEN], -0.5, 0.5)?;
    let b1 = graph.zeros(&[1, HIDDEN]);
    let w2 = graph.rand_uniform(&[HIDDEN, VOCAB], -0.5, 0.5)?;
    let b2 = graph.zeros(&[1, VOCAB]);
    let params = [c, w1, b1, w2, b2];
    // biases are broadcast over the batch as ones[n, 1] x b[1, k]
    let ones = graph.leaf(TensorData::ones(&[n, 1]));
    let checkpoint = graph.len();

    let mut losses = Vec::new();
    for _ in 0..500 {
        let emb = c.index(&xs)?;
        let h = emb.reshape(&[n, BLOCK * EMBED])?.matmul(w1)?.add(ones.matmul(b1)?)?.tanh()?;
        let logits = h.matmul(w2)?.add(ones.matmul(b2)?)?;
        let loss = logits.cross_entropy(&ys)?;

        for p in &params {
            p.zero_grad();
        }
        loss.backward()?;
        losses.push(loss.item()?);

        for p in &params {
            p.update(|data, grad| match grad {
                Some(g) => data.add_assign(&g.scale(-0.5)),
                None => Ok(()),
            })?;
        }
        graph.truncate(checkpoint);
    }

    let (first, last) = (losses[0], losses[losses.len() - 1]);
    assert!(last < first * 0.5, "loss went from {} to {}", first, last);
    Ok(())
}

#[cfg(feature = "serde")]
#[test]
fn graph_dump_and_tensor_round_trip() -> Result<()> {
    let graph = TensorGraph::new();
    let t = graph.tensor(vec![vec![1.0, 2.0], vec![3.0, 4.0]])?;
    let loss = t.cross_entropy(&IndexData::new(vec![1usize, 0])?)?;
    loss.backward()?;

    let json = graph.to_json()?;
    assert!(json.contains("CrossEntropy"));

    let data = t.data();
    assert_eq!(TensorData::from_json(&data.to_json()?)?, data);
    assert_eq!(TensorData::from_bytes(&data.to_bytes()?)?, data);
    Ok(())
}
