use migrad::prelude::*;
use rand::seq::SliceRandom;
use std::collections::{BTreeSet, HashMap};

const BLOCK_SIZE: usize = 3;
const EMBEDDINGS_SIZE: usize = 10;
const HIDDEN_LAYER_SIZE: usize = 200;
const MINIBATCH_SIZE: usize = 32;
const LEARNING_RATE: f64 = 0.1;
const PRINT_EVERY: usize = 100;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    manual_seed(42);

    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "names.txt".to_string());
    let epochs: usize = args.next().map(|s| s.parse()).transpose()?.unwrap_or(1000);

    let mut words: Vec<String> = std::fs::read_to_string(&path)?
        .lines()
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(String::from)
        .collect();
    println!("words in file: {}", words.len());

    let vocab: Vec<char> = words
        .iter()
        .flat_map(|w| w.chars())
        .chain(std::iter::once('.'))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let stoi: HashMap<char, usize> = vocab.iter().enumerate().map(|(i, &c)| (c, i)).collect();
    println!("vocabulary: {:?}", vocab);

    migrad::core::random::with_rng(|rng| words.shuffle(rng));
    let n1 = (0.8 * words.len() as f64) as usize;
    let n2 = (0.9 * words.len() as f64) as usize;

    let (xtr, ytr) = build_dataset(&words[..n1], &stoi)?;
    let (xval, yval) = build_dataset(&words[n1..n2], &stoi)?;
    let (xte, yte) = build_dataset(&words[n2..], &stoi)?;
    println!("train {:?} {:?}", xtr.shape(), ytr.shape());
    println!("val   {:?} {:?}", xval.shape(), yval.shape());
    println!("test  {:?} {:?}", xte.shape(), yte.shape());

    let graph = TensorGraph::new();
    let c = graph.randn(&[vocab.len(), EMBEDDINGS_SIZE])?;
    let w1 = graph.randn(&[EMBEDDINGS_SIZE * BLOCK_SIZE, HIDDEN_LAYER_SIZE])?;
    let b1 = graph.randn(&[1, HIDDEN_LAYER_SIZE])?;
    let w2 = graph.randn(&[HIDDEN_LAYER_SIZE, vocab.len()])?;
    let b2 = graph.randn(&[1, vocab.len()])?;
    let parameters = [c, w1, b1, w2, b2];
    let ones = graph.leaf(TensorData::ones(&[MINIBATCH_SIZE, 1]));
    let checkpoint = graph.len();

    println!("number of parameters: {}", parameters.iter().map(|p| p.size()).sum::<usize>());

    let mut optimizer = migrad::nn::Sgd::new(LEARNING_RATE);
    for epoch in 0..epochs {
        let ix = IndexData::random_uniform(&[MINIBATCH_SIZE], 0, xtr.shape()[0])?;
        let emb = c.index(&xtr.index(&ix)?)?;
        let h = emb
            .view(&[MINIBATCH_SIZE as isize, -1])?
            .matmul(w1)?
            .add(ones.matmul(b1)?)?
            .tanh()?;
        let logits = h.matmul(w2)?.add(ones.matmul(b2)?)?;
        let loss = logits.cross_entropy(&ytr.index(&ix)?)?;

        for p in &parameters {
            p.zero_grad();
        }
        loss.backward()?;
        optimizer.step_tensors(&parameters)?;

        if epoch % PRINT_EVERY == 0 {
            println!("epoch {} loss {:.4}", epoch, loss.item()?);
        }
        graph.truncate(checkpoint);
    }

    Ok(())
}

/// Sliding `BLOCK_SIZE` windows over the words, each terminated by `.`, paired
/// with the character that follows the window. The context carries over from
/// one word to the next.
fn build_dataset(words: &[String], stoi: &HashMap<char, usize>) -> Result<(IndexData, IndexData)> {
    let mut xs = IndexData::zeros(&[0, BLOCK_SIZE]);
    let mut ys = IndexData::zeros(&[0]);
    let mut context = vec![0usize; BLOCK_SIZE];

    for word in words {
        for ch in word.chars().chain(std::iter::once('.')) {
            let ix = stoi.get(&ch).copied().unwrap_or(0);
            xs.append_frame(&context)?;
            ys.append_frame(&[ix])?;
            context.remove(0);
            context.push(ix);
        }
    }

    Ok((xs, ys))
}
