use migrad::nn::*;
use migrad::prelude::*;
use rand::Rng;
use std::f64::consts::PI;

const SAMPLES: usize = 100;
const STEPS: usize = 100;
const ALPHA: f64 = 1e-4;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    manual_seed(1337);

    let (xs, ys) = make_moons(SAMPLES, 0.1);

    let graph = ScalarGraph::new();
    let mlp = Mlp::new(&graph, 2, &[9, 9, 1]);
    let checkpoint = graph.len();
    println!("{}", mlp);
    println!("number of parameters: {}", mlp.parameters().len());

    let mut optimizer = Sgd::new(1.0);
    for k in 0..STEPS {
        let (loss, acc) = moons_loss(&graph, &mlp, &xs, &ys)?;

        mlp.zero_grad();
        loss.backward();

        optimizer.set_learning_rate(1.0 - 0.9 * k as f64 / STEPS as f64);
        optimizer.step(&mlp.parameters())?;

        println!("step {} loss {:.6} accuracy {:.2}", k, loss.data(), acc);
        graph.truncate(checkpoint);
    }

    Ok(())
}

fn moons_loss<'g>(graph: &'g ScalarGraph, mlp: &Mlp<'g>, xs: &[[f64; 2]], ys: &[f64]) -> Result<(Value<'g>, f64)> {
    let scores = xs
        .iter()
        .map(|x| Ok(mlp.forward(&[graph.leaf(x[0]), graph.leaf(x[1])])?[0]))
        .collect::<Result<Vec<_>>>()?;

    let total = max_margin_loss(&scores, ys)? + l2_regularization(&mlp.parameters(), ALPHA)?;
    Ok((total, accuracy(&scores, ys)?))
}

fn make_moons(n: usize, noise: f64) -> (Vec<[f64; 2]>, Vec<f64>) {
    let half = n / 2;
    migrad::core::random::with_rng(|rng| {
        (0..n)
            .map(|i| {
                let upper = i < half;
                let (k, count) = if upper { (i, half) } else { (i - half, n - half) };
                let t = PI * k as f64 / (count.max(2) - 1) as f64;
                let (x, y) = if upper { (t.cos(), t.sin()) } else { (1.0 - t.cos(), 0.5 - t.sin()) };
                let point = [x + rng.gen_range(-noise..=noise), y + rng.gen_range(-noise..=noise)];
                (point, if upper { -1.0 } else { 1.0 })
            })
            .unzip()
    })
}
