#![allow(dead_code)]

use migrad_core::random::with_rng;
use rand::Rng;
use std::f64::consts::PI;

/// Two interleaving half circles with labels `1` and `-1`, jittered by
/// uniform noise of width `noise`.
pub fn make_moons(n: usize, noise: f64) -> (Vec<[f64; 2]>, Vec<f64>) {
    let half = n / 2;
    with_rng(|rng| {
        let mut xs = Vec::with_capacity(n);
        let mut ys = Vec::with_capacity(n);
        for i in 0..n {
            let upper = i < half;
            let count = if upper { half } else { n - half };
            let k = if upper { i } else { i - half };
            let t = PI * k as f64 / (count.max(2) - 1) as f64;
            let (x, y) = if upper {
                (t.cos(), t.sin())
            } else {
                (1.0 - t.cos(), 0.5 - t.sin())
            };
            let jitter = |rng: &mut rand::rngs::StdRng| rng.gen_range(-noise..=noise);
            xs.push([x + jitter(rng), y + jitter(rng)]);
            ys.push(if upper { -1.0 } else { 1.0 });
        }
        (xs, ys)
    })
}
