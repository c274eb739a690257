use migrad_core::error::{Error, Result};
use migrad_scalar::Value;

/// Mean SVM hinge loss `relu(1 - yᵢ·sᵢ)` over a batch of scores with labels in `{-1, 1}`.
pub fn max_margin_loss<'g>(scores: &[Value<'g>], labels: &[f64]) -> Result<Value<'g>> {
    check_batch(scores, labels)?;

    let losses: Vec<Value<'g>> = scores.iter().zip(labels).map(|(&s, &y)| (1.0 - s * y).relu()).collect();
    let total = losses[1..].iter().fold(losses[0], |acc, &l| acc + l);

    Ok(total / losses.len() as f64)
}

/// Fraction of scores whose sign agrees with the label.
pub fn accuracy(scores: &[Value<'_>], labels: &[f64]) -> Result<f64> {
    check_batch(scores, labels)?;

    let correct = scores.iter().zip(labels).filter(|(s, y)| (s.data() > 0.0) == (**y > 0.0)).count();

    Ok(correct as f64 / scores.len() as f64)
}

fn check_batch(scores: &[Value<'_>], labels: &[f64]) -> Result<()> {
    if scores.len() != labels.len() {
        return Err(Error::ShapeMismatch {
            expected: scores.len(),
            got: labels.len(),
            msg: "one label per score".to_string(),
        });
    }
    if scores.is_empty() {
        return Err(Error::InvalidArgument("empty batch".to_string()));
    }
    Ok(())
}
