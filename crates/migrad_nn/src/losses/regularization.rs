use migrad_core::error::{Error, Result};
use migrad_scalar::Value;

/// `alpha * Σ p²` over `params`.
pub fn l2_regularization<'g>(params: &[Value<'g>], alpha: f64) -> Result<Value<'g>> {
    let Some((&first, rest)) = params.split_first() else {
        return Err(Error::InvalidArgument("no parameters to regularize".to_string()));
    };

    let squares = rest.iter().fold(first * first, |acc, &p| acc + p * p);
    Ok(squares * alpha)
}
