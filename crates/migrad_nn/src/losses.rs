pub mod max_margin;
pub mod regularization;
