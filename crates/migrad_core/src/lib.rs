pub mod error;
pub mod grad;
pub mod graph;
pub mod layout;
pub mod random;
