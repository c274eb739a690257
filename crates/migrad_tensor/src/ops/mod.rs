mod binary;
mod indexing;
mod reduction;
mod transform;
mod unary;
