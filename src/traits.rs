//! Trait definitions

mod operator;

pub use operator::LinearOperator;
