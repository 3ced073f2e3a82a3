pub mod finite_diff;

pub use finite_diff::{max_relative_error, numerical_gradients, relative_error};
