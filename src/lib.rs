pub mod error;
pub mod math;
pub mod activation;
pub mod cost;
pub mod layers;
pub mod network;
pub mod backprop;
pub mod check;

// Convenience re-exports
pub use error::{Error, Result};
pub use math::matrix::Matrix;
pub use activation::sigmoid::{sigmoid, sigmoid_prime, Sigmoid};
pub use cost::quadratic::QuadraticCost;
pub use layers::dense::Layer;
pub use network::{Case, Network, ParameterFile, Topology};
pub use backprop::{EvalConfig, Evaluator, ForwardPass, Gradients, TraceEvent, Tracer};
