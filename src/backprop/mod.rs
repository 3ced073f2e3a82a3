pub mod backward;
pub mod eval_config;
pub mod evaluator;
pub mod forward;
pub mod gradients;
pub mod trace;

pub use backward::backward;
pub use eval_config::EvalConfig;
pub use evaluator::Evaluator;
pub use forward::{forward, ForwardPass};
pub use gradients::{GradientDocument, Gradients};
pub use trace::{LogTracer, NoopTracer, RecordingTracer, TraceEvent, Tracer};
