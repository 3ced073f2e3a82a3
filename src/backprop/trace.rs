use crate::math::matrix::Matrix;

/// One intermediate value produced during an evaluation.
///
/// `layer` is the topology index of the layer the value belongs to, so the
/// first hidden layer is `1` and the output layer is `num_layers - 1`.
#[derive(Debug, Clone, Copy)]
pub enum TraceEvent<'a> {
    PreActivation { layer: usize, z: &'a Matrix },
    Activation { layer: usize, activation: &'a Matrix },
    OutputDelta { layer: usize, delta: &'a Matrix },
    /// Everything that goes into one hidden-layer delta.
    BackwardStep {
        layer: usize,
        upstream_delta: &'a Matrix,
        transposed_weights: &'a Matrix,
        z: &'a Matrix,
        sigmoid_prime: &'a Matrix,
        propagated: &'a Matrix,
        delta: &'a Matrix,
    },
    BiasGradient { layer: usize, gradient: &'a Matrix },
    WeightGradient { layer: usize, gradient: &'a Matrix },
}

impl TraceEvent<'_> {
    pub fn layer(&self) -> usize {
        match *self {
            TraceEvent::PreActivation { layer, .. }
            | TraceEvent::Activation { layer, .. }
            | TraceEvent::OutputDelta { layer, .. }
            | TraceEvent::BackwardStep { layer, .. }
            | TraceEvent::BiasGradient { layer, .. }
            | TraceEvent::WeightGradient { layer, .. } => layer,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TraceEvent::PreActivation { .. } => "pre_activation",
            TraceEvent::Activation { .. } => "activation",
            TraceEvent::OutputDelta { .. } => "output_delta",
            TraceEvent::BackwardStep { .. } => "backward_step",
            TraceEvent::BiasGradient { .. } => "bias_gradient",
            TraceEvent::WeightGradient { .. } => "weight_gradient",
        }
    }
}

/// Observer for the intermediate values of an evaluation.
pub trait Tracer {
    fn record(&mut self, event: &TraceEvent<'_>);
}

impl<F> Tracer for F
where
    F: FnMut(&TraceEvent<'_>),
{
    fn record(&mut self, event: &TraceEvent<'_>) {
        self(event)
    }
}

/// Pins a closure to the [`Tracer`] signature so it can be passed as
/// `&mut dyn Tracer`.
pub fn from_fn<F>(f: F) -> F
where
    F: FnMut(&TraceEvent<'_>),
{
    f
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTracer;

impl Tracer for NoopTracer {
    fn record(&mut self, _event: &TraceEvent<'_>) {}
}

/// Writes every intermediate tensor to the `log` facade at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTracer;

impl Tracer for LogTracer {
    fn record(&mut self, event: &TraceEvent<'_>) {
        match *event {
            TraceEvent::PreActivation { layer, z } => {
                log::debug!("layer {layer} z = {:?}", z.data);
            }
            TraceEvent::Activation { layer, activation } => {
                log::debug!("layer {layer} activation = {:?}", activation.data);
            }
            TraceEvent::OutputDelta { layer, delta } => {
                log::debug!("layer {layer} output delta = {:?}", delta.data);
            }
            TraceEvent::BackwardStep {
                layer,
                upstream_delta,
                transposed_weights,
                z,
                sigmoid_prime,
                propagated,
                delta,
            } => {
                log::debug!("layer {layer} upstream delta = {:?}", upstream_delta.data);
                log::debug!("layer {layer} next weights transposed = {:?}", transposed_weights.data);
                log::debug!("layer {layer} z = {:?}", z.data);
                log::debug!("layer {layer} sigmoid'(z) = {:?}", sigmoid_prime.data);
                log::debug!("layer {layer} weightsᵗ·delta = {:?}", propagated.data);
                log::debug!("layer {layer} delta = {:?}", delta.data);
            }
            TraceEvent::BiasGradient { layer, gradient } => {
                log::debug!("layer {layer} bias gradient = {:?}", gradient.data);
            }
            TraceEvent::WeightGradient { layer, gradient } => {
                log::debug!("layer {layer} weight gradient = {:?}", gradient.data);
            }
        }
    }
}

/// Keeps `(name, layer)` of every event in order. Handy in tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingTracer {
    pub events: Vec<(&'static str, usize)>,
}

impl Tracer for RecordingTracer {
    fn record(&mut self, event: &TraceEvent<'_>) {
        self.events.push((event.name(), event.layer()));
    }
}
