use crate::backprop::{
    backward::backward,
    eval_config::EvalConfig,
    forward::{forward, ForwardPass},
    gradients::Gradients,
    trace::{NoopTracer, Tracer},
};
use crate::cost::quadratic::QuadraticCost;
use crate::error::{Error, Result};
use crate::network::{fixture::Case, network::Network, topology::Topology};

/// Runs the forward and backward passes for one example.
///
/// The evaluator holds configuration only. Every call builds its own
/// activations, pre-activations and deltas and drops them on return, so an
/// evaluator can be shared freely between callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator {
    pub config: EvalConfig,
}

impl Evaluator {
    pub fn new(config: EvalConfig) -> Evaluator {
        Evaluator { config }
    }

    /// Gradients of the quadratic cost for `input`/`expected`.
    pub fn evaluate(
        &self,
        topology: &Topology,
        network: &Network,
        input: &[f64],
        expected: &[f64],
    ) -> Result<Gradients> {
        self.evaluate_traced(topology, network, input, expected, &mut NoopTracer)
    }

    /// Like [`evaluate`](Self::evaluate), reporting every intermediate to `tracer`.
    pub fn evaluate_traced(
        &self,
        topology: &Topology,
        network: &Network,
        input: &[f64],
        expected: &[f64],
        tracer: &mut dyn Tracer,
    ) -> Result<Gradients> {
        check_preconditions(topology, network, input, expected)?;
        log::debug!("evaluating topology {:?}", topology.sizes());

        let pass = forward(network, input, self.config.sigmoid, tracer)?;
        let gradients = backward(&pass, network, expected, self.config.sigmoid, tracer)?;

        if self.config.check_finite {
            if let Some(name) = gradients.first_non_finite() {
                log::warn!("{name} contains a non-finite value");
            }
        }
        Ok(gradients)
    }

    pub fn evaluate_case(&self, case: &Case) -> Result<Gradients> {
        self.evaluate(&case.topology, &case.network, &case.input, &case.expected)
    }

    pub fn evaluate_case_traced(&self, case: &Case, tracer: &mut dyn Tracer) -> Result<Gradients> {
        self.evaluate_traced(&case.topology, &case.network, &case.input, &case.expected, tracer)
    }

    /// Forward pass only, keeping every intermediate.
    pub fn forward_pass(&self, network: &Network, input: &[f64]) -> Result<ForwardPass> {
        forward(network, input, self.config.sigmoid, &mut NoopTracer)
    }

    /// Output activation for `input`.
    pub fn feedforward(&self, network: &Network, input: &[f64]) -> Result<Vec<f64>> {
        Ok(self.forward_pass(network, input)?.output().column_values())
    }

    /// Quadratic cost of the network's output against `expected`.
    pub fn cost(&self, network: &Network, input: &[f64], expected: &[f64]) -> Result<f64> {
        let output = self.feedforward(network, input)?;
        if output.len() != expected.len() {
            return Err(Error::shape("expected output", (output.len(), 1), (expected.len(), 1)));
        }
        Ok(QuadraticCost::cost(&output, expected))
    }
}

fn check_preconditions(
    topology: &Topology,
    network: &Network,
    input: &[f64],
    expected: &[f64],
) -> Result<()> {
    network.validate(topology)?;
    if input.len() != topology.input_size() {
        return Err(Error::shape("input", (topology.input_size(), 1), (input.len(), 1)));
    }
    if expected.len() != topology.output_size() {
        return Err(Error::shape("expected output", (topology.output_size(), 1), (expected.len(), 1)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::Sigmoid;
    use crate::backprop::trace::{self, TraceEvent};
    use crate::layers::dense::Layer;
    use crate::math::matrix::Matrix;

    fn small() -> (Topology, Network) {
        let topology = Topology::new(vec![2, 2, 1]).unwrap();
        let network = Network::from_nested(
            vec![vec![vec![1.0, 1.0], vec![1.0, 1.0]], vec![vec![1.0, 1.0]]],
            vec![vec![0.0, 0.0], vec![0.0]],
        ).unwrap();
        (topology, network)
    }

    #[test]
    fn gradient_shapes_match_parameters() {
        let (topology, network) = small();
        let grads = Evaluator::default().evaluate(&topology, &network, &[0.2, 0.9], &[1.0]).unwrap();
        assert!(grads.matches_shapes_of(&network));
    }

    #[test]
    fn topology_disagreement_produces_no_result() {
        let (_, network) = small();
        let topology = Topology::new(vec![2, 3, 1]).unwrap();
        let err = Evaluator::default().evaluate(&topology, &network, &[0.0, 0.0], &[0.0]).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn input_and_expected_lengths_are_preconditions() {
        let (topology, network) = small();
        let evaluator = Evaluator::default();
        assert!(evaluator.evaluate(&topology, &network, &[0.0], &[0.0]).is_err());
        assert!(evaluator.evaluate(&topology, &network, &[0.0, 0.0], &[]).is_err());
    }

    #[test]
    fn closure_tracer_sees_the_output_delta() {
        let (topology, network) = small();
        let mut seen = Vec::new();
        let mut tracer = trace::from_fn(|event: &TraceEvent<'_>| {
            if let TraceEvent::OutputDelta { delta, .. } = event {
                seen.push(delta.data[0][0]);
            }
        });
        Evaluator::default()
            .evaluate_traced(&topology, &network, &[0.0, 0.0], &[0.0], &mut tracer)
            .unwrap();
        assert_eq!(seen.len(), 1);
        assert!((seen[0] - 0.1437).abs() < 1e-4);
    }

    #[test]
    fn non_finite_gradients_are_named_when_checking() {
        let (topology, network) = small();
        let evaluator = Evaluator::new(EvalConfig::new(Sigmoid::Exact, true));
        let grads = evaluator.evaluate(&topology, &network, &[f64::NAN, 0.0], &[0.0]).unwrap();
        assert_eq!(grads.first_non_finite().as_deref(), Some("bias_gradient[0]"));
    }

    #[test]
    fn hand_built_network_with_wrong_dims_is_rejected_not_panicking() {
        let topology = Topology::new(vec![2, 1]).unwrap();
        let network = Network {
            layers: vec![Layer {
                weights: Matrix { rows: 1, cols: 2, data: vec![vec![1.0]] },
                biases: Matrix::column(&[0.0]),
            }],
        };
        let evaluator = Evaluator::default();
        assert!(matches!(
            evaluator.evaluate(&topology, &network, &[1.0, 2.0], &[0.0]),
            Err(Error::ShapeMismatch { .. })
        ));
        assert!(matches!(
            evaluator.forward_pass(&network, &[1.0, 2.0]),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn cost_and_feedforward_agree() {
        let (_, network) = small();
        let evaluator = Evaluator::new(EvalConfig::new(Sigmoid::Exact, true));
        let output = evaluator.feedforward(&network, &[0.0, 0.0]).unwrap();
        let cost = evaluator.cost(&network, &[0.0, 0.0], &[0.0]).unwrap();
        assert_eq!(cost, 0.5 * output[0] * output[0]);
    }
}
