use approx::{assert_abs_diff_eq, assert_relative_eq};
use backprop_eval::{
    backprop::{RecordingTracer, TraceEvent},
    check::numerical_gradients,
    sigmoid, sigmoid_prime, Error, EvalConfig, Evaluator, Network, ParameterFile, Sigmoid, Topology,
};
use rand::{rngs::StdRng, SeedableRng};

fn scenario() -> (Topology, Network) {
    let topology = Topology::new(vec![2, 2, 1]).unwrap();
    let network = Network::from_nested(
        vec![vec![vec![1.0, 1.0], vec![1.0, 1.0]], vec![vec![1.0, 1.0]]],
        vec![vec![0.0, 0.0], vec![0.0]],
    )
    .unwrap();
    (topology, network)
}

#[test]
fn single_hidden_layer_scenario() {
    let (topology, network) = scenario();
    let evaluator = Evaluator::default();

    let pass = evaluator.forward_pass(&network, &[0.0, 0.0]).unwrap();
    assert_eq!(pass.activations[1].column_values(), vec![0.5, 0.5]);
    assert_eq!(pass.zs[1].column_values(), vec![1.0]);
    assert_relative_eq!(pass.output().data[0][0], 0.7311, epsilon = 1e-4);

    let grads = evaluator.evaluate(&topology, &network, &[0.0, 0.0], &[0.0]).unwrap();
    let delta = sigmoid(1.0) * sigmoid_prime(1.0);
    assert_relative_eq!(grads.biases[1].data[0][0], delta, epsilon = 1e-15);
    assert_abs_diff_eq!(grads.biases[1].data[0][0], 0.1437, epsilon = 1e-4);
    assert_abs_diff_eq!(grads.weights[1].data[0][0], 0.0719, epsilon = 1e-4);
    assert_abs_diff_eq!(grads.weights[1].data[0][1], 0.0719, epsilon = 1e-4);
}

#[test]
fn gradients_have_parameter_shapes_for_many_topologies() {
    let mut rng = StdRng::seed_from_u64(5);
    for sizes in [vec![1, 1], vec![3, 1], vec![2, 5, 3], vec![4, 3, 3, 2], vec![6, 1, 7, 2, 3]] {
        let topology = Topology::new(sizes.clone()).unwrap();
        let network = Network::gaussian(&topology, &mut rng);
        let input = vec![0.5; topology.input_size()];
        let expected = vec![0.25; topology.output_size()];
        let grads = Evaluator::default().evaluate(&topology, &network, &input, &expected).unwrap();
        assert_eq!(grads.len(), sizes.len() - 1);
        assert!(grads.matches_shapes_of(&network), "shapes differ for {sizes:?}");
    }
}

#[test]
fn repeated_evaluations_are_bit_identical() {
    let file = ParameterFile::demo(&mut StdRng::seed_from_u64(9));
    let case = file.into_case().unwrap();
    let evaluator = Evaluator::default();
    let first = evaluator.evaluate_case(&case).unwrap();
    let second = evaluator.evaluate_case(&case).unwrap();
    assert_eq!(first, second);
}

#[test]
fn two_layer_network_has_a_single_gradient_entry_and_no_backward_steps() {
    let topology = Topology::new(vec![3, 2]).unwrap();
    let network = Network::gaussian(&topology, &mut StdRng::seed_from_u64(2));
    let mut tracer = RecordingTracer::default();
    let grads = Evaluator::default()
        .evaluate_traced(&topology, &network, &[0.1, 0.2, 0.3], &[1.0, 0.0], &mut tracer)
        .unwrap();

    assert_eq!(grads.biases.len(), 1);
    assert_eq!(grads.weights.len(), 1);
    assert_eq!(grads.weights[0].shape(), (2, 3));
    assert!(tracer.events.iter().all(|(name, _)| *name != "backward_step"));
}

#[test]
fn output_equal_to_expected_gives_zero_delta() {
    let (topology, network) = scenario();
    let evaluator = Evaluator::default();
    let output = evaluator.feedforward(&network, &[0.4, 0.1]).unwrap();

    let mut output_delta = None;
    let mut tracer = backprop_eval::backprop::trace::from_fn(|event: &TraceEvent<'_>| {
        if let TraceEvent::OutputDelta { delta, .. } = event {
            output_delta = Some(delta.column_values());
        }
    });
    evaluator
        .evaluate_traced(&topology, &network, &[0.4, 0.1], &output, &mut tracer)
        .unwrap();
    assert_eq!(output_delta, Some(vec![0.0]));
}

#[test]
fn mismatched_parameters_fail_fast() {
    let topology = Topology::new(vec![2, 2, 1]).unwrap();
    let network = Network::from_nested(
        vec![vec![vec![1.0, 1.0, 1.0], vec![1.0, 1.0, 1.0]], vec![vec![1.0, 1.0]]],
        vec![vec![0.0, 0.0], vec![0.0]],
    )
    .unwrap();
    let err = Evaluator::default()
        .evaluate(&topology, &network, &[0.0, 0.0], &[0.0])
        .unwrap_err();
    match err {
        Error::ShapeMismatch { context, expected, found } => {
            assert_eq!(context, "weights[0]");
            assert_eq!(expected, (2, 2));
            assert_eq!(found, (2, 3));
        }
        other => panic!("expected a shape mismatch, got {other:?}"),
    }
}

#[test]
fn demo_fixture_matches_finite_differences() {
    let case = ParameterFile::demo(&mut StdRng::seed_from_u64(21)).into_case().unwrap();
    let evaluator = Evaluator::default();
    let analytical = evaluator.evaluate_case(&case).unwrap();
    let numerical =
        numerical_gradients(&evaluator, &case.network, &case.input, &case.expected, 1e-5).unwrap();
    assert!(analytical.max_abs_diff(&numerical).unwrap() < 1e-7);
}

#[test]
fn clamped_sigmoid_keeps_saturated_gradients_finite() {
    let topology = Topology::new(vec![1, 1]).unwrap();
    let network = Network::from_nested(vec![vec![vec![1.0]]], vec![vec![0.0]]).unwrap();
    let clamped = Evaluator::new(EvalConfig::new(Sigmoid::Clamped { bound: 30.0 }, true));
    let grads = clamped.evaluate(&topology, &network, &[-1e6], &[1.0]).unwrap();
    assert!(grads.first_non_finite().is_none());
    assert!(grads.biases[0].data[0][0] < 0.0);
}

#[test]
fn fixture_json_from_another_implementation_evaluates() {
    let json = r#"{
        "entry": [0.7, 0.3],
        "sizes": [2, 3, 1],
        "numLayers": 3,
        "biases": [[0.1, -0.2, 0.3], [0.05]],
        "weights": [[[0.5, -0.5], [0.25, 0.75], [-1.0, 1.0]], [[0.3, -0.6, 0.9]]],
        "expectedOut": [0.378756]
    }"#;
    let case = ParameterFile::from_json_str(json).unwrap().into_case().unwrap();
    let grads = Evaluator::default().evaluate_case(&case).unwrap();
    let doc = grads.to_document();
    assert_eq!(doc.bias_gradients.len(), 2);
    assert_eq!(doc.bias_gradients[0].len(), 3);
    assert_eq!(doc.weight_gradients[1].len(), 1);
    assert_eq!(doc.weight_gradients[1][0].len(), 3);
    // Bias gradient of the output layer equals its delta, and the weight
    // gradient is that delta times the hidden activations.
    let pass = Evaluator::default().forward_pass(&case.network, &case.input).unwrap();
    for (j, a) in pass.activations[1].column_values().iter().enumerate() {
        assert_relative_eq!(doc.weight_gradients[1][0][j], doc.bias_gradients[1][0] * a, epsilon = 1e-15);
    }
}
