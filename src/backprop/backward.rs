use crate::activation::Sigmoid;
use crate::backprop::{forward::ForwardPass, gradients::Gradients, trace::{TraceEvent, Tracer}};
use crate::cost::quadratic::QuadraticCost;
use crate::error::{Error, Result};
use crate::layers::dense::Layer;
use crate::math::matrix::Matrix;
use crate::network::network::Network;

/// Propagates the output error back through the network.
///
/// The output delta is `(a_L − y) ⊙ σ'(z_L)`. Every earlier delta is
/// `(W_{l+1}ᵗ · δ_{l+1}) ⊙ σ'(z_l)`, computed strictly from the output layer
/// towards the input since each step consumes the delta of the layer above.
/// Each delta yields `∂C/∂b_l = δ_l` and `∂C/∂W_l = δ_l ⊗ a_{l−1}ᵗ`.
pub fn backward(
    pass: &ForwardPass,
    network: &Network,
    expected: &[f64],
    sigmoid: Sigmoid,
    tracer: &mut dyn Tracer,
) -> Result<Gradients> {
    check_shapes(pass, network, expected)?;

    let last = pass.zs.len();
    let mut biases = Vec::with_capacity(last);
    let mut weights = Vec::with_capacity(last);

    let error = QuadraticCost::derivative(&pass.output().column_values(), expected);
    let sp = pass.zs[last - 1].map(|z| sigmoid.derivative(z));
    let mut delta = Matrix::column(&error).hadamard(&sp);
    tracer.record(&TraceEvent::OutputDelta { layer: last, delta: &delta });
    push_gradients(&delta, &pass.activations[last - 1], last, &mut biases, &mut weights, tracer);

    for l in (1..last).rev() {
        let z = &pass.zs[l - 1];
        let sp = z.map(|x| sigmoid.derivative(x));
        let transposed_weights = network.layers[l].weights.transpose();
        let propagated = &transposed_weights * &delta;
        let next = propagated.hadamard(&sp);
        tracer.record(&TraceEvent::BackwardStep {
            layer: l,
            upstream_delta: &delta,
            transposed_weights: &transposed_weights,
            z,
            sigmoid_prime: &sp,
            propagated: &propagated,
            delta: &next,
        });
        delta = next;
        push_gradients(&delta, &pass.activations[l - 1], l, &mut biases, &mut weights, tracer);
    }

    biases.reverse();
    weights.reverse();
    Ok(Gradients { biases, weights })
}

fn push_gradients(
    delta: &Matrix,
    inputs: &Matrix,
    layer: usize,
    biases: &mut Vec<Matrix>,
    weights: &mut Vec<Matrix>,
    tracer: &mut dyn Tracer,
) {
    let (w_grad, b_grad) = Layer::gradients(delta, inputs);
    tracer.record(&TraceEvent::BiasGradient { layer, gradient: &b_grad });
    tracer.record(&TraceEvent::WeightGradient { layer, gradient: &w_grad });
    biases.push(b_grad);
    weights.push(w_grad);
}

fn check_shapes(pass: &ForwardPass, network: &Network, expected: &[f64]) -> Result<()> {
    let layers = network.layers.len();
    if layers == 0 {
        return Err(Error::InvalidTopology("network has no layers".to_owned()));
    }
    if pass.zs.len() != layers {
        return Err(Error::shape("pre-activation count", (layers, 1), (pass.zs.len(), 1)));
    }
    if pass.activations.len() != layers + 1 {
        return Err(Error::shape("activation count", (layers + 1, 1), (pass.activations.len(), 1)));
    }
    for (i, layer) in network.layers.iter().enumerate() {
        layer.weights.check_dims(&format!("weights[{i}]"))?;
        let shape = (pass.zs[i].rows, pass.activations[i].rows);
        if layer.weights.shape() != shape {
            return Err(Error::shape(format!("weights[{i}]"), shape, layer.weights.shape()));
        }
        if pass.activations[i + 1].shape() != pass.zs[i].shape() {
            return Err(Error::shape(
                format!("activations[{}]", i + 1),
                pass.zs[i].shape(),
                pass.activations[i + 1].shape(),
            ));
        }
    }
    let output = pass.output();
    if output.shape() != (expected.len(), 1) {
        return Err(Error::shape("expected output", output.shape(), (expected.len(), 1)));
    }
    Ok(())
}
