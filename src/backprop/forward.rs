use crate::activation::Sigmoid;
use crate::backprop::trace::{TraceEvent, Tracer};
use crate::error::{Error, Result};
use crate::math::matrix::Matrix;
use crate::network::network::Network;

/// Every activation and pre-activation of one forward pass.
///
/// `activations[0]` is the input column; `zs[l - 1]` and `activations[l]`
/// belong to topology layer `l`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardPass {
    pub activations: Vec<Matrix>,
    pub zs: Vec<Matrix>,
}

impl ForwardPass {
    pub fn num_layers(&self) -> usize {
        self.activations.len()
    }

    /// Activation of the output layer.
    pub fn output(&self) -> &Matrix {
        &self.activations[self.activations.len() - 1]
    }
}

/// Feeds `input` through every layer: `z = W·a + b`, `a = σ(z)`.
pub fn forward(
    network: &Network,
    input: &[f64],
    sigmoid: Sigmoid,
    tracer: &mut dyn Tracer,
) -> Result<ForwardPass> {
    if network.layers.is_empty() {
        return Err(Error::InvalidTopology("network has no layers".to_owned()));
    }

    let mut activation = Matrix::column(input);
    let mut activations = Vec::with_capacity(network.layers.len() + 1);
    let mut zs = Vec::with_capacity(network.layers.len());

    for (i, layer) in network.layers.iter().enumerate() {
        let context = if i == 0 { "input".to_owned() } else { format!("activations[{i}]") };
        if activation.rows != layer.input_size() {
            return Err(Error::shape(context, (layer.input_size(), 1), activation.shape()));
        }
        layer.weights.check_dims(&format!("weights[{i}]"))?;
        layer.biases.check_dims(&format!("biases[{i}]"))?;
        if layer.biases.shape() != (layer.size(), 1) {
            return Err(Error::shape(format!("biases[{i}]"), (layer.size(), 1), layer.biases.shape()));
        }

        let (z, a) = layer.feed_from(&activation, sigmoid);
        tracer.record(&TraceEvent::PreActivation { layer: i + 1, z: &z });
        tracer.record(&TraceEvent::Activation { layer: i + 1, activation: &a });

        zs.push(z);
        activations.push(std::mem::replace(&mut activation, a));
    }
    activations.push(activation);

    Ok(ForwardPass { activations, zs })
}
