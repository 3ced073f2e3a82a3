use crate::{error::{Error, Result}, layers::dense::Layer, math::matrix::Matrix, network::topology::Topology};
use rand::Rng;

/// Weights and biases of every non-input layer, input side first.
///
/// The network only holds parameters. It is read, never modified, by an
/// evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    pub layers: Vec<Layer>,
}

impl Network {
    /// Builds a network from nested-number parameters: `weights[l][row][col]`
    /// and `biases[l][row]`.
    pub fn from_nested(weights: Vec<Vec<Vec<f64>>>, biases: Vec<Vec<f64>>) -> Result<Network> {
        if weights.len() != biases.len() {
            return Err(Error::shape(
                "layer count (weights vs biases)",
                (weights.len(), 1),
                (biases.len(), 1),
            ));
        }
        let layers = weights.into_iter().zip(biases)
            .enumerate()
            .map(|(i, (w, b))| {
                let weights = Matrix::try_from_rows(w, &format!("weights[{i}]"))?;
                Layer::new(weights, Matrix::column(&b))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Network { layers })
    }

    /// Random N(0, 1) parameters for `topology`.
    pub fn gaussian<R: Rng + ?Sized>(topology: &Topology, rng: &mut R) -> Network {
        let layers = topology.weight_shapes()
            .map(|(size, input_size)| Layer::gaussian(size, input_size, rng))
            .collect();
        Network { layers }
    }

    /// Checks every weight and bias against the shapes `topology` demands.
    pub fn validate(&self, topology: &Topology) -> Result<()> {
        let expected_layers = topology.num_layers() - 1;
        if self.layers.len() != expected_layers {
            return Err(Error::shape(
                "non-input layer count",
                (expected_layers, 1),
                (self.layers.len(), 1),
            ));
        }
        for (i, (layer, shape)) in self.layers.iter().zip(topology.weight_shapes()).enumerate() {
            layer.weights.check_dims(&format!("weights[{i}]"))?;
            layer.biases.check_dims(&format!("biases[{i}]"))?;
            if layer.weights.shape() != shape {
                return Err(Error::shape(format!("weights[{i}]"), shape, layer.weights.shape()));
            }
            if layer.biases.shape() != (shape.0, 1) {
                return Err(Error::shape(format!("biases[{i}]"), (shape.0, 1), layer.biases.shape()));
            }
        }
        Ok(())
    }

    /// Recovers the topology implied by the weight shapes.
    pub fn topology(&self) -> Result<Topology> {
        let first = self.layers.first()
            .ok_or_else(|| Error::InvalidTopology("network has no layers".to_owned()))?;
        let mut sizes = vec![first.input_size()];
        sizes.extend(self.layers.iter().map(Layer::size));
        let topology = Topology::new(sizes)?;
        self.validate(&topology)?;
        Ok(topology)
    }

    pub fn nested_weights(&self) -> Vec<Vec<Vec<f64>>> {
        self.layers.iter().map(|layer| layer.weights.data.clone()).collect()
    }

    pub fn nested_biases(&self) -> Vec<Vec<f64>> {
        self.layers.iter().map(|layer| layer.biases.column_values()).collect()
    }
}
