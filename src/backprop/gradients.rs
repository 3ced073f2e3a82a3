use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};
use crate::math::matrix::{nan_max, Matrix};
use crate::network::network::Network;

/// ∂C/∂b and ∂C/∂w for every non-input layer, input side first.
///
/// `biases[i]` has the shape of layer `i`'s bias column and `weights[i]` the
/// shape of its weight matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradients {
    pub biases: Vec<Matrix>,
    pub weights: Vec<Matrix>,
}

/// JSON shape of a gradient set: nested arrays, like the parameter fixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradientDocument {
    pub bias_gradients: Vec<Vec<f64>>,
    pub weight_gradients: Vec<Vec<Vec<f64>>>,
}

impl Gradients {
    pub fn len(&self) -> usize {
        self.biases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.biases.is_empty()
    }

    /// True when every gradient has exactly the shape of the matching parameter.
    pub fn matches_shapes_of(&self, network: &Network) -> bool {
        self.len() == network.layers.len()
            && self.weights.len() == network.layers.len()
            && network.layers.iter().enumerate().all(|(i, layer)| {
                self.biases[i].shape() == layer.biases.shape()
                    && self.weights[i].shape() == layer.weights.shape()
            })
    }

    /// Name of the first gradient tensor holding an infinity or NaN.
    pub fn first_non_finite(&self) -> Option<String> {
        let bias = self.biases.iter().position(|b| !b.is_finite()).map(|i| format!("bias_gradient[{i}]"));
        bias.or_else(|| {
            self.weights.iter().position(|w| !w.is_finite()).map(|i| format!("weight_gradient[{i}]"))
        })
    }

    /// Largest absolute element-wise difference to `other`.
    pub fn max_abs_diff(&self, other: &Gradients) -> Result<f64> {
        if self.len() != other.len() || self.weights.len() != other.weights.len() {
            return Err(Error::shape(
                "gradient layer count",
                (self.len(), 1),
                (other.len(), 1),
            ));
        }
        let mut max = 0.0_f64;
        for (a, b) in self.biases.iter().zip(&other.biases).chain(self.weights.iter().zip(&other.weights)) {
            max = nan_max(max, a.max_abs_diff(b)?);
        }
        Ok(max)
    }

    pub fn to_document(&self) -> GradientDocument {
        GradientDocument {
            bias_gradients: self.biases.iter().map(Matrix::column_values).collect(),
            weight_gradients: self.weights.iter().map(|w| w.data.clone()).collect(),
        }
    }
}
