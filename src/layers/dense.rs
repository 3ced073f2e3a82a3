use rand::Rng;

use crate::{activation::Sigmoid, error::{Error, Result}, math::matrix::Matrix};

/// One fully connected, non-input layer.
///
/// `weights` has shape `(size, input_size)`; `biases` is a `(size, 1)` column.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer{
    pub weights: Matrix,
    pub biases: Matrix,
}

impl Layer {
    pub fn new(weights: Matrix, biases: Matrix) -> Result<Layer> {
        if biases.shape() != (weights.rows, 1) {
            return Err(Error::shape("layer biases", (weights.rows, 1), biases.shape()));
        }
        Ok(Layer { weights, biases })
    }

    /// Weights and biases drawn from N(0, 1).
    pub fn gaussian<R: Rng + ?Sized>(size: usize, input_size: usize, rng: &mut R) -> Layer {
        Layer {
            weights: Matrix::gaussian(size, input_size, rng),
            biases: Matrix::gaussian(size, 1, rng),
        }
    }

    pub fn size(&self) -> usize {
        self.weights.rows
    }

    pub fn input_size(&self) -> usize {
        self.weights.cols
    }

    /// Returns `(z, a)` where `z = W·input + b` and `a = σ(z)`.
    pub fn feed_from(&self, input: &Matrix, sigmoid: Sigmoid) -> (Matrix, Matrix) {
        let z = &(&self.weights * input) + &self.biases;
        let a = z.map(|x| sigmoid.function(x));
        (z, a)
    }

    /// Gradients for this layer given its delta: `(delta ⊗ inputᵗ, delta)`.
    pub fn gradients(delta: &Matrix, inputs: &Matrix) -> (Matrix, Matrix) {
        let weights_grad = delta * &inputs.transpose();
        (weights_grad, delta.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_from_applies_affine_then_sigmoid() {
        let layer = Layer::new(
            Matrix::try_from_rows(vec![vec![1.0, -1.0], vec![0.5, 0.5]], "w").unwrap(),
            Matrix::column(&[0.0, -1.0]),
        ).unwrap();
        let (z, a) = layer.feed_from(&Matrix::column(&[2.0, 2.0]), Sigmoid::Exact);
        assert_eq!(z.column_values(), vec![0.0, 1.0]);
        assert_eq!(a.column_values()[0], 0.5);
        assert_eq!(a.shape(), (2, 1));
    }

    #[test]
    fn bias_must_match_weight_rows() {
        let err = Layer::new(Matrix::zeros(3, 2), Matrix::column(&[0.0, 0.0])).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { expected: (3, 1), found: (2, 1), .. }));
    }

    #[test]
    fn gradients_take_layer_shape() {
        let delta = Matrix::column(&[1.0, 2.0, 3.0]);
        let input = Matrix::column(&[0.5, 0.25]);
        let (w, b) = Layer::gradients(&delta, &input);
        assert_eq!(w.shape(), (3, 2));
        assert_eq!(w.data[2], vec![1.5, 0.75]);
        assert_eq!(b, delta);
    }
}
