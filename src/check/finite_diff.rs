use crate::backprop::{evaluator::Evaluator, gradients::Gradients};
use crate::error::Result;
use crate::math::matrix::{nan_max, Matrix};
use crate::network::network::Network;

/// Gradients of the quadratic cost by central finite differences:
/// `(C(θ + ε) − C(θ − ε)) / 2ε` for every bias and weight.
///
/// Costs two forward passes per parameter; meant for small debugging
/// networks.
pub fn numerical_gradients(
    evaluator: &Evaluator,
    network: &Network,
    input: &[f64],
    expected: &[f64],
    epsilon: f64,
) -> Result<Gradients> {
    let mut perturbed = network.clone();
    let mut biases = Vec::with_capacity(network.layers.len());
    let mut weights = Vec::with_capacity(network.layers.len());

    for l in 0..network.layers.len() {
        let (rows, cols) = network.layers[l].weights.shape();

        let mut b_grad = Matrix::zeros(rows, 1);
        for i in 0..rows {
            let original = perturbed.layers[l].biases.data[i][0];
            perturbed.layers[l].biases.data[i][0] = original + epsilon;
            let plus = evaluator.cost(&perturbed, input, expected)?;
            perturbed.layers[l].biases.data[i][0] = original - epsilon;
            let minus = evaluator.cost(&perturbed, input, expected)?;
            perturbed.layers[l].biases.data[i][0] = original;
            b_grad.data[i][0] = (plus - minus) / (2.0 * epsilon);
        }

        let mut w_grad = Matrix::zeros(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                let original = perturbed.layers[l].weights.data[i][j];
                perturbed.layers[l].weights.data[i][j] = original + epsilon;
                let plus = evaluator.cost(&perturbed, input, expected)?;
                perturbed.layers[l].weights.data[i][j] = original - epsilon;
                let minus = evaluator.cost(&perturbed, input, expected)?;
                perturbed.layers[l].weights.data[i][j] = original;
                w_grad.data[i][j] = (plus - minus) / (2.0 * epsilon);
            }
        }

        biases.push(b_grad);
        weights.push(w_grad);
    }

    Ok(Gradients { biases, weights })
}

/// `|a − b| / max(|a| + |b|, 1e-8)`
pub fn relative_error(a: f64, b: f64) -> f64 {
    (a - b).abs() / (a.abs() + b.abs()).max(1e-8)
}

/// Largest [`relative_error`] over every matching entry of two gradient sets.
pub fn max_relative_error(analytical: &Gradients, numerical: &Gradients) -> Result<f64> {
    // Fails on any structural difference before comparing values.
    analytical.max_abs_diff(numerical)?;
    let pairs = analytical.biases.iter().zip(&numerical.biases)
        .chain(analytical.weights.iter().zip(&numerical.weights));
    let mut max = 0.0_f64;
    for (a, n) in pairs {
        for (x, y) in a.data.iter().flatten().zip(n.data.iter().flatten()) {
            max = nan_max(max, relative_error(*x, *y));
        }
    }
    Ok(max)
}
