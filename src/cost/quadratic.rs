/// Quadratic cost `C = ½·Σ(a − y)²` for a single example.
pub struct QuadraticCost;

impl QuadraticCost {
    pub fn cost(output: &[f64], expected: &[f64]) -> f64 {
        0.5 * output.iter().zip(expected.iter())
            .map(|(a, y)| (a - y).powi(2))
            .sum::<f64>()
    }

    /// Per-output gradient ∂C/∂a: output - expected
    pub fn derivative(output: &[f64], expected: &[f64]) -> Vec<f64> {
        output.iter().zip(expected.iter())
            .map(|(a, y)| a - y)
            .collect()
    }
}
