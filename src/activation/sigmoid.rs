use serde::{Serialize, Deserialize};

/// How the logistic sigmoid is evaluated.
///
/// `Exact` computes `1 / (1 + e^-z)` as written, so very large negative
/// pre-activations overflow the exponential and saturate to exactly `0.0`.
/// `Clamped` first limits `z` to `[-bound, bound]`; the derivative is taken
/// at the clamped point as well. A NaN bound clamps nothing.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Sigmoid {
    #[default]
    Exact,
    Clamped { bound: f64 },
}

impl Sigmoid {
    pub fn function(&self, z: f64) -> f64 {
        1.0 / (1.0 + (-self.clamp(z)).exp())
    }

    /// `σ'(z) = σ(z)·(1 − σ(z))`
    pub fn derivative(&self, z: f64) -> f64 {
        let s = self.function(z);
        s * (1.0 - s)
    }

    fn clamp(&self, z: f64) -> f64 {
        match self {
            Sigmoid::Exact => z,
            Sigmoid::Clamped { bound } if !bound.is_nan() => z.clamp(-bound.abs(), bound.abs()),
            Sigmoid::Clamped { .. } => z,
        }
    }
}

pub fn sigmoid(z: f64) -> f64 {
    Sigmoid::Exact.function(z)
}

pub fn sigmoid_prime(z: f64) -> f64 {
    Sigmoid::Exact.derivative(z)
}
