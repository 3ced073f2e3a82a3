use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::activation::Sigmoid;
use crate::error::Result;

/// Settings for an [`Evaluator`](crate::backprop::evaluator::Evaluator).
///
/// # Fields
/// - `sigmoid`: how the sigmoid is evaluated (`exact` or `clamped`)
/// - `check_finite`: log a warning when a gradient comes out as inf/NaN
///
/// Every field is optional in JSON; missing ones take their defaults:
/// ```json
/// { "sigmoid": { "mode": "clamped", "bound": 500.0 }, "check_finite": true }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    pub sigmoid: Sigmoid,
    pub check_finite: bool,
}

impl EvalConfig {
    pub fn new(sigmoid: Sigmoid, check_finite: bool) -> Self {
        EvalConfig { sigmoid, check_finite }
    }

    /// Deserializes an `EvalConfig` from a JSON file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<EvalConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
