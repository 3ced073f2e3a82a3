use std::path::Path;

use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};
use crate::network::{network::Network, topology::Topology};

/// On-disk parameter fixture shared between backprop implementations.
///
/// ```json
/// { "entry": [0.7, 0.3], "sizes": [2, 3, 3, 1], "numLayers": 4,
///   "biases": [[..], ..], "weights": [[[..], ..], ..], "expectedOut": [0.378756] }
/// ```
///
/// `weights[l]` has one row per neuron of layer `l + 1` and one column per
/// neuron of layer `l`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterFile {
    pub entry: Vec<f64>,
    pub sizes: Vec<usize>,
    pub num_layers: usize,
    pub biases: Vec<Vec<f64>>,
    pub weights: Vec<Vec<Vec<f64>>>,
    pub expected_out: Vec<f64>,
}

/// A validated fixture, ready to hand to the evaluator.
#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    pub topology: Topology,
    pub network: Network,
    pub input: Vec<f64>,
    pub expected: Vec<f64>,
}

impl ParameterFile {
    pub const DEMO_SIZES: [usize; 4] = [2, 3, 3, 1];
    pub const DEMO_ENTRY: [f64; 2] = [0.7, 0.3];
    pub const DEMO_EXPECTED: [f64; 1] = [0.378756];

    /// Random N(0, 1) weights and biases for `sizes`.
    pub fn random<R: Rng + ?Sized>(
        sizes: Vec<usize>,
        entry: Vec<f64>,
        expected_out: Vec<f64>,
        rng: &mut R,
    ) -> Result<ParameterFile> {
        let topology = Topology::new(sizes)?;
        if entry.len() != topology.input_size() {
            return Err(Error::shape("entry", (topology.input_size(), 1), (entry.len(), 1)));
        }
        if expected_out.len() != topology.output_size() {
            return Err(Error::shape(
                "expectedOut",
                (topology.output_size(), 1),
                (expected_out.len(), 1),
            ));
        }
        let network = Network::gaussian(&topology, rng);
        Ok(ParameterFile {
            entry,
            num_layers: topology.num_layers(),
            biases: network.nested_biases(),
            weights: network.nested_weights(),
            sizes: topology.into(),
            expected_out,
        })
    }

    /// The `[2, 3, 3, 1]` fixture with input `[0.7, 0.3]` and target `[0.378756]`.
    pub fn demo<R: Rng + ?Sized>(rng: &mut R) -> ParameterFile {
        let file = ParameterFile::random(
            Self::DEMO_SIZES.to_vec(),
            Self::DEMO_ENTRY.to_vec(),
            Self::DEMO_EXPECTED.to_vec(),
            rng,
        );
        match file {
            Ok(file) => file,
            Err(e) => unreachable!("demo constants are consistent: {e}"),
        }
    }

    /// Checks the fixture for internal consistency and converts it into a [`Case`].
    pub fn into_case(self) -> Result<Case> {
        if self.num_layers != self.sizes.len() {
            return Err(Error::InvalidFixture(format!(
                "numLayers is {} but sizes has {} entries",
                self.num_layers,
                self.sizes.len()
            )));
        }
        let topology = Topology::new(self.sizes)?;
        let network = Network::from_nested(self.weights, self.biases)?;
        network.validate(&topology)?;
        if self.entry.len() != topology.input_size() {
            return Err(Error::shape("entry", (topology.input_size(), 1), (self.entry.len(), 1)));
        }
        if self.expected_out.len() != topology.output_size() {
            return Err(Error::shape(
                "expectedOut",
                (topology.output_size(), 1),
                (self.expected_out.len(), 1),
            ));
        }
        Ok(Case {
            topology,
            network,
            input: self.entry,
            expected: self.expected_out,
        })
    }

    pub fn from_json_str(json: &str) -> Result<ParameterFile> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the fixture to a pretty-printed JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a fixture from a JSON file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<ParameterFile> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
