use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};

/// Ordered layer sizes, input layer first.
///
/// A topology always has at least an input and an output layer and no layer
/// is empty. Serialized as a plain JSON array, e.g. `[2, 3, 3, 1]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Topology {
    sizes: Vec<usize>,
}

impl Topology {
    pub fn new(sizes: Vec<usize>) -> Result<Topology> {
        if sizes.len() < 2 {
            return Err(Error::InvalidTopology(format!(
                "need at least an input and an output layer, got {} layer(s)",
                sizes.len()
            )));
        }
        if let Some(pos) = sizes.iter().position(|&s| s == 0) {
            return Err(Error::InvalidTopology(format!("layer {pos} has size 0")));
        }
        Ok(Topology { sizes })
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    pub fn num_layers(&self) -> usize {
        self.sizes.len()
    }

    pub fn input_size(&self) -> usize {
        self.sizes[0]
    }

    pub fn output_size(&self) -> usize {
        self.sizes[self.sizes.len() - 1]
    }

    /// `(size[l], size[l-1])` for every non-input layer `l`.
    pub fn weight_shapes(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.sizes.windows(2).map(|pair| (pair[1], pair[0]))
    }
}

impl TryFrom<Vec<usize>> for Topology {
    type Error = Error;

    fn try_from(sizes: Vec<usize>) -> Result<Topology> {
        Topology::new(sizes)
    }
}

impl From<Topology> for Vec<usize> {
    fn from(topology: Topology) -> Vec<usize> {
        topology.sizes
    }
}
