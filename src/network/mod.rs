pub mod fixture;
pub mod network;
pub mod topology;

pub use fixture::{Case, ParameterFile};
pub use network::Network;
pub use topology::Topology;
