/// Network adapters talking to HMC REST endpoints
mod hmc_rest_client;

pub(crate) use hmc_rest_client::{parse_managed_systems, parse_partitions};
pub use hmc_rest_client::{HmcRestConnector, RestSettings};
