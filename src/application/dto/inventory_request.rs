use crate::inventory::domain::{GroupSpec, HmcEndpoint, HostNaming, TagKey};
use std::collections::BTreeMap;
use std::time::Duration;

/// Default number of HMCs queried at the same time
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Default budget for one open-query-close sequence
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// InventoryRequest - Internal request DTO for the inventory use case
///
/// Endpoints are already resolved; nothing in here needs further validation
/// except the filter patterns, which the use case compiles.
#[derive(Debug, Clone)]
pub struct InventoryRequest {
    /// Endpoints in resolution order; later endpoints win merge conflicts
    pub endpoints: Vec<HmcEndpoint>,
    pub group_specs: Vec<GroupSpec>,
    pub host_naming: HostNaming,
    pub include_vios: bool,
    /// Tag allow-lists, every key must match
    pub filters: BTreeMap<TagKey, Vec<String>>,
    pub exclude_partitions: Vec<String>,
    pub exclude_systems: Vec<String>,
    pub concurrency: usize,
    pub timeout: Duration,
}

impl InventoryRequest {
    pub fn new(endpoints: Vec<HmcEndpoint>) -> Self {
        Self {
            endpoints,
            group_specs: Vec::new(),
            host_naming: HostNaming::default(),
            include_vios: false,
            filters: BTreeMap::new(),
            exclude_partitions: Vec::new(),
            exclude_systems: Vec::new(),
            concurrency: DEFAULT_CONCURRENCY,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_group_specs(mut self, group_specs: Vec<GroupSpec>) -> Self {
        self.group_specs = group_specs;
        self
    }

    pub fn with_host_naming(mut self, host_naming: HostNaming) -> Self {
        self.host_naming = host_naming;
        self
    }

    pub fn with_include_vios(mut self, include_vios: bool) -> Self {
        self.include_vios = include_vios;
        self
    }

    pub fn with_filters(mut self, filters: BTreeMap<TagKey, Vec<String>>) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_exclusions(mut self, partitions: Vec<String>, systems: Vec<String>) -> Self {
        self.exclude_partitions = partitions;
        self.exclude_systems = systems;
        self
    }

    /// Sets the fetch width; zero is raised to one
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
