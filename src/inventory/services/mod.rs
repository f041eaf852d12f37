pub mod host_resolver;
pub mod inventory_merger;
pub mod partition_filter;
pub mod partition_normalizer;

pub use host_resolver::{
    expand_template, resolve_hosts, HostDefaults, HostSpec, Variables, MAX_EXPANDED_HOSTS,
};
pub use inventory_merger::{InventoryMerger, MergeOutcome};
pub use partition_filter::PartitionFilter;
pub use partition_normalizer::PartitionNormalizer;
