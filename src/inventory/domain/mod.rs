pub mod endpoint;
pub mod inventory;
pub mod managed_system;
pub mod partition;
pub mod partition_record;
pub mod tag;

pub use endpoint::{CredentialReference, HmcEndpoint, Secret};
pub use inventory::{sanitize_group_name, GroupSpec, HostNaming, Inventory, InventoryGroup};
pub use managed_system::{ManagedSystem, Mtms};
pub use partition::{HostType, OsType, Partition, PartitionKey};
pub use partition_record::PartitionRecord;
pub use tag::{Tag, TagKey};
