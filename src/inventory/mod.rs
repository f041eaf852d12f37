/// Inventory domain: HMC endpoints, managed systems, partitions, and the
/// pure services that resolve, filter, normalize and merge them
pub mod domain;
pub mod services;
