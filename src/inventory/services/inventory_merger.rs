use crate::inventory::domain::{
    GroupSpec, HostNaming, Inventory, InventoryGroup, Partition, PartitionKey,
};
use std::collections::{BTreeMap, HashMap};

/// Result of merging partitions from every endpoint
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub inventory: Inventory,
    /// How many partition records were overwritten by a later endpoint
    pub replaced: usize,
    /// How many merged partitions the filter rejected
    pub excluded: usize,
    /// Host-name collisions that forced qualified names
    pub warnings: Vec<String>,
}

/// InventoryMerger - combines per-endpoint partition lists into one grouped inventory
///
/// Partitions are deduplicated by (MTMS, partition id). When the same partition is
/// reported by two endpoints the one processed last wins, so callers must pass batches
/// in endpoint resolution order for the result to be deterministic.
#[derive(Debug, Clone)]
pub struct InventoryMerger {
    group_specs: Vec<GroupSpec>,
    host_naming: HostNaming,
}

impl InventoryMerger {
    pub fn new(group_specs: Vec<GroupSpec>, host_naming: HostNaming) -> Self {
        Self {
            group_specs,
            host_naming,
        }
    }

    /// Merges partition batches, one per endpoint, in processing order
    pub fn merge(&self, partitions_by_endpoint: Vec<Vec<Partition>>) -> MergeOutcome {
        self.merge_filtered(partitions_by_endpoint, |_| true)
    }

    /// Merges partition batches, then keeps only the winners `keep` accepts.
    ///
    /// Filtering runs after deduplication: a partition whose latest copy is rejected
    /// is dropped, never replaced by an earlier endpoint's copy.
    pub fn merge_filtered<F>(&self, partitions_by_endpoint: Vec<Vec<Partition>>, keep: F) -> MergeOutcome
    where
        F: Fn(&Partition) -> bool,
    {
        let mut partitions: BTreeMap<PartitionKey, Partition> = BTreeMap::new();
        let mut replaced = 0;

        for batch in partitions_by_endpoint {
            for partition in batch {
                let key = partition.key().clone();
                if let Some(previous) = partitions.insert(key.clone(), partition) {
                    replaced += 1;
                    tracing::debug!(
                        partition = %key,
                        previous_hmc = %previous.hmc(),
                        hmc = %partitions[&key].hmc(),
                        "partition reported by several HMCs, keeping the later one"
                    );
                }
            }
        }

        let before = partitions.len();
        partitions.retain(|_, partition| keep(partition));
        let excluded = before - partitions.len();

        let (host_names, warnings) = self.assign_host_names(&partitions);
        let groups = self.build_groups(&partitions);

        MergeOutcome {
            inventory: Inventory::new(partitions, host_names, groups),
            replaced,
            excluded,
            warnings,
        }
    }

    fn base_name<'a>(&self, partition: &'a Partition) -> &'a str {
        match self.host_naming {
            HostNaming::Name => partition.name(),
            HostNaming::Ip => partition.ip_address().unwrap_or(partition.name()),
        }
    }

    /// Gives every partition a unique inventory host name.
    ///
    /// Colliding names become `<base>@<system name>`; if that still collides,
    /// `<base>@<mtms>#<id>`, which is unique by construction.
    fn assign_host_names(
        &self,
        partitions: &BTreeMap<PartitionKey, Partition>,
    ) -> (BTreeMap<PartitionKey, String>, Vec<String>) {
        let mut base_counts: HashMap<&str, usize> = HashMap::new();
        for partition in partitions.values() {
            *base_counts.entry(self.base_name(partition)).or_default() += 1;
        }

        let qualified = |p: &Partition| format!("{}@{}", self.base_name(p), p.system_name());
        let mut qualified_counts: HashMap<String, usize> = HashMap::new();
        for partition in partitions.values() {
            if base_counts[self.base_name(partition)] > 1 {
                *qualified_counts.entry(qualified(partition)).or_default() += 1;
            }
        }

        let mut names = BTreeMap::new();
        let mut warnings = Vec::new();
        for (key, partition) in partitions {
            let base = self.base_name(partition);
            let name = if base_counts[base] == 1 {
                base.to_string()
            } else {
                let candidate = qualified(partition);
                let name = if qualified_counts[&candidate] == 1 {
                    candidate
                } else {
                    format!("{}@{}#{}", base, partition.mtms(), partition.id())
                };
                warnings.push(format!(
                    "Host name '{}' is used by several partitions; renamed to '{}'",
                    base, name
                ));
                name
            };
            names.insert(key.clone(), name);
        }

        (names, warnings)
    }

    fn build_groups(&self, partitions: &BTreeMap<PartitionKey, Partition>) -> Vec<InventoryGroup> {
        let mut groups: BTreeMap<String, InventoryGroup> = BTreeMap::new();

        for spec in &self.group_specs {
            for (key, partition) in partitions {
                for value in partition.tag_values(spec.key()) {
                    let name = spec.group_name(value);
                    groups
                        .entry(name.clone())
                        .or_insert_with(|| InventoryGroup::new(name))
                        .insert(key.clone());
                }
            }
        }

        groups.into_values().collect()
    }
}
