use super::{Partition, PartitionKey, TagKey};
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

/// Replaces characters Ansible does not accept in group names
pub fn sanitize_group_name(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// One grouping rule: bucket partitions by the values of a tag key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSpec {
    key: TagKey,
    prefix: Option<String>,
}

impl GroupSpec {
    pub fn new(key: TagKey) -> Self {
        Self { key, prefix: None }
    }

    /// An empty prefix means group names are the bare tag values
    pub fn with_prefix(key: TagKey, prefix: impl Into<String>) -> Self {
        Self {
            key,
            prefix: Some(prefix.into()),
        }
    }

    pub fn key(&self) -> TagKey {
        self.key
    }

    /// Group name for one tag value, e.g. `system_p9_lab`
    pub fn group_name(&self, value: &str) -> String {
        let prefix = self.prefix.as_deref().unwrap_or(self.key.default_prefix());
        if prefix.is_empty() {
            sanitize_group_name(value)
        } else {
            sanitize_group_name(&format!("{}_{}", prefix, value))
        }
    }
}

/// How partitions are named in the inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HostNaming {
    /// Partition name as defined on the HMC
    #[default]
    Name,
    /// RMC IP address, falling back to the name when none is reported
    Ip,
}

impl FromStr for HostNaming {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name" | "lpar_name" => Ok(HostNaming::Name),
            "ip" => Ok(HostNaming::Ip),
            _ => Err(format!(
                "Invalid host naming: {}. Please specify 'name' or 'ip'",
                s
            )),
        }
    }
}

/// A named set of partitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryGroup {
    name: String,
    members: BTreeSet<PartitionKey>,
}

impl InventoryGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: BTreeSet::new(),
        }
    }

    pub fn insert(&mut self, key: PartitionKey) {
        self.members.insert(key);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &BTreeSet<PartitionKey> {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// The merged result of one inventory run
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    partitions: BTreeMap<PartitionKey, Partition>,
    host_names: BTreeMap<PartitionKey, String>,
    groups: Vec<InventoryGroup>,
}

impl Inventory {
    pub fn new(
        partitions: BTreeMap<PartitionKey, Partition>,
        host_names: BTreeMap<PartitionKey, String>,
        groups: Vec<InventoryGroup>,
    ) -> Self {
        Self {
            partitions,
            host_names,
            groups,
        }
    }

    pub fn partitions(&self) -> impl Iterator<Item = &Partition> {
        self.partitions.values()
    }

    pub fn partition(&self, key: &PartitionKey) -> Option<&Partition> {
        self.partitions.get(key)
    }

    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }

    pub fn groups(&self) -> &[InventoryGroup] {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<&InventoryGroup> {
        self.groups.iter().find(|g| g.name() == name)
    }

    /// Inventory host name of a partition
    pub fn host_name(&self, key: &PartitionKey) -> Option<&str> {
        self.host_names.get(key).map(String::as_str)
    }

    /// Host names of a group's members, sorted
    pub fn group_hosts(&self, group: &InventoryGroup) -> Vec<&str> {
        let mut hosts: Vec<&str> = group
            .members()
            .iter()
            .filter_map(|key| self.host_name(key))
            .collect();
        hosts.sort_unstable();
        hosts
    }

    /// (host name, partition) pairs sorted by host name
    pub fn hosts(&self) -> Vec<(&str, &Partition)> {
        let mut hosts: Vec<(&str, &Partition)> = self
            .partitions
            .iter()
            .filter_map(|(key, partition)| self.host_name(key).map(|name| (name, partition)))
            .collect();
        hosts.sort_by(|a, b| a.0.cmp(b.0));
        hosts
    }

    /// Finds a partition by its inventory host name
    pub fn find_host(&self, name: &str) -> Option<&Partition> {
        self.host_names
            .iter()
            .find(|(_, host)| host.as_str() == name)
            .and_then(|(key, _)| self.partitions.get(key))
    }
}
