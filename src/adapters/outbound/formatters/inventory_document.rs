use crate::inventory::domain::{Inventory, Partition, PartitionKey};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Group receiving hosts that belong to no other group
pub const UNGROUPED: &str = "ungrouped";

/// Names the dynamic inventory protocol reserves at the top level
const RESERVED_GROUP_NAMES: [&str; 2] = ["all", "_meta"];

/// The dynamic inventory document shared by every output format
#[derive(Debug, Serialize)]
pub(crate) struct InventoryDocument<'a> {
    #[serde(rename = "_meta")]
    meta: Meta<'a>,
    all: AllGroup,
    #[serde(flatten)]
    groups: BTreeMap<String, GroupHosts<'a>>,
}

#[derive(Debug, Serialize)]
struct Meta<'a> {
    hostvars: BTreeMap<&'a str, HostVars<'a>>,
}

#[derive(Debug, Serialize)]
struct AllGroup {
    children: Vec<String>,
}

#[derive(Debug, Serialize)]
struct GroupHosts<'a> {
    hosts: Vec<&'a str>,
}

/// Variables exposed for one inventory host
#[derive(Debug, Serialize)]
pub(crate) struct HostVars<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    ansible_host: Option<&'a str>,
    hmc_partition_name: &'a str,
    hmc_partition_id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    hmc_partition_uuid: Option<&'a str>,
    hmc_partition_type: &'static str,
    hmc_host_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    hmc_os_version: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hmc_partition_state: Option<&'a str>,
    hmc_system_name: &'a str,
    hmc_system_mtms: String,
    hmc_host: &'a str,
}

impl<'a> HostVars<'a> {
    pub(crate) fn from_partition(partition: &'a Partition) -> Self {
        Self {
            ansible_host: partition.ip_address(),
            hmc_partition_name: partition.name(),
            hmc_partition_id: partition.id(),
            hmc_partition_uuid: partition.uuid(),
            hmc_partition_type: partition.os_type().as_str(),
            hmc_host_type: partition.host_type().as_str(),
            hmc_os_version: partition.os_version(),
            hmc_partition_state: partition.state(),
            hmc_system_name: partition.system_name(),
            hmc_system_mtms: partition.mtms().to_string(),
            hmc_host: partition.hmc(),
        }
    }
}

impl<'a> InventoryDocument<'a> {
    pub(crate) fn from_inventory(inventory: &'a Inventory) -> Self {
        let hosts = inventory.hosts();
        let hostvars = hosts
            .iter()
            .map(|(name, partition)| (*name, HostVars::from_partition(partition)))
            .collect();

        let mut groups: BTreeMap<String, GroupHosts<'a>> = BTreeMap::new();
        let mut grouped: BTreeSet<&PartitionKey> = BTreeSet::new();
        for group in inventory.groups() {
            grouped.extend(group.members().iter());
            let name = if RESERVED_GROUP_NAMES.contains(&group.name()) {
                format!("{}_group", group.name())
            } else {
                group.name().to_string()
            };
            groups
                .entry(name)
                .or_insert_with(|| GroupHosts { hosts: Vec::new() })
                .hosts
                .extend(inventory.group_hosts(group));
        }

        let ungrouped: Vec<&'a str> = hosts
            .iter()
            .filter(|(_, partition)| !grouped.contains(partition.key()))
            .map(|(name, _)| *name)
            .collect();
        if !ungrouped.is_empty() {
            groups
                .entry(UNGROUPED.to_string())
                .or_insert_with(|| GroupHosts { hosts: Vec::new() })
                .hosts
                .extend(ungrouped);
        }

        for group in groups.values_mut() {
            group.hosts.sort_unstable();
            group.hosts.dedup();
        }

        Self {
            meta: Meta { hostvars },
            all: AllGroup {
                children: groups.keys().cloned().collect(),
            },
            groups,
        }
    }
}
