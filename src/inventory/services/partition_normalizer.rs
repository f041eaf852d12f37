use crate::inventory::domain::{
    HmcEndpoint, HostType, ManagedSystem, OsType, Partition, PartitionKey, PartitionRecord, TagKey,
};

/// PartitionNormalizer - turns raw HMC partition records into tagged domain partitions
pub struct PartitionNormalizer;

impl PartitionNormalizer {
    /// Normalizes one record reported by `endpoint` for `system`.
    ///
    /// Blank optional fields are dropped. Tags always carry the HMC, HMC user,
    /// system name, OS family and host type; state and HMC groups when known.
    pub fn normalize(
        endpoint: &HmcEndpoint,
        system: &ManagedSystem,
        record: PartitionRecord,
    ) -> Partition {
        let non_blank = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let state = non_blank(record.state);
        let os_version = non_blank(record.os_version);
        let ip_address = non_blank(record.ip_address);
        let uuid = non_blank(record.uuid);

        let os_type = if record.is_vios {
            OsType::Vios
        } else {
            OsType::from_hmc(&record.partition_type, os_version.as_deref())
        };
        let host_type = if os_type == OsType::Vios {
            HostType::Vios
        } else {
            HostType::Lpar
        };

        let mut partition = Partition::new(
            PartitionKey::new(system.mtms().clone(), record.id),
            record.name.trim(),
            os_type,
            host_type,
            system.name(),
            endpoint.host(),
        )
        .with_tag(TagKey::AssociatedHmc, endpoint.host())
        .with_tag(TagKey::AssociatedHmcUserName, endpoint.username())
        .with_tag(TagKey::SystemName, system.name())
        .with_tag(TagKey::PartitionType, os_type.as_str())
        .with_tag(TagKey::HostType, host_type.as_str());

        for group in record.associated_groups {
            let group = group.trim();
            if !group.is_empty() {
                partition = partition.with_tag(TagKey::AssociatedGroups, group);
            }
        }
        if let Some(state) = state {
            partition = partition
                .with_tag(TagKey::PartitionState, state.as_str())
                .with_state(state);
        }
        if let Some(os_version) = os_version {
            partition = partition.with_os_version(os_version);
        }
        if let Some(ip_address) = ip_address {
            partition = partition.with_ip_address(ip_address);
        }
        if let Some(uuid) = uuid {
            partition = partition.with_uuid(uuid);
        }

        partition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::domain::Secret;

    fn endpoint() -> HmcEndpoint {
        HmcEndpoint::new("hmc1.example.com", "hscroot", Secret::new("pw"))
    }

    fn system() -> ManagedSystem {
        ManagedSystem::new(
            "p9-lab",
            "9009-42A*7800AB1".parse().unwrap(),
            "sys-uuid",
            "hmc1.example.com",
        )
    }

    #[test]
    fn test_normalize_aix_partition() {
        let record = PartitionRecord {
            name: "aix01".to_string(),
            id: 3,
            partition_type: "AIX/Linux".to_string(),
            state: Some("running".to_string()),
            os_version: Some("AIX 7.3 7300-02-01".to_string()),
            ip_address: Some("10.0.0.3".to_string()),
            uuid: Some("lpar-uuid".to_string()),
            associated_groups: vec!["prod".to_string(), " ".to_string()],
            is_vios: false,
        };

        let partition = PartitionNormalizer::normalize(&endpoint(), &system(), record);

        assert_eq!(partition.key().id(), 3);
        assert_eq!(partition.mtms().to_string(), "9009-42A*7800AB1");
        assert_eq!(partition.os_type(), OsType::Aix);
        assert_eq!(partition.host_type(), HostType::Lpar);
        assert_eq!(partition.ip_address(), Some("10.0.0.3"));
        let tags: Vec<String> = partition.tags().iter().map(|t| t.to_string()).collect();
        assert_eq!(
            tags,
            vec![
                "AssociatedGroups=prod",
                "AssociatedHMC=hmc1.example.com",
                "AssociatedHMCUserName=hscroot",
                "SystemName=p9-lab",
                "PartitionType=aix",
                "PartitionState=running",
                "HostType=lpar",
            ]
        );
    }

    #[test]
    fn test_normalize_vios_and_blank_fields() {
        let record = PartitionRecord {
            name: " vios1 ".to_string(),
            id: 1,
            partition_type: "Virtual IO Server".to_string(),
            state: Some("".to_string()),
            ip_address: Some("  ".to_string()),
            is_vios: true,
            ..PartitionRecord::default()
        };

        let partition = PartitionNormalizer::normalize(&endpoint(), &system(), record);

        assert_eq!(partition.name(), "vios1");
        assert_eq!(partition.os_type(), OsType::Vios);
        assert_eq!(partition.host_type(), HostType::Vios);
        assert_eq!(partition.state(), None);
        assert_eq!(partition.ip_address(), None);
        assert_eq!(partition.tag_values(TagKey::PartitionState).count(), 0);
    }
}
