use super::{Mtms, Tag, TagKey};
use std::collections::BTreeSet;
use std::fmt;

/// Operating system family of a partition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsType {
    Aix,
    Linux,
    IbmI,
    Vios,
    Unknown,
}

impl OsType {
    /// Derives the OS family from the HMC partition type and OS version strings.
    ///
    /// The HMC reports AIX and Linux partitions with the same type (`AIX/Linux`),
    /// so the OS version decides between the two when it is available.
    pub fn from_hmc(partition_type: &str, os_version: Option<&str>) -> Self {
        let partition_type = partition_type.trim().to_ascii_lowercase();
        match partition_type.as_str() {
            "os400" | "ibmi" | "ibm i" => OsType::IbmI,
            "virtual io server" | "vioserver" | "vios" => OsType::Vios,
            "aix" => OsType::Aix,
            "linux" => OsType::Linux,
            "aix/linux" | "aixlinux" => {
                let version = os_version.unwrap_or("").trim().to_ascii_lowercase();
                if version.starts_with("aix") {
                    OsType::Aix
                } else if version.starts_with("linux") {
                    OsType::Linux
                } else {
                    OsType::Unknown
                }
            }
            _ => OsType::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OsType::Aix => "aix",
            OsType::Linux => "linux",
            OsType::IbmI => "ibmi",
            OsType::Vios => "vios",
            OsType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for OsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the partition is a client LPAR or a Virtual I/O Server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostType {
    Lpar,
    Vios,
}

impl HostType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HostType::Lpar => "lpar",
            HostType::Vios => "vios",
        }
    }
}

impl fmt::Display for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a partition within one inventory run: (managed system MTMS, partition id)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartitionKey {
    system: Mtms,
    id: u32,
}

impl PartitionKey {
    pub fn new(system: Mtms, id: u32) -> Self {
        Self { system, id }
    }

    pub fn system(&self) -> &Mtms {
        &self.system
    }

    pub fn id(&self) -> u32 {
        self.id
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.system, self.id)
    }
}

/// A logical partition, normalized from one HMC's view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    key: PartitionKey,
    name: String,
    os_type: OsType,
    host_type: HostType,
    system_name: String,
    hmc: String,
    state: Option<String>,
    os_version: Option<String>,
    ip_address: Option<String>,
    uuid: Option<String>,
    tags: BTreeSet<Tag>,
}

impl Partition {
    pub fn new(
        key: PartitionKey,
        name: impl Into<String>,
        os_type: OsType,
        host_type: HostType,
        system_name: impl Into<String>,
        hmc: impl Into<String>,
    ) -> Self {
        Self {
            key,
            name: name.into(),
            os_type,
            host_type,
            system_name: system_name.into(),
            hmc: hmc.into(),
            state: None,
            os_version: None,
            ip_address: None,
            uuid: None,
            tags: BTreeSet::new(),
        }
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn with_os_version(mut self, os_version: impl Into<String>) -> Self {
        self.os_version = Some(os_version.into());
        self
    }

    pub fn with_ip_address(mut self, ip_address: impl Into<String>) -> Self {
        self.ip_address = Some(ip_address.into());
        self
    }

    pub fn with_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = Some(uuid.into());
        self
    }

    pub fn with_tag(mut self, key: TagKey, value: impl Into<String>) -> Self {
        self.tags.insert(Tag::new(key, value));
        self
    }

    pub fn key(&self) -> &PartitionKey {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> u32 {
        self.key.id
    }

    pub fn os_type(&self) -> OsType {
        self.os_type
    }

    pub fn host_type(&self) -> HostType {
        self.host_type
    }

    pub fn system_name(&self) -> &str {
        &self.system_name
    }

    pub fn mtms(&self) -> &Mtms {
        &self.key.system
    }

    /// Host of the HMC this view of the partition came from
    pub fn hmc(&self) -> &str {
        &self.hmc
    }

    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    pub fn os_version(&self) -> Option<&str> {
        self.os_version.as_deref()
    }

    pub fn ip_address(&self) -> Option<&str> {
        self.ip_address.as_deref()
    }

    pub fn uuid(&self) -> Option<&str> {
        self.uuid.as_deref()
    }

    pub fn tags(&self) -> &BTreeSet<Tag> {
        &self.tags
    }

    /// All values carried for one tag key, in sorted order
    pub fn tag_values(&self, key: TagKey) -> impl Iterator<Item = &str> {
        self.tags
            .iter()
            .filter(move |t| t.key() == key)
            .map(|t| t.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(id: u32) -> PartitionKey {
        PartitionKey::new("9009-42A*7800AB1".parse().unwrap(), id)
    }

    #[test]
    fn test_os_type_from_hmc() {
        assert_eq!(OsType::from_hmc("OS400", None), OsType::IbmI);
        assert_eq!(OsType::from_hmc("Virtual IO Server", None), OsType::Vios);
        assert_eq!(
            OsType::from_hmc("AIX/Linux", Some("AIX 7.3 7300-02-01-2346")),
            OsType::Aix
        );
        assert_eq!(
            OsType::from_hmc("AIX/Linux", Some("Linux/Red Hat 5.14.0 9.2")),
            OsType::Linux
        );
        assert_eq!(OsType::from_hmc("AIX/Linux", None), OsType::Unknown);
        assert_eq!(OsType::from_hmc("something", None), OsType::Unknown);
    }

    #[test]
    fn test_partition_key_display_and_order() {
        assert_eq!(key(3).to_string(), "9009-42A*7800AB1/3");
        assert!(key(2) < key(10));
    }

    #[test]
    fn test_partition_builder_and_tags() {
        let partition = Partition::new(key(4), "aix01", OsType::Aix, HostType::Lpar, "p9", "hmc1")
            .with_state("running")
            .with_ip_address("10.0.0.4")
            .with_tag(TagKey::AssociatedGroups, "prod")
            .with_tag(TagKey::AssociatedGroups, "db")
            .with_tag(TagKey::SystemName, "p9");

        assert_eq!(partition.id(), 4);
        assert_eq!(partition.state(), Some("running"));
        assert_eq!(partition.ip_address(), Some("10.0.0.4"));
        assert_eq!(partition.tags().len(), 3);
        let groups: Vec<&str> = partition.tag_values(TagKey::AssociatedGroups).collect();
        assert_eq!(groups, vec!["db", "prod"]);
    }
}
