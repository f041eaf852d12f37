use std::fmt;
use std::str::FromStr;

/// The attributes a partition can be grouped or filtered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TagKey {
    /// HMC user-defined groups the partition belongs to (multi-valued)
    AssociatedGroups,
    /// Host of the HMC the partition was collected from
    AssociatedHmc,
    /// User the HMC session was opened with
    AssociatedHmcUserName,
    /// Name of the managed system
    SystemName,
    /// Operating system family (aix, linux, ibmi, vios)
    PartitionType,
    /// Partition state as reported by the HMC (e.g. running)
    PartitionState,
    /// lpar or vios
    HostType,
}

impl TagKey {
    pub const ALL: [TagKey; 7] = [
        TagKey::AssociatedGroups,
        TagKey::AssociatedHmc,
        TagKey::AssociatedHmcUserName,
        TagKey::SystemName,
        TagKey::PartitionType,
        TagKey::PartitionState,
        TagKey::HostType,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TagKey::AssociatedGroups => "AssociatedGroups",
            TagKey::AssociatedHmc => "AssociatedHMC",
            TagKey::AssociatedHmcUserName => "AssociatedHMCUserName",
            TagKey::SystemName => "SystemName",
            TagKey::PartitionType => "PartitionType",
            TagKey::PartitionState => "PartitionState",
            TagKey::HostType => "HostType",
        }
    }

    /// Prefix used for group names when the configuration gives none
    pub fn default_prefix(&self) -> &'static str {
        match self {
            TagKey::AssociatedGroups => "group",
            TagKey::AssociatedHmc => "hmc",
            TagKey::AssociatedHmcUserName => "hmc_user",
            TagKey::SystemName => "system",
            TagKey::PartitionType => "os",
            TagKey::PartitionState => "state",
            TagKey::HostType => "type",
        }
    }
}

impl FromStr for TagKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "associatedgroups" | "groups" => Ok(TagKey::AssociatedGroups),
            "associatedhmc" | "hmc" => Ok(TagKey::AssociatedHmc),
            "associatedhmcusername" | "hmcuser" => Ok(TagKey::AssociatedHmcUserName),
            "systemname" | "system" => Ok(TagKey::SystemName),
            "partitiontype" | "ostype" | "os" => Ok(TagKey::PartitionType),
            "partitionstate" | "state" => Ok(TagKey::PartitionState),
            "hosttype" => Ok(TagKey::HostType),
            _ => Err(format!(
                "Invalid tag key: {}. Expected one of: {}",
                s,
                TagKey::ALL
                    .iter()
                    .map(|k| k.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

impl fmt::Display for TagKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single key/value label attached to a partition, rendered as `Key=Value`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag {
    key: TagKey,
    value: String,
}

impl Tag {
    pub fn new(key: TagKey, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }

    pub fn key(&self) -> TagKey {
        self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}
