/// A partition exactly as an HMC transport reported it, before normalization
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionRecord {
    pub name: String,
    pub id: u32,
    /// HMC partition type, e.g. `AIX/Linux`, `OS400`, `Virtual IO Server`
    pub partition_type: String,
    pub state: Option<String>,
    pub os_version: Option<String>,
    /// RMC IP address
    pub ip_address: Option<String>,
    pub uuid: Option<String>,
    /// HMC user-defined groups
    pub associated_groups: Vec<String>,
    /// Listed through the Virtual I/O Server collection
    pub is_vios: bool,
}
