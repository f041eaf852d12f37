use super::inventory_document::{HostVars, InventoryDocument};
use crate::inventory::domain::Inventory;
use crate::ports::outbound::InventoryFormatter;
use crate::shared::Result;

/// AnsibleJsonFormatter adapter rendering the Ansible dynamic inventory JSON shape
///
/// ```json
/// {"_meta": {"hostvars": {...}}, "all": {"children": [...]}, "<group>": {"hosts": [...]}}
/// ```
pub struct AnsibleJsonFormatter;

impl AnsibleJsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AnsibleJsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl InventoryFormatter for AnsibleJsonFormatter {
    fn format(&self, inventory: &Inventory) -> Result<String> {
        let document = InventoryDocument::from_inventory(inventory);
        serde_json::to_string_pretty(&document)
            .map_err(|e| anyhow::anyhow!("Failed to serialize inventory to JSON: {}", e))
    }

    fn format_host(&self, inventory: &Inventory, host: &str) -> Result<String> {
        match inventory.find_host(host) {
            Some(partition) => serde_json::to_string_pretty(&HostVars::from_partition(partition))
                .map_err(|e| anyhow::anyhow!("Failed to serialize host variables: {}", e)),
            None => Ok("{}".to_string()),
        }
    }
}
