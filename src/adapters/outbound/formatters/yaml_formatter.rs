use super::inventory_document::{HostVars, InventoryDocument};
use crate::inventory::domain::Inventory;
use crate::ports::outbound::InventoryFormatter;
use crate::shared::Result;

/// YamlFormatter adapter rendering the inventory document as YAML
pub struct YamlFormatter;

impl YamlFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for YamlFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl InventoryFormatter for YamlFormatter {
    fn format(&self, inventory: &Inventory) -> Result<String> {
        serde_yaml_ng::to_string(&InventoryDocument::from_inventory(inventory))
            .map_err(|e| anyhow::anyhow!("Failed to serialize inventory to YAML: {}", e))
    }

    fn format_host(&self, inventory: &Inventory, host: &str) -> Result<String> {
        match inventory.find_host(host) {
            Some(partition) => serde_yaml_ng::to_string(&HostVars::from_partition(partition))
                .map_err(|e| anyhow::anyhow!("Failed to serialize host variables: {}", e)),
            None => Ok("{}\n".to_string()),
        }
    }
}
