use crate::inventory::domain::Inventory;
use crate::shared::error::FetchError;

/// InventoryResponse - Internal response DTO from the inventory use case
#[derive(Debug, Clone)]
pub struct InventoryResponse {
    pub inventory: Inventory,
    /// Endpoints that were skipped, in resolution order
    pub failures: Vec<FetchError>,
    /// Non-fatal findings (renamed hosts, unmatched exclusion patterns)
    pub warnings: Vec<String>,
    /// Partition records replaced by a later endpoint during the merge
    pub replaced: usize,
}

impl InventoryResponse {
    /// True when at least one endpoint could not be queried
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }
}
