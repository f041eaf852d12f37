use crate::inventory::domain::Inventory;
use crate::shared::Result;

/// InventoryFormatter port for rendering the merged inventory
pub trait InventoryFormatter {
    /// Renders the full inventory (groups and host variables)
    ///
    /// # Errors
    /// Returns an error if serialization fails
    fn format(&self, inventory: &Inventory) -> Result<String>;

    /// Renders the variables of a single host.
    ///
    /// Unknown hosts render as an empty mapping, as dynamic inventory consumers expect.
    fn format_host(&self, inventory: &Inventory, host: &str) -> Result<String>;
}
