use crate::adapters::outbound::formatters::{AnsibleJsonFormatter, YamlFormatter};
use crate::application::dto::OutputFormat;
use crate::ports::outbound::InventoryFormatter;

/// Factory for creating inventory formatters
///
/// Selects the outbound formatter adapter for an output format.
pub struct FormatterFactory;

impl FormatterFactory {
    /// Creates a formatter instance for the specified output format
    ///
    /// # Examples
    /// ```
    /// use hmc_inventory::application::dto::OutputFormat;
    /// use hmc_inventory::application::factories::FormatterFactory;
    ///
    /// let formatter = FormatterFactory::create(OutputFormat::Yaml);
    /// ```
    pub fn create(format: OutputFormat) -> Box<dyn InventoryFormatter> {
        match format {
            OutputFormat::Json => Box::new(AnsibleJsonFormatter::new()),
            OutputFormat::Yaml => Box::new(YamlFormatter::new()),
        }
    }

    /// Returns the progress message for the specified output format
    pub fn progress_message(format: OutputFormat) -> &'static str {
        match format {
            OutputFormat::Json => "📝 Generating Ansible inventory JSON output...",
            OutputFormat::Yaml => "📝 Generating Ansible inventory YAML output...",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::domain::Inventory;

    #[test]
    fn test_created_formatters_render_their_format() {
        let inventory = Inventory::default();

        let json = FormatterFactory::create(OutputFormat::Json)
            .format(&inventory)
            .unwrap();
        assert!(json.trim_start().starts_with('{'));

        let yaml = FormatterFactory::create(OutputFormat::Yaml)
            .format(&inventory)
            .unwrap();
        assert!(yaml.starts_with("_meta:"));
    }

    #[test]
    fn test_progress_message() {
        assert_eq!(
            FormatterFactory::progress_message(OutputFormat::Json),
            "📝 Generating Ansible inventory JSON output..."
        );
        assert_eq!(
            FormatterFactory::progress_message(OutputFormat::Yaml),
            "📝 Generating Ansible inventory YAML output..."
        );
    }
}
