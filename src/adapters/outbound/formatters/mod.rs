/// Formatter adapters for the inventory output formats
mod ansible_json_formatter;
mod inventory_document;
mod yaml_formatter;

pub use ansible_json_formatter::AnsibleJsonFormatter;
pub use yaml_formatter::YamlFormatter;
