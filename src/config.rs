//! Configuration file support for hmc-inventory.
//!
//! Provides YAML-based configuration through `hmc-inventory.config.yml` files,
//! including data structures, file loading, validation, and conversion into
//! the domain types the inventory run needs.

use anyhow::Context;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::inventory::domain::{CredentialReference, GroupSpec, HostNaming, TagKey};
use crate::inventory::services::{HostDefaults, HostSpec, Variables};
use crate::shared::error::ConfigError;
use crate::shared::security::read_regular_file;
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "hmc-inventory.config.yml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub hmc_hosts: Option<Vec<HostEntry>>,
    pub default_user: Option<String>,
    pub default_password: Option<String>,
    pub default_password_env: Option<String>,
    pub vars: Option<BTreeMap<String, VarValue>>,
    pub group_by: Option<Vec<GroupByEntry>>,
    pub include_vios: Option<bool>,
    pub filters: Option<BTreeMap<String, Vec<String>>>,
    pub exclude_partitions: Option<Vec<String>>,
    pub exclude_systems: Option<Vec<String>>,
    pub host_naming: Option<String>,
    pub format: Option<String>,
    pub concurrency: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub validate_certs: Option<bool>,
    pub rest_port: Option<u16>,
    pub transport: Option<String>,
    pub fixture_dir: Option<PathBuf>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// One `hmc_hosts` entry: a bare template string or a mapping with credentials.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum HostEntry {
    Template(String),
    Detailed {
        host: String,
        user: Option<String>,
        password: Option<String>,
        password_env: Option<String>,
    },
}

/// A `vars` value: a scalar or a list of scalars.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum VarValue {
    List(Vec<serde_yaml_ng::Value>),
    Scalar(serde_yaml_ng::Value),
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct GroupByEntry {
    pub key: String,
    pub prefix: Option<String>,
}

/// Where partition data comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transport {
    /// HMC REST API
    #[default]
    Rest,
    /// Recorded HMC answers in a directory
    Fixture,
}

impl FromStr for Transport {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rest" => Ok(Transport::Rest),
            "fixture" | "fixtures" => Ok(Transport::Fixture),
            _ => Err(format!(
                "Invalid transport: {}. Please specify 'rest' or 'fixture'",
                s
            )),
        }
    }
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = read_regular_file(path, "config file").with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let mut config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    // Relative fixture directories are relative to the config file
    if let (Some(dir), Some(base)) = (config.fixture_dir.as_ref(), path.parent()) {
        if dir.is_relative() {
            config.fixture_dir = Some(base.join(dir));
        }
    }

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    tracing::debug!(path = %config_path.display(), "using discovered config file");
    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

fn invalid(field: impl Into<String>, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.into(),
        reason: reason.into(),
    }
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> std::result::Result<(), ConfigError> {
    if config.concurrency == Some(0) {
        return Err(invalid("concurrency", "must be at least 1"));
    }
    if config.timeout_secs == Some(0) {
        return Err(invalid("timeout_secs", "must be greater than 0"));
    }
    if let Some(hosts) = &config.hmc_hosts {
        for (i, entry) in hosts.iter().enumerate() {
            if entry.template().trim().is_empty() {
                return Err(invalid(
                    format!("hmc_hosts[{}].host", i),
                    "must not be empty",
                ));
            }
        }
    }
    if let Some(transport) = &config.transport {
        let transport = Transport::from_str(transport).map_err(|e| invalid("transport", e))?;
        if transport == Transport::Fixture && config.fixture_dir.is_none() {
            return Err(invalid("fixture_dir", "required when transport is 'fixture'"));
        }
    }

    config.group_specs()?;
    config.tag_filters()?;
    config.naming()?;
    config.variables()?;
    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        eprintln!(
            "⚠️  Warning: Unknown config field '{}' will be ignored.",
            key
        );
    }
}

impl HostEntry {
    pub fn template(&self) -> &str {
        match self {
            HostEntry::Template(template) => template,
            HostEntry::Detailed { host, .. } => host,
        }
    }

    fn to_spec(&self) -> HostSpec {
        match self {
            HostEntry::Template(template) => HostSpec::new(template.as_str()),
            HostEntry::Detailed {
                host,
                user,
                password,
                password_env,
            } => {
                let mut spec = HostSpec::new(host.as_str());
                if let Some(user) = user {
                    spec = spec.with_user(user.as_str());
                }
                if let Some(credential) = credential(password, password_env) {
                    spec = spec.with_credential(credential);
                }
                spec
            }
        }
    }
}

/// An environment reference wins over an inline password
fn credential(
    password: &Option<String>,
    password_env: &Option<String>,
) -> Option<CredentialReference> {
    match (password_env, password) {
        (Some(env), _) => Some(CredentialReference::Env(env.clone())),
        (None, Some(password)) => Some(CredentialReference::Inline(password.clone())),
        (None, None) => None,
    }
}

fn scalar_to_string(name: &str, value: &serde_yaml_ng::Value) -> std::result::Result<String, ConfigError> {
    match value {
        serde_yaml_ng::Value::String(s) => Ok(s.clone()),
        serde_yaml_ng::Value::Number(n) => Ok(n.to_string()),
        serde_yaml_ng::Value::Bool(b) => Ok(b.to_string()),
        _ => Err(invalid(
            format!("vars.{}", name),
            "values must be strings, numbers or lists of them",
        )),
    }
}

impl ConfigFile {
    pub fn host_specs(&self) -> Vec<HostSpec> {
        self.hmc_hosts
            .iter()
            .flatten()
            .map(HostEntry::to_spec)
            .collect()
    }

    pub fn host_defaults(&self) -> HostDefaults {
        HostDefaults {
            user: self.default_user.clone(),
            credential: credential(&self.default_password, &self.default_password_env),
        }
    }

    pub fn variables(&self) -> std::result::Result<Variables, ConfigError> {
        let mut variables = Variables::new();
        for (name, value) in self.vars.iter().flatten() {
            let values = match value {
                VarValue::List(items) => items
                    .iter()
                    .map(|item| scalar_to_string(name, item))
                    .collect::<std::result::Result<Vec<_>, _>>()?,
                VarValue::Scalar(item) => vec![scalar_to_string(name, item)?],
            };
            variables.insert(name.clone(), values);
        }
        Ok(variables)
    }

    pub fn group_specs(&self) -> std::result::Result<Vec<GroupSpec>, ConfigError> {
        self.group_by
            .iter()
            .flatten()
            .map(|entry| {
                let key = TagKey::from_str(&entry.key).map_err(|e| invalid("group_by.key", e))?;
                Ok(match &entry.prefix {
                    Some(prefix) => GroupSpec::with_prefix(key, prefix.as_str()),
                    None => GroupSpec::new(key),
                })
            })
            .collect()
    }

    pub fn tag_filters(&self) -> std::result::Result<BTreeMap<TagKey, Vec<String>>, ConfigError> {
        self.filters
            .iter()
            .flatten()
            .map(|(key, values)| {
                let key = TagKey::from_str(key).map_err(|e| invalid("filters", e))?;
                Ok((key, values.clone()))
            })
            .collect()
    }

    pub fn naming(&self) -> std::result::Result<HostNaming, ConfigError> {
        match &self.host_naming {
            Some(naming) => HostNaming::from_str(naming).map_err(|e| invalid("host_naming", e)),
            None => Ok(HostNaming::default()),
        }
    }

    pub fn transport(&self) -> std::result::Result<Transport, ConfigError> {
        match &self.transport {
            Some(transport) => Transport::from_str(transport).map_err(|e| invalid("transport", e)),
            None => Ok(Transport::default()),
        }
    }
}
