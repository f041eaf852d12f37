//! hmc-inventory - Ansible dynamic inventory for IBM Power HMCs
//!
//! This library resolves a list of HMC endpoints from host templates, collects the
//! logical partitions every HMC manages, and merges them into one grouped inventory,
//! following hexagonal architecture and Domain-Driven Design principles.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`inventory`): Pure business logic and domain models
//! - **Application Layer** (`application`): Use cases and application services
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use hmc_inventory::prelude::*;
//! use std::collections::BTreeMap;
//!
//! # async fn run() -> Result<()> {
//! let specs = vec![HostSpec::new("hmc[01:02].lab.example.com")
//!     .with_user("hscroot")
//!     .with_credential(CredentialReference::Env("HMC_PASSWORD".to_string()))];
//! let endpoints = resolve_hosts(&specs, &HostDefaults::default(), &BTreeMap::new(), |name| {
//!     std::env::var(name).ok()
//! })?;
//!
//! let use_case = BuildInventoryUseCase::new(
//!     HmcRestConnector::new(RestSettings::default())?,
//!     StderrProgressReporter::new(),
//! );
//! let response = use_case.execute(InventoryRequest::new(endpoints)).await?;
//!
//! let output = AnsibleJsonFormatter::new().format(&response.inventory)?;
//! println!("{}", output);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod cli;
pub mod config;
pub mod inventory;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{
        FileSystemWriter, FixtureConnector, StdoutPresenter,
    };
    pub use crate::adapters::outbound::formatters::{AnsibleJsonFormatter, YamlFormatter};
    pub use crate::adapters::outbound::network::{HmcRestConnector, RestSettings};
    pub use crate::application::dto::{InventoryRequest, InventoryResponse, OutputFormat};
    pub use crate::application::use_cases::BuildInventoryUseCase;
    pub use crate::inventory::domain::{
        CredentialReference, GroupSpec, HmcEndpoint, HostNaming, HostType, Inventory,
        ManagedSystem, Mtms, OsType, Partition, PartitionKey, PartitionRecord, Secret, TagKey,
    };
    pub use crate::inventory::services::{
        expand_template, resolve_hosts, HostDefaults, HostSpec, InventoryMerger, Variables,
    };
    pub use crate::ports::outbound::{
        HmcConnector, HmcSession, InventoryFormatter, OutputPresenter, ProgressReporter,
    };
    pub use crate::shared::error::{ConfigError, ExitCode, FetchError};
    pub use crate::shared::Result;
}
