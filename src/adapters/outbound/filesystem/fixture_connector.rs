use crate::adapters::outbound::network::{parse_managed_systems, parse_partitions};
use crate::inventory::domain::{HmcEndpoint, ManagedSystem, PartitionRecord};
use crate::ports::outbound::{HmcConnector, HmcSession};
use crate::shared::error::FetchError;
use crate::shared::security::read_regular_file;
use async_trait::async_trait;
use std::path::PathBuf;

/// FixtureConnector adapter serving recorded HMC answers from disk
///
/// Layout under the fixture root, one directory per HMC host:
///
/// ```text
/// <root>/<host>/systems.json            managed systems (quick API shape)
/// <root>/<host>/<uuid>/partitions.json  logical partitions of a system
/// <root>/<host>/<uuid>/vios.json        VIOS partitions of a system
/// ```
///
/// A missing host directory behaves like an unreachable HMC. Missing partition
/// files mean the system has no partitions of that kind.
pub struct FixtureConnector {
    root: PathBuf,
}

impl FixtureConnector {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl HmcConnector for FixtureConnector {
    async fn connect(&self, endpoint: &HmcEndpoint) -> Result<Box<dyn HmcSession>, FetchError> {
        let host_dir = self.root.join(endpoint.host());
        if !host_dir.is_dir() {
            return Err(FetchError::connection(
                endpoint.host(),
                format!("no fixture directory at {}", host_dir.display()),
            ));
        }

        tracing::debug!(hmc = %endpoint.host(), dir = %host_dir.display(), "serving HMC from fixtures");

        Ok(Box::new(FixtureSession {
            host: endpoint.host().to_string(),
            host_dir,
        }))
    }
}

struct FixtureSession {
    host: String,
    host_dir: PathBuf,
}

impl FixtureSession {
    /// Reads a fixture file on the blocking pool so concurrent sessions keep progressing
    async fn read(&self, path: PathBuf) -> Result<String, FetchError> {
        tokio::task::spawn_blocking(move || read_regular_file(&path, "fixture file"))
            .await
            .map_err(|e| FetchError::protocol(&self.host, e))?
            .map_err(|e| FetchError::protocol(&self.host, format!("{:#}", e)))
    }

    async fn read_optional(&self, path: PathBuf) -> Result<Option<String>, FetchError> {
        if path.exists() || path.is_symlink() {
            self.read(path).await.map(Some)
        } else {
            Ok(None)
        }
    }
}

#[async_trait]
impl HmcSession for FixtureSession {
    async fn list_managed_systems(&mut self) -> Result<Vec<ManagedSystem>, FetchError> {
        let body = self.read(self.host_dir.join("systems.json")).await?;
        parse_managed_systems(&self.host, &body)
    }

    async fn list_partitions(
        &mut self,
        system: &ManagedSystem,
        include_vios: bool,
    ) -> Result<Vec<PartitionRecord>, FetchError> {
        let uuid = system.uuid();
        if uuid.is_empty() || uuid.contains(['/', '\\']) || uuid.contains("..") {
            return Err(FetchError::protocol(
                &self.host,
                format!("managed system UUID '{}' is not usable as a directory", uuid),
            ));
        }
        let system_dir = self.host_dir.join(uuid);
        let mut records = match self.read_optional(system_dir.join("partitions.json")).await? {
            Some(body) => parse_partitions(&self.host, &body, false)?,
            None => Vec::new(),
        };

        if include_vios {
            if let Some(body) = self.read_optional(system_dir.join("vios.json")).await? {
                records.extend(parse_partitions(&self.host, &body, true)?);
            }
        }

        Ok(records)
    }

    async fn close(self: Box<Self>) -> Result<(), FetchError> {
        Ok(())
    }
}
