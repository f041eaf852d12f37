use async_trait::async_trait;
use hmc_inventory::prelude::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock HmcConnector serving canned managed systems per host.
///
/// Hosts without an answer refuse the connection.
#[derive(Default, Clone)]
pub struct MockHmcConnector {
    answers: HashMap<String, Vec<(ManagedSystem, Vec<PartitionRecord>)>>,
    sessions_closed: Arc<Mutex<Vec<String>>>,
}

impl MockHmcConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one managed system with its partitions to `host`
    pub fn with_system(
        mut self,
        host: &str,
        system: ManagedSystem,
        partitions: Vec<PartitionRecord>,
    ) -> Self {
        self.answers
            .entry(host.to_string())
            .or_default()
            .push((system, partitions));
        self
    }

    pub fn closed_sessions(&self) -> Vec<String> {
        self.sessions_closed.lock().unwrap().clone()
    }
}

#[async_trait]
impl HmcConnector for MockHmcConnector {
    async fn connect(
        &self,
        endpoint: &HmcEndpoint,
    ) -> std::result::Result<Box<dyn HmcSession>, FetchError> {
        let systems = self
            .answers
            .get(endpoint.host())
            .ok_or_else(|| FetchError::connection(endpoint.host(), "connection refused"))?;
        Ok(Box::new(MockHmcSession {
            host: endpoint.host().to_string(),
            systems: systems.clone(),
            sessions_closed: self.sessions_closed.clone(),
        }))
    }
}

struct MockHmcSession {
    host: String,
    systems: Vec<(ManagedSystem, Vec<PartitionRecord>)>,
    sessions_closed: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl HmcSession for MockHmcSession {
    async fn list_managed_systems(
        &mut self,
    ) -> std::result::Result<Vec<ManagedSystem>, FetchError> {
        Ok(self.systems.iter().map(|(s, _)| s.clone()).collect())
    }

    async fn list_partitions(
        &mut self,
        system: &ManagedSystem,
        include_vios: bool,
    ) -> std::result::Result<Vec<PartitionRecord>, FetchError> {
        Ok(self
            .systems
            .iter()
            .filter(|(s, _)| s == system)
            .flat_map(|(_, records)| records.iter().cloned())
            .filter(|r| include_vios || !r.is_vios)
            .collect())
    }

    async fn close(self: Box<Self>) -> std::result::Result<(), FetchError> {
        self.sessions_closed.lock().unwrap().push(self.host.clone());
        Ok(())
    }
}
