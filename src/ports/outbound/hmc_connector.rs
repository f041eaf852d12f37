use crate::inventory::domain::{HmcEndpoint, ManagedSystem, PartitionRecord};
use crate::shared::error::FetchError;
use async_trait::async_trait;

/// HmcConnector port for opening sessions against an HMC
///
/// This port hides the HMC transport (REST API, recorded fixtures, ...)
/// from the collection workflow.
///
/// # Async Support
/// Implementations must be `Send + Sync` so endpoints can be queried concurrently.
#[async_trait]
pub trait HmcConnector: Send + Sync {
    /// Opens an authenticated session
    ///
    /// # Errors
    /// Returns `FetchError::Connection` when the HMC is unreachable or rejects the login.
    async fn connect(&self, endpoint: &HmcEndpoint) -> Result<Box<dyn HmcSession>, FetchError>;
}

/// One open session with an HMC
///
/// A session is used by a single task and must be closed when the caller is done,
/// whether or not the queries succeeded.
#[async_trait]
pub trait HmcSession: Send {
    /// Lists the managed systems the HMC controls
    ///
    /// # Errors
    /// - `FetchError::Connection` for transport failures
    /// - `FetchError::Protocol` when the response cannot be understood
    async fn list_managed_systems(&mut self) -> Result<Vec<ManagedSystem>, FetchError>;

    /// Lists the partitions of one managed system
    ///
    /// # Arguments
    /// * `system` - A system previously returned by `list_managed_systems`
    /// * `include_vios` - Also list Virtual I/O Server partitions
    async fn list_partitions(
        &mut self,
        system: &ManagedSystem,
        include_vios: bool,
    ) -> Result<Vec<PartitionRecord>, FetchError>;

    /// Ends the session (logoff)
    async fn close(self: Box<Self>) -> Result<(), FetchError>;
}
