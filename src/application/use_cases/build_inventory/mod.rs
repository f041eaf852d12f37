use crate::application::dto::{InventoryRequest, InventoryResponse};
use crate::inventory::domain::{HmcEndpoint, Inventory, Partition};
use crate::inventory::services::{InventoryMerger, PartitionFilter, PartitionNormalizer};
use crate::ports::outbound::{HmcConnector, HmcSession, ProgressReporter};
use crate::shared::error::FetchError;
use crate::shared::Result;
use futures::stream::{self, StreamExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;


/// BuildInventoryUseCase - queries every HMC and merges the results into one inventory
///
/// # Type Parameters
/// * `C` - HmcConnector implementation
/// * `PR` - ProgressReporter implementation
pub struct BuildInventoryUseCase<C, PR> {
    connector: C,
    progress_reporter: PR,
}

impl<C, PR> BuildInventoryUseCase<C, PR>
where
    C: HmcConnector,
    PR: ProgressReporter,
{
    /// Creates a new BuildInventoryUseCase with injected dependencies
    pub fn new(connector: C, progress_reporter: PR) -> Self {
        Self {
            connector,
            progress_reporter,
        }
    }

    /// Executes the inventory use case
    ///
    /// Endpoints are fetched with at most `request.concurrency` in flight. Results come
    /// back in endpoint order, so merging stays deterministic whatever finishes first.
    /// A failing endpoint is reported and skipped.
    ///
    /// # Errors
    /// Only invalid filter patterns fail the whole run.
    pub async fn execute(&self, request: InventoryRequest) -> Result<InventoryResponse> {
        let filter = PartitionFilter::new(
            request.include_vios,
            request.filters.clone(),
            request.exclude_partitions.clone(),
            request.exclude_systems.clone(),
        )?;

        let results = self.fetch_all(&request).await;

        let (batches, failures) = self.split_failures(results);

        // Filtering happens on the merged winners so a rejected later copy never
        // lets an earlier endpoint's copy back in
        let outcome = InventoryMerger::new(request.group_specs.clone(), request.host_naming)
            .merge_filtered(batches, |partition| filter.accepts(partition));
        if outcome.excluded > 0 {
            self.progress_reporter.report(&format!(
                "🚫 Excluded {} partition(s) based on filters",
                outcome.excluded
            ));
        }

        let mut warnings = Vec::new();
        for pattern in filter.get_unmatched_patterns() {
            let message = format!(
                "Exclude pattern '{}' did not match any partition or system.",
                pattern
            );
            self.progress_reporter
                .report_error(&format!("⚠️  Warning: {}", message));
            warnings.push(message);
        }

        for warning in &outcome.warnings {
            self.progress_reporter
                .report_error(&format!("⚠️  Warning: {}", warning));
        }
        warnings.extend(outcome.warnings);

        self.report_summary(&request, &outcome.inventory, &failures);

        Ok(InventoryResponse {
            inventory: outcome.inventory,
            failures,
            warnings,
            replaced: outcome.replaced,
        })
    }

    async fn fetch_all(
        &self,
        request: &InventoryRequest,
    ) -> Vec<std::result::Result<Vec<Partition>, FetchError>> {
        let total = request.endpoints.len();
        self.progress_reporter.report(&format!(
            "🔍 Querying {} HMC(s) (concurrency: {})...",
            total, request.concurrency
        ));

        let completed = AtomicUsize::new(0);
        stream::iter(request.endpoints.iter())
            .map(|endpoint| {
                let completed = &completed;
                async move {
                    let result = self
                        .fetch_partitions(endpoint, request.include_vios, request.timeout)
                        .await;
                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    self.progress_reporter
                        .report_progress(done, total, Some(endpoint.host()));
                    result
                }
            })
            .buffered(request.concurrency.max(1))
            .collect()
            .await
    }

    /// Separates per-endpoint batches from failures, reporting each failure
    fn split_failures(
        &self,
        results: Vec<std::result::Result<Vec<Partition>, FetchError>>,
    ) -> (Vec<Vec<Partition>>, Vec<FetchError>) {
        let mut batches = Vec::with_capacity(results.len());
        let mut failures = Vec::new();

        for result in results {
            match result {
                Ok(partitions) => batches.push(partitions),
                Err(error) => {
                    self.progress_reporter.report_error(&format!(
                        "⚠️  Warning: {}. Skipping this HMC.",
                        error
                    ));
                    failures.push(error);
                }
            }
        }

        (batches, failures)
    }

    /// Collects the partitions of one HMC within `timeout`
    ///
    /// The budget covers logon, every query and logoff.
    pub async fn fetch_partitions(
        &self,
        endpoint: &HmcEndpoint,
        include_vios: bool,
        timeout: Duration,
    ) -> std::result::Result<Vec<Partition>, FetchError> {
        match tokio::time::timeout(timeout, self.open_query_close(endpoint, include_vios)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::debug!(hmc = %endpoint.host(), ?timeout, "HMC fetch timed out");
                Err(FetchError::Timeout {
                    host: endpoint.host().to_string(),
                    seconds: timeout.as_secs(),
                })
            }
        }
    }

    async fn open_query_close(
        &self,
        endpoint: &HmcEndpoint,
        include_vios: bool,
    ) -> std::result::Result<Vec<Partition>, FetchError> {
        let mut session = self.connector.connect(endpoint).await?;
        let result = Self::query(session.as_mut(), endpoint, include_vios).await;

        // The session is closed on every path; a failed logoff only matters if nothing else failed
        match (session.close().await, result) {
            (Ok(()), result) => result,
            (Err(close_error), Ok(partitions)) => {
                tracing::warn!(hmc = %endpoint.host(), error = %close_error, "HMC logoff failed");
                Ok(partitions)
            }
            (Err(close_error), Err(error)) => {
                tracing::debug!(hmc = %endpoint.host(), error = %close_error, "HMC logoff failed after query error");
                Err(error)
            }
        }
    }

    async fn query(
        session: &mut dyn HmcSession,
        endpoint: &HmcEndpoint,
        include_vios: bool,
    ) -> std::result::Result<Vec<Partition>, FetchError> {
        let systems = session.list_managed_systems().await?;
        tracing::debug!(hmc = %endpoint.host(), systems = systems.len(), "listed managed systems");

        let mut partitions = Vec::new();
        for system in &systems {
            let records = session.list_partitions(system, include_vios).await?;
            tracing::debug!(
                hmc = %endpoint.host(),
                system = %system.name(),
                partitions = records.len(),
                "listed partitions"
            );
            partitions.extend(
                records
                    .into_iter()
                    .map(|record| PartitionNormalizer::normalize(endpoint, system, record)),
            );
        }
        Ok(partitions)
    }

    fn report_summary(
        &self,
        request: &InventoryRequest,
        inventory: &Inventory,
        failures: &[FetchError],
    ) {
        let total = request.endpoints.len();
        let reachable = total - failures.len();
        if !failures.is_empty() {
            let hosts: Vec<&str> = failures.iter().map(FetchError::host).collect();
            self.progress_reporter.report_error(&format!(
                "⚠️  Warning: {} of {} HMC(s) could not be queried: {}",
                failures.len(),
                total,
                hosts.join(", ")
            ));
        }
        self.progress_reporter.report_completion(&format!(
            "✅ Collected {} partition(s) in {} group(s) from {}/{} HMC(s)",
            inventory.partition_count(),
            inventory.groups().len(),
            reachable,
            total
        ));
    }
}
