/// Mock implementations for testing
mod mock_hmc_connector;
mod mock_progress_reporter;

pub use mock_hmc_connector::MockHmcConnector;
pub use mock_progress_reporter::MockProgressReporter;
