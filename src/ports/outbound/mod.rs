/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with external systems (HMCs, file system, console).
pub mod formatter;
pub mod hmc_connector;
pub mod output_presenter;
pub mod progress_reporter;

pub use formatter::InventoryFormatter;
pub use hmc_connector::{HmcConnector, HmcSession};
pub use output_presenter::OutputPresenter;
pub use progress_reporter::ProgressReporter;
