/// Console adapters for user-facing feedback
mod progress_reporter;

pub use progress_reporter::StderrProgressReporter;
