/// Data Transfer Objects for application layer
///
/// DTOs are used to transfer data between the application layer
/// and adapters, keeping the domain layer isolated.
mod inventory_request;
mod inventory_response;
mod output_format;

pub use inventory_request::{InventoryRequest, DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT};
pub use inventory_response::InventoryResponse;
pub use output_format::OutputFormat;
