/// Type alias for Result with anyhow::Error as the error type.
/// Layers that need typed failures (`InventoryError`, `FetchError`) convert into it with `?`.
pub type Result<T> = std::result::Result<T, anyhow::Error>;
