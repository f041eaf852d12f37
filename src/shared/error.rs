use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes let automation distinguish a complete inventory from one
/// assembled while some HMCs were unreachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Inventory built from every configured HMC
    Success = 0,
    /// One or more HMCs failed and `--strict` was requested
    PartialInventory = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Configuration or output error
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::PartialInventory => write!(f, "Partial Inventory (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Fatal configuration errors.
///
/// Any of these aborts the run before a single HMC is contacted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Undefined variable '{variable}' in host template: {template}\n\n💡 Hint: Define it under 'vars' in the config file or pass --var {variable}=VALUE")]
    UndefinedVariable { template: String, variable: String },

    #[error("Invalid host template: {template}\nReason: {reason}")]
    InvalidTemplate { template: String, reason: String },

    #[error("Missing credential for HMC {host}\nReason: {reason}\n\n💡 Hint: Set 'password' or 'password_env' on the host entry, or 'default_password_env' at the top level")]
    MissingCredential { host: String, reason: String },

    #[error("Invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("No HMC hosts configured\n\n💡 Hint: Add at least one entry under 'hmc_hosts'")]
    NoHosts,
}

/// Per-endpoint collection failures.
///
/// These are never fatal: the endpoint is skipped and reported in the run summary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Connection to HMC {host} failed: {details}")]
    Connection { host: String, details: String },

    #[error("Unexpected response from HMC {host}: {details}")]
    Protocol { host: String, details: String },

    #[error("HMC {host} did not answer within {seconds}s")]
    Timeout { host: String, seconds: u64 },
}

impl FetchError {
    pub fn connection(host: impl Into<String>, details: impl fmt::Display) -> Self {
        FetchError::Connection {
            host: host.into(),
            details: details.to_string(),
        }
    }

    pub fn protocol(host: impl Into<String>, details: impl fmt::Display) -> Self {
        FetchError::Protocol {
            host: host.into(),
            details: details.to_string(),
        }
    }

    /// The HMC host this failure belongs to
    pub fn host(&self) -> &str {
        match self {
            FetchError::Connection { host, .. }
            | FetchError::Protocol { host, .. }
            | FetchError::Timeout { host, .. } => host,
        }
    }
}

/// Input/output errors around the inventory document and local files.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Failed to read file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file exists and you have read permissions")]
    FileReadError { path: PathBuf, details: String },

    #[error("Security violation: {path}\nReason: {reason}\n\n💡 Hint: {hint}")]
    SecurityError {
        path: PathBuf,
        reason: String,
        hint: String,
    },
}
