use std::env;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default directive when neither `RUST_LOG` nor `--verbose` is given
pub const DEFAULT_LOG_DIRECTIVE: &str = "warn";

/// Directive used for `--verbose`
pub const VERBOSE_LOG_DIRECTIVE: &str = "warn,hmc_inventory=debug";

/// Initializes diagnostic logging.
///
/// Logs always go to stderr: stdout carries the inventory document and must stay parseable.
/// `RUST_LOG` takes precedence over `directive` so a user can still narrow or widen the
/// output without touching the command line, e.g. `RUST_LOG=hmc_inventory::adapters=trace`.
pub fn init_tracing(directive: &str) {
    let filter = match env::var("RUST_LOG") {
        Ok(value) if !value.trim().is_empty() => EnvFilter::new(value),
        _ => EnvFilter::new(directive),
    };

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(filter);

    // A second initialization (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::registry().with(layer).try_init();
}

/// Picks the log directive for the given verbosity flag
pub fn directive_for(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_LOG_DIRECTIVE
    } else {
        DEFAULT_LOG_DIRECTIVE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_for() {
        assert_eq!(directive_for(false), "warn");
        assert_eq!(directive_for(true), "warn,hmc_inventory=debug");
    }

    #[test]
    fn test_init_tracing_twice_does_not_panic() {
        init_tracing(DEFAULT_LOG_DIRECTIVE);
        init_tracing(VERBOSE_LOG_DIRECTIVE);
    }
}
