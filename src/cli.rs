use clap::Parser;
use std::path::PathBuf;

use crate::application::dto::OutputFormat;

/// Build an Ansible dynamic inventory from IBM Power HMCs
#[derive(Parser, Debug)]
#[command(name = "hmc-inventory")]
#[command(version)]
#[command(
    about = "Build an Ansible dynamic inventory from one or more IBM Power HMCs",
    long_about = None
)]
pub struct Args {
    /// Config file path (defaults to ./hmc-inventory.config.yml when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format: json or yaml
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Group hosts by a partition tag (e.g. SystemName, AssociatedGroups).
    /// Can be specified multiple times; replaces the config file's group_by
    #[arg(short, long = "group-by", value_name = "KEY")]
    pub group_by: Vec<String>,

    /// Bind a host template variable. Comma-separated values become a list.
    /// Can be specified multiple times: --var site=lab --var rack=1,2
    #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_var)]
    pub vars: Vec<(String, Vec<String>)>,

    /// Number of HMCs queried at the same time
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub concurrency: Option<u64>,

    /// Per-HMC timeout in seconds, covering logon, queries and logoff
    #[arg(long, value_name = "SECONDS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Print the whole inventory (default)
    #[arg(long, conflicts_with = "host")]
    pub list: bool,

    /// Print the variables of a single host
    #[arg(long, value_name = "NAME")]
    pub host: Option<String>,

    /// Include VIOS partitions
    #[arg(long)]
    pub include_vios: bool,

    /// Read recorded HMC answers from this directory instead of calling the REST API
    #[arg(long, value_name = "DIR")]
    pub fixture_dir: Option<PathBuf>,

    /// Exit with code 1 when any HMC could not be queried
    #[arg(long)]
    pub strict: bool,

    /// Enable debug logging for this tool (RUST_LOG overrides)
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print warnings and errors on stderr
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Parses `NAME=VALUE`; a comma-separated VALUE becomes a list
fn parse_var(raw: &str) -> Result<(String, Vec<String>), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("Invalid variable '{}'. Expected NAME=VALUE", raw))?;
    let name = name.trim();
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!(
            "Invalid variable name '{}'. Use letters, digits and underscores",
            name
        ));
    }
    let values: Vec<String> = value
        .split(',')
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect();
    if values.is_empty() {
        return Err(format!("Variable '{}' has no value", name));
    }
    Ok((name.to_string(), values))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_var_scalar_and_list() {
        assert_eq!(
            parse_var("site=lab").unwrap(),
            ("site".to_string(), vec!["lab".to_string()])
        );
        assert_eq!(
            parse_var("rack=1, 2,3").unwrap(),
            (
                "rack".to_string(),
                vec!["1".to_string(), "2".to_string(), "3".to_string()]
            )
        );
    }

    #[test]
    fn test_parse_var_invalid() {
        assert!(parse_var("site").is_err());
        assert!(parse_var("=lab").is_err());
        assert!(parse_var("si te=lab").is_err());
        assert!(parse_var("site=").is_err());
        assert!(parse_var("site=,").is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "hmc-inventory",
            "--format",
            "yaml",
            "-g",
            "SystemName",
            "--group-by",
            "groups",
            "--var",
            "site=lab,prod",
            "--concurrency",
            "2",
            "--host",
            "aix01",
            "--strict",
        ])
        .unwrap();

        assert_eq!(args.format, Some(OutputFormat::Yaml));
        assert_eq!(args.group_by, vec!["SystemName", "groups"]);
        assert_eq!(args.vars[0].1, vec!["lab", "prod"]);
        assert_eq!(args.concurrency, Some(2));
        assert_eq!(args.host.as_deref(), Some("aix01"));
        assert!(args.strict);
    }

    #[test]
    fn test_list_conflicts_with_host() {
        assert!(Args::try_parse_from(["hmc-inventory", "--list", "--host", "a"]).is_err());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        assert!(Args::try_parse_from(["hmc-inventory", "--concurrency", "0"]).is_err());
    }

    #[test]
    fn test_invalid_format_rejected() {
        assert!(Args::try_parse_from(["hmc-inventory", "--format", "markdown"]).is_err());
    }
}
