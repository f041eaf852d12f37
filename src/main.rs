use hmc_inventory::adapters::outbound::console::StderrProgressReporter;
use hmc_inventory::adapters::outbound::filesystem::FixtureConnector;
use hmc_inventory::adapters::outbound::network::{HmcRestConnector, RestSettings};
use hmc_inventory::application::dto::{
    InventoryRequest, InventoryResponse, OutputFormat, DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT,
};
use hmc_inventory::application::factories::{FormatterFactory, PresenterFactory, PresenterType};
use hmc_inventory::application::use_cases::BuildInventoryUseCase;
use hmc_inventory::cli::Args;
use hmc_inventory::config::{discover_config, load_config_from_path, ConfigFile, Transport};
use hmc_inventory::inventory::domain::{GroupSpec, HmcEndpoint, TagKey};
use hmc_inventory::inventory::services::resolve_hosts;
use hmc_inventory::ports::outbound::{HmcConnector, ProgressReporter};
use hmc_inventory::shared::error::{ConfigError, ExitCode};
use hmc_inventory::shared::logging::{directive_for, init_tracing};
use hmc_inventory::shared::Result;
use std::path::PathBuf;
use std::process;
use std::str::FromStr;
use std::time::Duration;

#[tokio::main]
async fn main() {
    let args = Args::parse_args();
    init_tracing(directive_for(args.verbose));

    match run(args).await {
        Ok(exit_code) => process::exit(exit_code.as_i32()),
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            // Display error chain
            for cause in e.chain().skip(1) {
                eprintln!("\nCaused by: {}", cause);
            }

            eprintln!();
            process::exit(ExitCode::ApplicationError.as_i32());
        }
    }
}

/// Where partitions are read from, with everything the adapter needs
enum Source {
    Rest(RestSettings),
    Fixture(PathBuf),
}

async fn run(args: Args) -> Result<ExitCode> {
    let config = load_config(&args)?;

    // Endpoints are fully resolved before any network activity
    let mut variables = config.variables()?;
    for (name, values) in &args.vars {
        variables.insert(name.clone(), values.clone());
    }
    let endpoints = resolve_hosts(
        &config.host_specs(),
        &config.host_defaults(),
        &variables,
        |name| std::env::var(name).ok(),
    )?;
    tracing::debug!(endpoints = endpoints.len(), "resolved HMC endpoints");

    let format = output_format(&args, &config)?;
    let source = source(&args, &config)?;
    let request = build_request(&args, &config, endpoints)?;

    let progress_reporter = if args.quiet {
        StderrProgressReporter::quiet()
    } else {
        StderrProgressReporter::new()
    };

    let response = match source {
        Source::Rest(settings) => {
            collect(HmcRestConnector::new(settings)?, progress_reporter, request).await?
        }
        Source::Fixture(dir) => {
            collect(FixtureConnector::new(dir), progress_reporter, request).await?
        }
    };

    let formatter = FormatterFactory::create(format);
    let output = match &args.host {
        Some(host) => formatter.format_host(&response.inventory, host)?,
        None => {
            if !args.quiet {
                eprintln!("{}", FormatterFactory::progress_message(format));
            }
            formatter.format(&response.inventory)?
        }
    };

    let presenter = PresenterFactory::create(PresenterType::from_output(args.output.clone()));
    presenter.present(&output)?;

    if args.strict && response.is_partial() {
        Ok(ExitCode::PartialInventory)
    } else {
        Ok(ExitCode::Success)
    }
}

fn load_config(args: &Args) -> Result<ConfigFile> {
    match &args.config {
        Some(path) => load_config_from_path(path),
        None => {
            let cwd = std::env::current_dir()?;
            Ok(discover_config(&cwd)?.unwrap_or_default())
        }
    }
}

async fn collect<C, PR>(
    connector: C,
    progress_reporter: PR,
    request: InventoryRequest,
) -> Result<InventoryResponse>
where
    C: HmcConnector,
    PR: ProgressReporter,
{
    BuildInventoryUseCase::new(connector, progress_reporter)
        .execute(request)
        .await
}

fn output_format(args: &Args, config: &ConfigFile) -> Result<OutputFormat> {
    if let Some(format) = args.format {
        return Ok(format);
    }
    match config.format.as_deref() {
        Some(raw) => OutputFormat::from_str(raw).map_err(|reason| {
            ConfigError::InvalidValue {
                field: "format".to_string(),
                reason,
            }
            .into()
        }),
        None => Ok(OutputFormat::default()),
    }
}

fn timeout(args: &Args, config: &ConfigFile) -> Duration {
    args.timeout
        .or(config.timeout_secs)
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_TIMEOUT)
}

fn source(args: &Args, config: &ConfigFile) -> Result<Source> {
    if let Some(dir) = &args.fixture_dir {
        return Ok(Source::Fixture(dir.clone()));
    }
    match config.transport()? {
        Transport::Fixture => {
            let dir = config
                .fixture_dir
                .clone()
                .ok_or_else(|| ConfigError::InvalidValue {
                    field: "fixture_dir".to_string(),
                    reason: "required when transport is 'fixture'".to_string(),
                })?;
            Ok(Source::Fixture(dir))
        }
        Transport::Rest => {
            let defaults = RestSettings::default();
            Ok(Source::Rest(RestSettings {
                port: config.rest_port.unwrap_or(defaults.port),
                validate_certs: config.validate_certs.unwrap_or(defaults.validate_certs),
                request_timeout: timeout(args, config),
                ..defaults
            }))
        }
    }
}

fn build_request(
    args: &Args,
    config: &ConfigFile,
    endpoints: Vec<HmcEndpoint>,
) -> Result<InventoryRequest> {
    let group_specs = if args.group_by.is_empty() {
        config.group_specs()?
    } else {
        args.group_by
            .iter()
            .map(|raw| {
                TagKey::from_str(raw)
                    .map(GroupSpec::new)
                    .map_err(|reason| ConfigError::InvalidValue {
                        field: "--group-by".to_string(),
                        reason,
                    })
            })
            .collect::<std::result::Result<Vec<_>, _>>()?
    };

    let concurrency = args
        .concurrency
        .map(|c| c as usize)
        .or(config.concurrency)
        .unwrap_or(DEFAULT_CONCURRENCY);

    Ok(InventoryRequest::new(endpoints)
        .with_group_specs(group_specs)
        .with_host_naming(config.naming()?)
        .with_include_vios(args.include_vios || config.include_vios.unwrap_or(false))
        .with_filters(config.tag_filters()?)
        .with_exclusions(
            config.exclude_partitions.clone().unwrap_or_default(),
            config.exclude_systems.clone().unwrap_or_default(),
        )
        .with_concurrency(concurrency)
        .with_timeout(timeout(args, config)))
}
