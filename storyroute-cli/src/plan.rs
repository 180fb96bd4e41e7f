//! Plan command implementation for the storyroute CLI.

use std::io::{BufReader, Write};
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use storyroute_core::{LegProvider, PlanOutcome, PlanRequest, PointResolver, TripPlanner};
use storyroute_data::routing::{
    AmapConfig, AmapLegProvider, DEFAULT_BASE_URL, DEFAULT_TRANSIT_CITY, DEFAULT_TRANSIT_STRATEGY,
};

use crate::{
    ARG_PLAN_AMAP_BASE_URL, ARG_PLAN_AMAP_KEY, ARG_PLAN_DATABASE, ARG_PLAN_REQUEST,
    ARG_PLAN_STRICT, ARG_PLAN_TIMEOUT_SECS, ARG_PLAN_TRANSIT_CITY, ARG_PLAN_TRANSIT_STRATEGY,
    CliError, ENV_PLAN_AMAP_KEY, ENV_PLAN_REQUEST,
};

/// Point database used when none is configured.
pub(crate) const DEFAULT_DATABASE: &str = "red_tourism.db";

/// CLI arguments for the `plan` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Plan a trip through the requested points of interest. \
                 Points are read from the SQLite point database, falling \
                 back to the built-in table when it cannot be opened, and \
                 each leg is routed through the AMap direction API. The \
                 request itself is provided as a JSON-encoded PlanRequest.",
    about = "Plan a multi-stop trip"
)]
#[ortho_config(prefix = "STORYROUTE")]
pub(crate) struct PlanArgs {
    /// Path to a JSON file containing a PlanRequest.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Path to the SQLite point database.
    #[arg(long = ARG_PLAN_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// AMap web service key.
    #[arg(long = ARG_PLAN_AMAP_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) amap_key: Option<String>,
    /// Base URL for the AMap service (e.g. "https://restapi.amap.com").
    #[arg(long = ARG_PLAN_AMAP_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) amap_base_url: Option<String>,
    /// Per-request timeout in seconds.
    #[arg(long = ARG_PLAN_TIMEOUT_SECS, value_name = "seconds")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// City code searched by transit legs.
    #[arg(long = ARG_PLAN_TRANSIT_CITY, value_name = "code")]
    #[serde(default)]
    pub(crate) transit_city: Option<String>,
    /// AMap transit strategy code (e.g. "0" for the fastest itinerary).
    #[arg(long = ARG_PLAN_TRANSIT_STRATEGY, value_name = "code")]
    #[serde(default)]
    pub(crate) transit_strategy: Option<String>,
    /// Fail when any requested point cannot be resolved.
    #[arg(long = ARG_PLAN_STRICT)]
    #[serde(default)]
    pub(crate) strict: bool,
}

impl PlanArgs {
    pub(crate) fn into_config(self) -> Result<PlanConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        PlanConfig::try_from(merged)
    }
}

/// Resolved `plan` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PlanConfig {
    /// Path to the JSON request file.
    pub(crate) request_path: Utf8PathBuf,
    /// Path to the SQLite point database.
    pub(crate) database: Utf8PathBuf,
    /// AMap web service key.
    pub(crate) amap_key: String,
    /// Base URL for the AMap service.
    pub(crate) amap_base_url: String,
    /// Per-request timeout.
    pub(crate) timeout: Duration,
    /// City code searched by transit legs.
    pub(crate) transit_city: String,
    /// AMap transit strategy code.
    pub(crate) transit_strategy: String,
    /// Whether unresolved points abort the plan.
    pub(crate) strict: bool,
}

impl PlanConfig {
    /// Provider configuration derived from the command options.
    pub(crate) fn amap_config(&self) -> AmapConfig {
        AmapConfig::new(self.amap_key.clone())
            .with_base_url(self.amap_base_url.clone())
            .with_timeout(self.timeout)
            .with_transit_city(self.transit_city.clone())
            .with_transit_strategy(self.transit_strategy.clone())
    }
}

impl TryFrom<PlanArgs> for PlanConfig {
    type Error = CliError;

    fn try_from(args: PlanArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_PLAN_REQUEST,
            env: ENV_PLAN_REQUEST,
        })?;
        let amap_key = args
            .amap_key
            .filter(|key| !key.trim().is_empty())
            .ok_or(CliError::MissingArgument {
                field: ARG_PLAN_AMAP_KEY,
                env: ENV_PLAN_AMAP_KEY,
            })?;

        let defaults = AmapConfig::default();
        Ok(Self {
            request_path,
            database: args
                .database
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE)),
            amap_key,
            amap_base_url: args
                .amap_base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
            timeout: args
                .timeout_secs
                .map_or(defaults.timeout, Duration::from_secs),
            transit_city: args
                .transit_city
                .unwrap_or_else(|| DEFAULT_TRANSIT_CITY.to_owned()),
            transit_strategy: args
                .transit_strategy
                .unwrap_or_else(|| DEFAULT_TRANSIT_STRATEGY.to_owned()),
            strict: args.strict,
        })
    }
}

/// Planner assembled for one `plan` invocation.
pub(crate) type Planner = TripPlanner<Box<dyn PointResolver>, Box<dyn LegProvider>>;

/// Builds a planner for the current plan invocation.
pub(crate) trait PlannerBuilder {
    fn build(&self, config: &PlanConfig) -> Result<Planner, CliError>;
}

pub(crate) struct DefaultPlannerBuilder;

impl PlannerBuilder for DefaultPlannerBuilder {
    fn build(&self, config: &PlanConfig) -> Result<Planner, CliError> {
        let provider = AmapLegProvider::with_config(config.amap_config()).map_err(|source| {
            CliError::BuildLegProvider {
                base_url: config.amap_base_url.clone(),
                source,
            }
        })?;
        let provider: Box<dyn LegProvider> = Box::new(provider);
        Ok(TripPlanner::new(open_resolver(&config.database), provider)
            .with_strict_resolution(config.strict))
    }
}

#[cfg(feature = "store-sqlite")]
fn open_resolver(database: &Utf8Path) -> Box<dyn PointResolver> {
    use storyroute_core::{FallbackResolver, SqlitePointStore};

    let store = match SqlitePointStore::open(database.as_std_path()) {
        Ok(store) => Some(store),
        Err(err) => {
            log::warn!("{err}; using the built-in point table");
            None
        }
    };
    Box::new(FallbackResolver::new(store))
}

#[cfg(not(feature = "store-sqlite"))]
fn open_resolver(database: &Utf8Path) -> Box<dyn PointResolver> {
    log::warn!("built without SQLite support; ignoring {database} and using the built-in point table");
    Box::new(storyroute_core::StaticPointTable::builtin())
}

pub(crate) fn run_plan(args: PlanArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_plan_with(args, &DefaultPlannerBuilder, &mut stdout)
}

pub(crate) fn run_plan_with(
    args: PlanArgs,
    builder: &dyn PlannerBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let outcome = execute_plan(&config, builder)?;
    write_plan_outcome(writer, &outcome)
}

fn execute_plan(
    config: &PlanConfig,
    builder: &dyn PlannerBuilder,
) -> Result<PlanOutcome, CliError> {
    let request = load_plan_request(&config.request_path)?;
    request
        .validate()
        .map_err(|source| CliError::InvalidPlanRequest {
            path: config.request_path.clone(),
            source,
        })?;
    let planner = builder.build(config)?;
    let outcome = planner
        .plan(&request)
        .map_err(|source| CliError::Plan { source })?;
    info!(
        "planned {} stops from {}",
        outcome.points.len(),
        config.request_path
    );
    Ok(outcome)
}

/// Loads a JSON-encoded [`PlanRequest`] from disk.
pub(crate) fn load_plan_request(path: &Utf8Path) -> Result<PlanRequest, CliError> {
    let file = fs_utf8::File::open_ambient(path, ambient_authority()).map_err(|source| {
        CliError::OpenPlanRequest {
            path: path.to_path_buf(),
            source,
        }
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| CliError::ParsePlanRequest {
        path: path.to_path_buf(),
        source,
    })
}

fn write_plan_outcome(writer: &mut dyn Write, outcome: &PlanOutcome) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(outcome).map_err(CliError::SerializePlan)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WritePlanOutput)?;
    writer
        .write_all(b"\n")
        .map_err(CliError::WritePlanOutput)?;
    Ok(())
}
