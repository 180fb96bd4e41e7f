//! Command-line interface for planning storyroute trips.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod plan;

pub use error::CliError;
use plan::{PlanArgs, run_plan};

const ARG_PLAN_REQUEST: &str = "request";
const ARG_PLAN_DATABASE: &str = "database";
const ARG_PLAN_AMAP_KEY: &str = "amap-key";
const ARG_PLAN_AMAP_BASE_URL: &str = "amap-base-url";
const ARG_PLAN_TIMEOUT_SECS: &str = "timeout-secs";
const ARG_PLAN_TRANSIT_CITY: &str = "transit-city";
const ARG_PLAN_TRANSIT_STRATEGY: &str = "transit-strategy";
const ARG_PLAN_STRICT: &str = "strict";
const ENV_PLAN_REQUEST: &str = "STORYROUTE_CMDS_PLAN_REQUEST_PATH";
const ENV_PLAN_AMAP_KEY: &str = "STORYROUTE_CMDS_PLAN_AMAP_KEY";

/// Run the storyroute CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns an error when arguments or configuration are invalid, the request
/// cannot be read, planning fails, or the output cannot be written.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Plan(args) => run_plan(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "storyroute",
    about = "Plan multi-stop sightseeing trips narrated by historical period",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Plan a trip from a JSON request and print the plan as JSON.
    Plan(PlanArgs),
}

#[cfg(test)]
mod tests;
