//! Error types emitted by the storyroute CLI.
//!
//! Keep this error type reasonably small, as CLI helpers return
//! `Result<_, CliError>` throughout.

use std::sync::Arc;

use camino::Utf8PathBuf;
use storyroute_core::{PlanError, ValidationError};
use storyroute_data::routing::ProviderBuildError;
use thiserror::Error;

/// Errors emitted by the storyroute CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// Opening the plan request file failed.
    #[error("failed to open plan request at {path:?}: {source}")]
    OpenPlanRequest {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Plan request JSON could not be decoded.
    #[error("failed to parse plan request JSON at {path:?}: {source}")]
    ParsePlanRequest {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The plan request payload failed validation.
    #[error("plan request in {path:?} failed validation: {source}")]
    InvalidPlanRequest {
        path: Utf8PathBuf,
        #[source]
        source: ValidationError,
    },
    /// Constructing the leg provider failed.
    #[error("failed to build AMap leg provider for {base_url:?}: {source}")]
    BuildLegProvider {
        base_url: String,
        #[source]
        source: ProviderBuildError,
    },
    /// The planner rejected the request or a leg failed.
    #[error("planning failed: {source}")]
    Plan {
        #[source]
        source: PlanError,
    },
    /// Serializing the plan failed.
    #[error("failed to serialize plan: {0}")]
    SerializePlan(#[source] serde_json::Error),
    /// Writing the plan output failed.
    #[error("failed to write plan output: {0}")]
    WritePlanOutput(#[source] std::io::Error),
}
