//! Test helpers for composing plan requests and CLI invocations.

use camino::{Utf8Path, Utf8PathBuf};
use geo::Coord;
use std::fs;
use std::time::Duration;
use storyroute_core::{
    Leg, LegProvider, PlanRequest, PointResolver, RoutingError, StaticPointTable, TripPlanner,
};
use storyroute_data::routing::test_support::StubLegProvider;
use tempfile::TempDir;

use super::*;
use crate::plan::{PlanConfig, Planner, PlannerBuilder};

pub(super) const TEST_KEY: &str = "test-key";

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path, contents).unwrap_or_else(|err| panic!("failed to write {path}: {err}"));
}

pub(super) fn utf8_tempdir() -> (TempDir, Utf8PathBuf) {
    let tmp = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
    (tmp, root)
}

pub(super) fn sample_request() -> PlanRequest {
    PlanRequest::new(vec![4, 1, 3], Coord { x: 121.4737, y: 31.2304 })
}

/// Builds planners over the built-in table and a stub provider.
#[derive(Debug, Clone)]
pub(super) struct StubPlannerBuilder {
    provider: StubLegProvider,
}

impl StubPlannerBuilder {
    /// Every leg covers one kilometre in two minutes.
    pub(super) fn succeeding() -> Self {
        Self {
            provider: StubLegProvider::with_leg(Leg::new(
                1000.0,
                Duration::from_secs(120),
                "121.47,31.23;121.48,31.22",
            )),
        }
    }

    /// Every leg is refused as if the API key were invalid.
    pub(super) fn rejecting() -> Self {
        Self {
            provider: StubLegProvider::with_error(RoutingError::ServiceError {
                code: "10001".to_owned(),
                info: "INVALID_USER_KEY".to_owned(),
            }),
        }
    }
}

impl PlannerBuilder for StubPlannerBuilder {
    fn build(&self, config: &PlanConfig) -> Result<Planner, CliError> {
        let resolver: Box<dyn PointResolver> = Box::new(StaticPointTable::builtin());
        let provider: Box<dyn LegProvider> = Box::new(self.provider.clone());
        Ok(TripPlanner::new(resolver, provider).with_strict_resolution(config.strict))
    }
}
