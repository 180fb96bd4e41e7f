//! Per-mode request and response handling.
//!
//! Every transport mode maps to one [`ModeProfile`], which names the AMap
//! endpoint, adds any mode-specific query parameters and turns the route
//! envelope into a [`Leg`]. Supporting a new mode means adding a profile and
//! a row in [`profile_for`].

use std::time::Duration;

use storyroute_core::geometry::TRANSIT_GEOMETRY;
use storyroute_core::{Leg, RoutingError, Step, TransportMode};

use super::amap::{RouteEnvelope, StepOption};
use super::provider::AmapConfig;

/// Instruction text of the synthetic step emitted for each ride.
pub const TRANSIT_STEP_INSTRUCTION: &str = "乘坐公交";

/// Road label of the synthetic step emitted for each ride.
pub const TRANSIT_STEP_ROAD: &str = "公交线路";

/// Request and response handling for one transport mode.
pub(crate) trait ModeProfile: Sync {
    /// Path of the direction endpoint, relative to the base URL.
    fn endpoint(&self) -> &'static str;

    /// Extra query parameters beyond key, origin and destination.
    fn extra_params(&self, _config: &AmapConfig) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    /// Build a leg from a successful route envelope.
    fn extract(&self, route: RouteEnvelope, mode: TransportMode) -> Result<Leg, RoutingError>;
}

/// Driving and walking: the best path is copied verbatim.
struct DirectPath {
    endpoint: &'static str,
}

/// Transit: the best itinerary's walks and rides flattened into steps.
struct Transit;

static DRIVING: DirectPath = DirectPath {
    endpoint: "/v3/direction/driving",
};
static WALKING: DirectPath = DirectPath {
    endpoint: "/v3/direction/walking",
};
static TRANSIT: Transit = Transit;

/// Look up the profile serving `mode`.
pub(crate) fn profile_for(mode: TransportMode) -> &'static dyn ModeProfile {
    match mode {
        TransportMode::Driving => &DRIVING,
        TransportMode::Walking => &WALKING,
        TransportMode::Transit => &TRANSIT,
    }
}

fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or_default()
}

fn to_step(step: StepOption) -> Step {
    Step {
        instruction: step.instruction,
        road: step.road,
        distance_m: step.distance,
        duration: seconds(step.duration),
        geometry: step.polyline,
    }
}

impl ModeProfile for DirectPath {
    fn endpoint(&self) -> &'static str {
        self.endpoint
    }

    fn extract(&self, route: RouteEnvelope, mode: TransportMode) -> Result<Leg, RoutingError> {
        let path = route
            .paths
            .into_iter()
            .next()
            .ok_or(RoutingError::NoPath { mode })?;
        let steps = path.steps.into_iter().map(to_step).collect();
        Ok(Leg::new(path.distance, seconds(path.duration), path.polyline).with_steps(steps))
    }
}

impl ModeProfile for Transit {
    fn endpoint(&self) -> &'static str {
        "/v3/direction/transit/integrated"
    }

    fn extra_params(&self, config: &AmapConfig) -> Vec<(&'static str, String)> {
        vec![
            ("strategy", config.transit_strategy.clone()),
            ("city", config.transit_city.clone()),
        ]
    }

    fn extract(&self, route: RouteEnvelope, mode: TransportMode) -> Result<Leg, RoutingError> {
        let transit = route
            .transits
            .into_iter()
            .next()
            .ok_or(RoutingError::NoPath { mode })?;

        let mut steps = Vec::new();
        for segment in transit.segments {
            if let Some(walking) = segment.walking {
                steps.extend(walking.steps.into_iter().map(to_step));
            }
            if let Some((distance, duration)) = segment.bus.as_ref().and_then(|bus| bus.ride()) {
                steps.push(Step {
                    instruction: TRANSIT_STEP_INSTRUCTION.to_owned(),
                    road: TRANSIT_STEP_ROAD.to_owned(),
                    distance_m: distance,
                    duration: seconds(duration),
                    geometry: String::new(),
                });
            }
        }
        Ok(
            Leg::new(transit.distance, seconds(transit.duration), TRANSIT_GEOMETRY)
                .with_steps(steps),
        )
    }
}
