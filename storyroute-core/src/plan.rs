//! Assembled trip plans.

use std::collections::HashSet;
use std::time::Duration;

use geo::Coord;

use crate::geometry::{basic_path, decode_path};
use crate::{Point, Stage, TransportMode, TripLeg};

/// Read-only result of one planning request.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TripPlan {
    /// Sum of leg distances in meters.
    pub total_distance_m: f64,
    /// Sum of leg durations.
    pub total_duration: Duration,
    /// Mode every leg was requested with.
    pub mode: TransportMode,
    /// Story points of all visited points, first occurrence kept.
    pub story_points: Vec<String>,
    /// Visited points grouped by period.
    pub stages: Vec<Stage>,
    /// Legs in visiting order.
    pub legs: Vec<TripLeg>,
    /// Leg geometries joined in visiting order.
    pub geometry: String,
    /// Trip origin.
    pub start: Coord<f64>,
    /// Trip destination, when one was requested.
    pub end: Option<Coord<f64>>,
}

impl TripPlan {
    /// Coordinates to draw for the trip.
    ///
    /// Decodes [`TripPlan::geometry`]. When it yields nothing, as with
    /// transit legs, the path falls back to straight hops from the start
    /// through `points` to the end.
    pub fn path(&self, points: &[Point]) -> Vec<Coord<f64>> {
        let decoded = decode_path(&self.geometry);
        if decoded.is_empty() {
            basic_path(self.start, points.iter().map(|p| p.location), self.end)
        } else {
            decoded
        }
    }
}

/// Everything a caller needs to present a plan.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanOutcome {
    /// The assembled plan.
    pub plan: TripPlan,
    /// Resolved points in visiting order.
    pub points: Vec<Point>,
    /// Requested identifiers that resolved nowhere, in request order.
    pub unresolved: Vec<u64>,
}

impl PlanOutcome {
    /// Coordinates to draw for the trip; see [`TripPlan::path`].
    pub fn path(&self) -> Vec<Coord<f64>> {
        self.plan.path(&self.points)
    }
}

/// Concatenate story points across `points`, keeping the first occurrence
/// of each label.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use storyroute_core::{merge_story_points, Point};
///
/// let at = Coord { x: 0.0, y: 0.0 };
/// let points = vec![
///     Point::new(1, "a", at).with_story_points(["red boat", "oath"]),
///     Point::new(2, "b", at).with_story_points(["oath", "base area"]),
/// ];
/// assert_eq!(merge_story_points(&points), vec!["red boat", "oath", "base area"]);
/// ```
pub fn merge_story_points(points: &[Point]) -> Vec<String> {
    let mut seen = HashSet::new();
    points
        .iter()
        .flat_map(|point| point.story_points.iter())
        .filter(|label| seen.insert(label.as_str()))
        .cloned()
        .collect()
}
