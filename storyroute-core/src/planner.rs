//! Plan a trip end to end.
//!
//! [`TripPlanner`] validates a [`PlanRequest`], resolves its points, orders
//! them, fetches one leg per hop and groups the visited points into stages.

use geo::Coord;
use log::{info, warn};

use crate::error::{PlanError, ValidationError};
use crate::plan::{PlanOutcome, TripPlan, merge_story_points};
use crate::{
    LegProvider, PointResolver, Resolution, Strategy, TransportMode, aggregate_trip, group_stages,
    sequence,
};

/// Input for one planning request.
///
/// When deserialised, `transport_mode` and `strategy` accept any string and
/// fall back to their defaults for unrecognised or missing values.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use storyroute_core::{PlanRequest, TransportMode};
///
/// let request = PlanRequest::new(vec![1, 2], Coord { x: 121.47, y: 31.23 })
///     .with_transport_mode(TransportMode::Walking);
/// assert!(request.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanRequest {
    /// Points to visit.
    pub point_ids: Vec<u64>,
    /// Trip origin.
    pub start: Coord<f64>,
    /// Optional trip destination.
    #[cfg_attr(feature = "serde", serde(default))]
    pub end: Option<Coord<f64>>,
    /// Mode used for every leg.
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "lenient::transport_mode")
    )]
    pub transport_mode: TransportMode,
    /// Ordering applied to the resolved points.
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "lenient::strategy"))]
    pub strategy: Strategy,
}

impl PlanRequest {
    /// Request a chronological driving trip from `start` through `point_ids`.
    pub fn new(point_ids: Vec<u64>, start: Coord<f64>) -> Self {
        Self {
            point_ids,
            start,
            end: None,
            transport_mode: TransportMode::default(),
            strategy: Strategy::default(),
        }
    }

    /// Finish the trip at `end`.
    #[must_use]
    pub fn with_end(mut self, end: Coord<f64>) -> Self {
        self.end = Some(end);
        self
    }

    /// Request legs for `mode`.
    #[must_use]
    pub fn with_transport_mode(mut self, mode: TransportMode) -> Self {
        self.transport_mode = mode;
        self
    }

    /// Order points with `strategy`.
    #[must_use]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Check the request before anything is looked up.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.point_ids.is_empty() {
            return Err(ValidationError::EmptyPointIds);
        }
        check_location("start", self.start)?;
        if let Some(end) = self.end {
            check_location("end", end)?;
        }
        Ok(())
    }
}

fn check_location(field: &'static str, location: Coord<f64>) -> Result<(), ValidationError> {
    let valid = (-180.0..=180.0).contains(&location.x) && (-90.0..=90.0).contains(&location.y);
    if valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidLocation {
            field,
            longitude: location.x,
            latitude: location.y,
        })
    }
}

#[cfg(feature = "serde")]
mod lenient {
    use serde::{Deserialize, Deserializer};

    use crate::{Strategy, TransportMode};

    pub(super) fn transport_mode<'de, D>(deserializer: D) -> Result<TransportMode, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(TransportMode::parse).unwrap_or_default())
    }

    pub(super) fn strategy<'de, D>(deserializer: D) -> Result<Strategy, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Strategy::parse).unwrap_or_default())
    }
}

/// Orchestrates resolution, sequencing, leg aggregation and grouping.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use storyroute_core::{PlanRequest, StaticPointTable, TripPlanner};
/// use storyroute_core::test_support::UnitLegProvider;
///
/// let planner = TripPlanner::new(StaticPointTable::builtin(), UnitLegProvider);
/// let request = PlanRequest::new(vec![4, 1, 2], Coord { x: 121.47, y: 31.23 });
/// let outcome = planner.plan(&request)?;
/// let order: Vec<_> = outcome.points.iter().map(|p| p.id).collect();
/// assert_eq!(order, vec![1, 2, 4]);
/// assert_eq!(outcome.plan.stages.len(), 2);
/// # Ok::<(), storyroute_core::PlanError>(())
/// ```
#[derive(Debug)]
pub struct TripPlanner<R, P> {
    resolver: R,
    provider: P,
    strict_resolution: bool,
}

impl<R, P> TripPlanner<R, P>
where
    R: PointResolver,
    P: LegProvider,
{
    /// Create a planner that drops unresolved points with a warning.
    pub const fn new(resolver: R, provider: P) -> Self {
        Self {
            resolver,
            provider,
            strict_resolution: false,
        }
    }

    /// Fail with [`PlanError::NotFound`] when any requested point is
    /// missing, instead of planning around it.
    #[must_use]
    pub fn with_strict_resolution(mut self, strict: bool) -> Self {
        self.strict_resolution = strict;
        self
    }

    /// Borrow the point resolver.
    pub const fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Borrow the leg provider.
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Plan the trip described by `request`.
    ///
    /// Validation runs before any lookup, so invalid requests never reach
    /// the routing provider. The first failing leg aborts the plan.
    pub fn plan(&self, request: &PlanRequest) -> Result<PlanOutcome, PlanError> {
        request.validate()?;

        let Resolution { points, unresolved } = self.resolver.resolve(&request.point_ids)?;
        if points.is_empty() {
            return Err(PlanError::NotFound { ids: unresolved });
        }
        if !unresolved.is_empty() {
            if self.strict_resolution {
                return Err(PlanError::NotFound { ids: unresolved });
            }
            warn!("planning without unresolved points {unresolved:?}");
        }

        let points = sequence(points, request.strategy);
        let itinerary = aggregate_trip(
            &self.provider,
            request.start,
            request.end,
            &points,
            request.transport_mode,
        )?;
        let plan = TripPlan {
            total_distance_m: itinerary.total_distance_m,
            total_duration: itinerary.total_duration,
            mode: request.transport_mode,
            story_points: merge_story_points(&points),
            stages: group_stages(&points),
            legs: itinerary.legs,
            geometry: itinerary.geometry,
            start: request.start,
            end: request.end,
        };
        info!(
            "planned {} trip through {} points in {} stages: {:.0} m, {}s",
            plan.mode,
            points.len(),
            plan.stages.len(),
            plan.total_distance_m,
            plan.total_duration.as_secs()
        );
        Ok(PlanOutcome {
            plan,
            points,
            unresolved,
        })
    }
}
