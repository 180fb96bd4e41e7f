//! Facade crate for the storyroute trip planner.
//!
//! This crate re-exports the core domain types and exposes the optional AMap
//! leg provider and SQLite point store behind feature flags.

#![forbid(unsafe_code)]

pub use storyroute_core::{
    FallbackResolver, Itinerary, Leg, LegProvider, PlanError, PlanOutcome, PlanRequest, Point,
    PointResolver, Resolution, ResolveError, RoutingError, Stage, StageStop, StaticPointTable,
    Step, Strategy, TransportMode, TripLeg, TripPlan, TripPlanner, UNKNOWN_START_YEAR,
    ValidationError, Waypoint, YearRange, aggregate_trip, group_stages, merge_story_points,
    sequence,
};

#[cfg(feature = "store-sqlite")]
pub use storyroute_core::{SqlitePointStore, SqlitePointStoreError};

#[cfg(feature = "provider-amap")]
pub use storyroute_data::routing::{AmapConfig, AmapLegProvider, ProviderBuildError};
