//! Core domain types and planning engine for storyroute.
//!
//! A trip starts at a fixed location, visits a set of points of interest and
//! optionally finishes at a fixed end. The crate resolves point identifiers,
//! orders the points, fetches one leg per hop from a [`LegProvider`] and
//! groups the visited points into narrative stages by historical period.
//! [`TripPlanner`] runs those steps for one [`PlanRequest`].
//!
//! The routing provider and point store are traits so hosts can plug in HTTP
//! clients, databases or test doubles.

mod aggregator;
mod error;
pub mod geometry;
mod leg;
mod mode;
mod plan;
mod planner;
mod point;
mod resolver;
mod routing;
mod sequencer;
mod stages;
pub mod store;

#[doc(hidden)]
pub mod test_support;

pub use aggregator::{Itinerary, aggregate_trip};
pub use error::{PlanError, ValidationError};
pub use leg::{Leg, Step, TripLeg, Waypoint};
pub use mode::{Strategy, TransportMode};
pub use plan::{PlanOutcome, TripPlan, merge_story_points};
pub use planner::{PlanRequest, TripPlanner};
pub use point::{Point, UNKNOWN_START_YEAR};
pub use resolver::{FallbackResolver, PointResolver, Resolution, ResolveError, StaticPointTable};
pub use routing::{LegProvider, RoutingError};
pub use sequencer::sequence;
pub use stages::{Stage, StageStop, YearRange, group_stages};
#[cfg(feature = "store-sqlite")]
pub use store::{SqlitePointStore, SqlitePointStoreError};
