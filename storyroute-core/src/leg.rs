//! Provider-computed legs and their turn-by-turn steps.

use std::time::Duration;

/// One instruction within a leg.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step {
    /// Human-readable instruction text.
    pub instruction: String,
    /// Road or line name, empty when unknown.
    pub road: String,
    /// Step length in meters.
    pub distance_m: f64,
    /// Step travel time.
    pub duration: Duration,
    /// Encoded geometry fragment, empty when unavailable.
    pub geometry: String,
}

/// A single path between two consecutive locations.
///
/// Distances are meters and durations are non-negative. Geometry is opaque
/// to the core and may be empty.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use storyroute_core::Leg;
///
/// let leg = Leg::new(1200.0, Duration::from_secs(300), "121.47,31.22;121.48,31.23");
/// assert!(leg.steps.is_empty());
/// assert!(leg.has_geometry());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Leg {
    /// Leg length in meters.
    pub distance_m: f64,
    /// Leg travel time.
    pub duration: Duration,
    /// Encoded path geometry.
    pub geometry: String,
    /// Ordered turn-by-turn steps.
    pub steps: Vec<Step>,
}

impl Leg {
    /// Construct a leg without steps.
    pub fn new(distance_m: f64, duration: Duration, geometry: impl Into<String>) -> Self {
        Self {
            distance_m,
            duration,
            geometry: geometry.into(),
            steps: Vec::new(),
        }
    }

    /// Attach turn-by-turn steps.
    #[must_use]
    pub fn with_steps(mut self, steps: Vec<Step>) -> Self {
        self.steps = steps;
        self
    }

    /// Whether the leg carries a non-blank geometry.
    pub fn has_geometry(&self) -> bool {
        !self.geometry.trim().is_empty()
    }
}

/// Endpoint of a leg within a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", content = "id", rename_all = "snake_case"))]
pub enum Waypoint {
    /// The fixed start location.
    Start,
    /// A visited point, by identifier.
    Point(u64),
    /// The fixed end location.
    End,
}

/// A leg annotated with the waypoints it connects.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TripLeg {
    /// Where the leg departs.
    pub from: Waypoint,
    /// Where the leg arrives.
    pub to: Waypoint,
    /// Provider result for the leg.
    pub leg: Leg,
}
