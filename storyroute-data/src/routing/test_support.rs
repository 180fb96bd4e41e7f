//! Test utilities for leg providers.
//!
//! This module provides [`StubLegProvider`], a deterministic test double for
//! [`LegProvider`] that returns a pre-configured response without making
//! HTTP requests.

use geo::Coord;
use storyroute_core::{Leg, LegProvider, RoutingError, TransportMode};

/// Stub `LegProvider` for testing.
///
/// Every call returns the same configured leg or error, regardless of the
/// coordinates and mode requested.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use geo::Coord;
/// use storyroute_core::{Leg, LegProvider, TransportMode};
/// use storyroute_data::routing::test_support::StubLegProvider;
///
/// let provider = StubLegProvider::with_leg(Leg::new(500.0, Duration::from_secs(300), ""));
/// let leg = provider.plan_leg(
///     Coord { x: 0.0, y: 0.0 },
///     Coord { x: 1.0, y: 1.0 },
///     TransportMode::Walking,
/// );
/// assert!(leg.is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct StubLegProvider {
    response: StubResponse,
}

#[derive(Debug, Clone)]
enum StubResponse {
    Leg(Leg),
    Error(RoutingError),
}

impl StubLegProvider {
    /// Create a provider that returns the given leg.
    #[must_use]
    pub fn with_leg(leg: Leg) -> Self {
        Self {
            response: StubResponse::Leg(leg),
        }
    }

    /// Create a provider that returns the given error.
    #[must_use]
    pub fn with_error(error: RoutingError) -> Self {
        Self {
            response: StubResponse::Error(error),
        }
    }
}

impl LegProvider for StubLegProvider {
    fn plan_leg(
        &self,
        _origin: Coord<f64>,
        _destination: Coord<f64>,
        _mode: TransportMode,
    ) -> Result<Leg, RoutingError> {
        match &self.response {
            StubResponse::Leg(leg) => Ok(leg.clone()),
            StubResponse::Error(error) => Err(error.clone()),
        }
    }
}
