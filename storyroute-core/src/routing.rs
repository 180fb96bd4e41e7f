//! Request single legs from a routing provider.
//!
//! The [`LegProvider`] trait abstracts the external mapping service. Each
//! call covers exactly one origin/destination pair and one transport mode;
//! retries, if any, belong to the caller.

use geo::Coord;
use thiserror::Error;

use crate::{Leg, TransportMode};

/// Errors from [`LegProvider::plan_leg`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// The request did not complete or returned a non-success HTTP status.
    #[error("routing request to {url} failed: {message}")]
    RequestFailed {
        /// Requested URL with credentials removed.
        url: String,
        /// HTTP status, when a response was received.
        status: Option<u16>,
        /// Description of the failure.
        message: String,
    },
    /// The request exceeded the configured timeout.
    #[error("routing request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Requested URL with credentials removed.
        url: String,
        /// Timeout applied to the request.
        timeout_secs: u64,
    },
    /// The provider answered with a non-success status in its payload.
    #[error("routing provider rejected the request: {info} ({code})")]
    ServiceError {
        /// Provider-specific status or info code.
        code: String,
        /// Provider-supplied description.
        info: String,
    },
    /// The response body could not be decoded.
    #[error("failed to parse routing response: {message}")]
    Parse {
        /// Decoder message.
        message: String,
    },
    /// The response carried no route envelope.
    #[error("routing provider returned no route data")]
    MissingRoute,
    /// The route envelope held no path or alternative.
    #[error("routing provider found no {mode} path")]
    NoPath {
        /// Mode the leg was requested for.
        mode: TransportMode,
    },
}

/// Plan one leg between two coordinates.
///
/// Implementations issue a single provider call per invocation and must not
/// retry. Coordinates are WGS84 with `x = longitude` and `y = latitude`.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use geo::Coord;
/// use storyroute_core::{Leg, LegProvider, RoutingError, TransportMode};
///
/// struct FixedProvider;
///
/// impl LegProvider for FixedProvider {
///     fn plan_leg(
///         &self,
///         _origin: Coord<f64>,
///         _destination: Coord<f64>,
///         _mode: TransportMode,
///     ) -> Result<Leg, RoutingError> {
///         Ok(Leg::new(100.0, Duration::from_secs(60), ""))
///     }
/// }
///
/// let leg = FixedProvider.plan_leg(
///     Coord { x: 0.0, y: 0.0 },
///     Coord { x: 1.0, y: 1.0 },
///     TransportMode::Walking,
/// )?;
/// assert_eq!(leg.duration, Duration::from_secs(60));
/// # Ok::<(), RoutingError>(())
/// ```
pub trait LegProvider: Send + Sync {
    /// Return the provider's best path from `origin` to `destination`.
    fn plan_leg(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
        mode: TransportMode,
    ) -> Result<Leg, RoutingError>;
}

impl<P: LegProvider + ?Sized> LegProvider for &P {
    fn plan_leg(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
        mode: TransportMode,
    ) -> Result<Leg, RoutingError> {
        (**self).plan_leg(origin, destination, mode)
    }
}

impl<P: LegProvider + ?Sized> LegProvider for Box<P> {
    fn plan_leg(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
        mode: TransportMode,
    ) -> Result<Leg, RoutingError> {
        (**self).plan_leg(origin, destination, mode)
    }
}
