use thiserror::Error;

use crate::{ResolveError, RoutingError};

/// Reasons a [`crate::PlanRequest`] is rejected before any lookup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// The request named no points.
    #[error("at least one point identifier is required")]
    EmptyPointIds,
    /// A location was not finite or fell outside WGS84 bounds.
    #[error("{field} location ({longitude}, {latitude}) is not a valid WGS84 coordinate")]
    InvalidLocation {
        /// Request field holding the location.
        field: &'static str,
        /// Supplied longitude.
        longitude: f64,
        /// Supplied latitude.
        latitude: f64,
    },
}

/// Errors from [`crate::TripPlanner::plan`].
///
/// [`PlanError::Validation`] and [`PlanError::NotFound`] are caused by the
/// request; the remaining variants are failures on the serving side.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    /// The request was malformed.
    #[error("invalid plan request: {0}")]
    Validation(#[from] ValidationError),
    /// Requested points did not resolve.
    #[error("points not found: {ids:?}")]
    NotFound {
        /// Identifiers that did not resolve, in request order.
        ids: Vec<u64>,
    },
    /// The routing provider failed for one leg.
    #[error("routing provider failed: {0}")]
    Provider(#[source] RoutingError),
    /// A collaborator returned data the planner cannot use.
    #[error("internal planning error: {message}")]
    Internal {
        /// Description of the failure.
        message: String,
    },
}

impl PlanError {
    /// Whether the caller, rather than the service, caused the failure.
    ///
    /// # Examples
    /// ```
    /// use storyroute_core::{PlanError, RoutingError, ValidationError};
    ///
    /// assert!(PlanError::from(ValidationError::EmptyPointIds).is_client_error());
    /// assert!(!PlanError::from(RoutingError::MissingRoute).is_client_error());
    /// ```
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::NotFound { .. })
    }
}

impl From<RoutingError> for PlanError {
    fn from(err: RoutingError) -> Self {
        match err {
            RoutingError::Parse { .. } => Self::Internal {
                message: err.to_string(),
            },
            other => Self::Provider(other),
        }
    }
}

impl From<ResolveError> for PlanError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::EmptyInput => Self::Validation(ValidationError::EmptyPointIds),
            ResolveError::StoreUnavailable { .. } => Self::Internal {
                message: err.to_string(),
            },
        }
    }
}
