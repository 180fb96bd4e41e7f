//! AMap-backed leg provider.
//!
//! This module provides [`AmapLegProvider`], an implementation of
//! [`storyroute_core::LegProvider`] that fetches one route per leg from the
//! AMap web service direction API.
//!
//! # Architecture
//!
//! Each transport mode has its own endpoint and response shape. A private
//! profile per mode names the endpoint, adds any mode-specific parameters and
//! turns the route envelope into a [`storyroute_core::Leg`]. Driving and
//! walking copy the best path; transit flattens the best itinerary into walk
//! steps plus one synthetic step per ride.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use storyroute_data::routing::{AmapConfig, AmapLegProvider};
//!
//! let config = AmapConfig::new("your-amap-key")
//!     .with_timeout(Duration::from_secs(10))
//!     .with_transit_city("021");
//! let provider = AmapLegProvider::with_config(config)?;
//! # let _ = provider;
//! # Ok::<(), storyroute_data::routing::ProviderBuildError>(())
//! ```

mod amap;
mod profile;
mod provider;

#[doc(hidden)]
pub mod test_support;

pub use profile::{TRANSIT_STEP_INSTRUCTION, TRANSIT_STEP_ROAD};
pub use provider::{
    AmapConfig, AmapLegProvider, DEFAULT_BASE_URL, DEFAULT_TRANSIT_CITY,
    DEFAULT_TRANSIT_STRATEGY, DEFAULT_USER_AGENT, ProviderBuildError,
};
