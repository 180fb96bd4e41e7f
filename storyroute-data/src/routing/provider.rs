//! HTTP-based `LegProvider` using AMap's direction API.
//!
//! The [`LegProvider`] trait is synchronous to keep the core library
//! embeddable in synchronous contexts. This provider bridges the async HTTP
//! calls to the sync interface by blocking on a Tokio runtime internally.
//!
//! # Example
//!
//! ```no_run
//! use geo::Coord;
//! use storyroute_core::{LegProvider, TransportMode};
//! use storyroute_data::routing::AmapLegProvider;
//!
//! let provider = AmapLegProvider::new("your-amap-key")?;
//! let leg = provider.plan_leg(
//!     Coord { x: 121.4737, y: 31.2304 },
//!     Coord { x: 121.4752, y: 31.2204 },
//!     TransportMode::Walking,
//! )?;
//! println!("{} m", leg.distance_m);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt;
use std::time::Duration;

use geo::Coord;
use log::debug;
use reqwest::Client;
use storyroute_core::{Leg, LegProvider, RoutingError, TransportMode};
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use url::Url;

use super::amap::DirectionResponse;
use super::profile::{ModeProfile, profile_for};

/// Error type for [`AmapLegProvider`] construction failures.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// No API key was configured.
    #[error("an AMap API key is required")]
    MissingKey,
    /// The base URL could not be parsed.
    #[error("invalid AMap base URL: {0}")]
    InvalidBaseUrl(#[source] url::ParseError),
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Default AMap REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://restapi.amap.com";

/// Default user agent for AMap requests.
pub const DEFAULT_USER_AGENT: &str = "storyroute/0.1";

/// City code searched by transit requests unless configured otherwise.
pub const DEFAULT_TRANSIT_CITY: &str = "010";

/// AMap transit strategy `0`: fastest itinerary.
pub const DEFAULT_TRANSIT_STRATEGY: &str = "0";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for [`AmapLegProvider`].
#[derive(Clone)]
pub struct AmapConfig {
    /// Base URL for the AMap service (e.g., `"https://restapi.amap.com"`).
    pub base_url: String,
    /// Web service API key sent with every request.
    pub key: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// City code searched by transit requests.
    pub transit_city: String,
    /// AMap transit strategy code.
    pub transit_strategy: String,
}

impl fmt::Debug for AmapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AmapConfig")
            .field("base_url", &self.base_url)
            .field("key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("transit_city", &self.transit_city)
            .field("transit_strategy", &self.transit_strategy)
            .finish()
    }
}

impl Default for AmapConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            key: String::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            transit_city: DEFAULT_TRANSIT_CITY.to_string(),
            transit_strategy: DEFAULT_TRANSIT_STRATEGY.to_string(),
        }
    }
}

impl AmapConfig {
    /// Create a new configuration with the given API key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    /// Set the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the city code searched by transit requests.
    #[must_use]
    pub fn with_transit_city(mut self, city: impl Into<String>) -> Self {
        self.transit_city = city.into();
        self
    }

    /// Set the transit strategy code.
    #[must_use]
    pub fn with_transit_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.transit_strategy = strategy.into();
        self
    }
}

/// Request URL with and without the API key.
struct LegUrl {
    request: Url,
    redacted: String,
}

/// HTTP-based leg provider using AMap's direction API.
///
/// This provider implements the synchronous [`LegProvider`] trait by
/// internally blocking on asynchronous HTTP requests. It owns a Tokio
/// runtime that is reused across calls.
///
/// # Runtime behaviour
///
/// When called from outside any Tokio runtime, the provider uses its own
/// stored runtime. When called from within an existing multi-threaded Tokio
/// runtime (detected via [`Handle::try_current()`] and
/// [`RuntimeFlavor::MultiThread`]), it uses that runtime's handle with
/// [`tokio::task::block_in_place`] to avoid nested runtime panics.
///
/// When called from within a `current_thread` Tokio runtime, the provider
/// falls back to using its own internal runtime. This may deadlock if the
/// caller's runtime is driving IO or timers that this request depends on.
///
/// Each call issues exactly one request and never retries. The API key is
/// stripped from URLs carried in errors and log lines.
pub struct AmapLegProvider {
    client: Client,
    config: AmapConfig,
    base_url: Url,
    runtime: Runtime,
}

impl fmt::Debug for AmapLegProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AmapLegProvider")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish_non_exhaustive()
    }
}

impl AmapLegProvider {
    /// Create a new provider for the public AMap endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is blank or the HTTP client or Tokio
    /// runtime fails to build.
    pub fn new(key: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(AmapConfig::new(key))
    }

    /// Create a new provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is blank, the base URL does not parse, or
    /// the HTTP client or Tokio runtime fails to build.
    pub fn with_config(config: AmapConfig) -> Result<Self, ProviderBuildError> {
        if config.key.trim().is_empty() {
            return Err(ProviderBuildError::MissingKey);
        }
        let base_url = Url::parse(&config.base_url).map_err(ProviderBuildError::InvalidBaseUrl)?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ProviderBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            base_url,
            runtime,
        })
    }

    /// The configuration the provider was built with.
    pub fn config(&self) -> &AmapConfig {
        &self.config
    }

    /// Build the direction URL for one leg.
    ///
    /// The format is `{base_url}{endpoint}?origin=lng,lat&destination=lng,lat`
    /// followed by mode-specific parameters and the key.
    fn build_leg_url(
        &self,
        profile: &dyn ModeProfile,
        origin: Coord<f64>,
        destination: Coord<f64>,
    ) -> LegUrl {
        let mut request = self.base_url.clone();
        let path = format!(
            "{}{}",
            request.path().trim_end_matches('/'),
            profile.endpoint()
        );
        request.set_path(&path);
        {
            let mut query = request.query_pairs_mut();
            query.clear();
            query.append_pair("origin", &format!("{},{}", origin.x, origin.y));
            query.append_pair("destination", &format!("{},{}", destination.x, destination.y));
            for (name, value) in profile.extra_params(&self.config) {
                query.append_pair(name, &value);
            }
        }
        let redacted = request.to_string();
        request
            .query_pairs_mut()
            .append_pair("key", &self.config.key);
        LegUrl { request, redacted }
    }

    /// Fetch one leg asynchronously.
    async fn fetch_leg_async(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
        mode: TransportMode,
    ) -> Result<Leg, RoutingError> {
        let profile = profile_for(mode);
        let url = self.build_leg_url(profile, origin, destination);
        debug!("GET {}", url.redacted);

        let response = self
            .client
            .get(url.request)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err.without_url(), &url.redacted))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err.without_url(), &url.redacted))?;

        let body: DirectionResponse = response.json().await.map_err(|err| {
            if err.is_decode() {
                RoutingError::Parse {
                    message: err.without_url().to_string(),
                }
            } else {
                self.convert_reqwest_error(&err.without_url(), &url.redacted)
            }
        })?;

        Self::convert_response(profile, body, mode)
    }

    /// Convert a reqwest error to a `RoutingError`.
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> RoutingError {
        if error.is_timeout() {
            return RoutingError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        RoutingError::RequestFailed {
            url: url.to_owned(),
            status: error.status().map(|status| status.as_u16()),
            message: error.to_string(),
        }
    }

    /// Convert an AMap response to a `Leg`.
    fn convert_response(
        profile: &dyn ModeProfile,
        response: DirectionResponse,
        mode: TransportMode,
    ) -> Result<Leg, RoutingError> {
        if !response.is_ok() {
            return Err(RoutingError::ServiceError {
                code: response.infocode,
                info: response.info,
            });
        }
        let route = response.route.ok_or(RoutingError::MissingRoute)?;
        profile.extract(route, mode)
    }
}

impl LegProvider for AmapLegProvider {
    /// Fetch the best leg between two coordinates.
    ///
    /// # Runtime requirements
    ///
    /// When called from within an existing Tokio runtime, the runtime must be
    /// multi-threaded (`flavor = "multi_thread"`). If called from within a
    /// `current_thread` runtime, the method falls back to using its own
    /// internal runtime.
    fn plan_leg(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
        mode: TransportMode,
    ) -> Result<Leg, RoutingError> {
        // block_in_place requires a multi-threaded runtime; for current_thread
        // runtimes we fall back to our own stored runtime.
        let future = self.fetch_leg_async(origin, destination, mode);
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn provider() -> AmapLegProvider {
        AmapLegProvider::with_config(
            AmapConfig::new("secret-key").with_base_url("http://amap.example.com"),
        )
        .expect("provider should build")
    }

    fn parse(json: &str) -> DirectionResponse {
        serde_json::from_str(json).expect("fixture parses")
    }

    #[rstest]
    fn build_leg_url_formats_coordinates_and_key(provider: AmapLegProvider) {
        let url = provider.build_leg_url(
            profile_for(TransportMode::Walking),
            Coord { x: 121.4737, y: 31.2304 },
            Coord { x: 121.4752, y: 31.2204 },
        );

        assert_eq!(
            url.redacted,
            "http://amap.example.com/v3/direction/walking?origin=121.4737%2C31.2304&destination=121.4752%2C31.2204"
        );
        let key = url
            .request
            .query_pairs()
            .find(|(name, _)| name == "key")
            .map(|(_, value)| value.into_owned());
        assert_eq!(key.as_deref(), Some("secret-key"));
        assert!(!url.redacted.contains("secret-key"));
    }

    #[rstest]
    fn build_leg_url_keeps_base_path() {
        let provider = AmapLegProvider::with_config(
            AmapConfig::new("k").with_base_url("http://proxy.example.com/amap/"),
        )
        .expect("provider should build");

        let url = provider.build_leg_url(
            profile_for(TransportMode::Transit),
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 1.0, y: 1.0 },
        );

        assert!(url
            .redacted
            .starts_with("http://proxy.example.com/amap/v3/direction/transit/integrated?"));
        assert!(url.redacted.ends_with("&strategy=0&city=010"));
    }

    #[rstest]
    fn convert_response_handles_service_error() {
        let response = parse(r#"{ "status": "0", "info": "INVALID_USER_KEY", "infocode": "10001" }"#);

        let err = AmapLegProvider::convert_response(
            profile_for(TransportMode::Driving),
            response,
            TransportMode::Driving,
        )
        .expect_err("should fail");

        assert_eq!(
            err,
            RoutingError::ServiceError {
                code: "10001".into(),
                info: "INVALID_USER_KEY".into(),
            }
        );
    }

    #[rstest]
    fn convert_response_handles_missing_route() {
        let response = parse(r#"{ "status": "1", "info": "OK", "infocode": "10000" }"#);

        let err = AmapLegProvider::convert_response(
            profile_for(TransportMode::Walking),
            response,
            TransportMode::Walking,
        )
        .expect_err("should fail");

        assert_eq!(err, RoutingError::MissingRoute);
    }

    #[rstest]
    fn convert_response_dispatches_to_profile() {
        let response = parse(
            r#"{ "status": "1", "route": { "paths": [{ "distance": "800", "duration": "600", "polyline": "1,1;2,2" }] } }"#,
        );

        let leg = AmapLegProvider::convert_response(
            profile_for(TransportMode::Walking),
            response,
            TransportMode::Walking,
        )
        .expect("should parse");

        assert_eq!(leg.distance_m, 800.0);
        assert_eq!(leg.duration, Duration::from_secs(600));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_key_is_rejected(#[case] key: &str) {
        let err = AmapLegProvider::new(key).expect_err("blank key");
        assert!(matches!(err, ProviderBuildError::MissingKey));
    }

    #[rstest]
    fn invalid_base_url_is_rejected() {
        let err = AmapLegProvider::with_config(AmapConfig::new("k").with_base_url("not a url"))
            .expect_err("bad url");
        assert!(matches!(err, ProviderBuildError::InvalidBaseUrl(_)));
        assert!(err.to_string().starts_with("invalid AMap base URL: "));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[rstest]
    fn missing_key_has_no_source() {
        let err = ProviderBuildError::MissingKey;
        assert_eq!(err.to_string(), "an AMap API key is required");
        assert!(std::error::Error::source(&err).is_none());
    }

    #[rstest]
    fn config_builder_pattern() {
        let config = AmapConfig::new("k")
            .with_base_url("http://example.com")
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("test-agent/1.0")
            .with_transit_city("021")
            .with_transit_strategy("2");

        assert_eq!(config.base_url, "http://example.com");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "test-agent/1.0");
        assert_eq!(config.transit_city, "021");
        assert_eq!(config.transit_strategy, "2");
        assert!(!format!("{config:?}").contains("\"k\""));
    }
}
