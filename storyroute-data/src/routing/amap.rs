//! AMap direction API response types.
//!
//! AMap encodes numbers as strings and substitutes `[]` for absent scalar or
//! object fields. The deserialisers here accept numbers, numeric strings,
//! empty arrays and nulls, and degrade anything unreadable to zero or an
//! empty string instead of failing the whole response.
//!
//! See: <https://lbs.amap.com/api/webservice/guide/api/direction>

use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Status value AMap uses for successful responses.
const STATUS_OK: &str = "1";

/// Top-level envelope shared by every direction endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct DirectionResponse {
    /// `"1"` on success, `"0"` otherwise.
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: String,
    /// Human-readable status, e.g. `"OK"` or `"INVALID_USER_KEY"`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub info: String,
    /// Numeric status code, e.g. `"10000"`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub infocode: String,
    /// Route payload, absent on failure.
    #[serde(default, deserialize_with = "lenient_object")]
    pub route: Option<RouteEnvelope>,
}

impl DirectionResponse {
    /// Check if the response indicates success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Route payload. Driving and walking fill `paths`; transit fills
/// `transits`.
#[derive(Debug, Default, Deserialize)]
pub struct RouteEnvelope {
    /// Candidate paths, best first.
    #[serde(default, deserialize_with = "lenient_list")]
    pub paths: Vec<PathOption>,
    /// Candidate transit itineraries, best first.
    #[serde(default, deserialize_with = "lenient_list")]
    pub transits: Vec<TransitOption>,
}

/// One driving or walking path.
#[derive(Debug, Default, Deserialize)]
pub struct PathOption {
    /// Length in meters.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub distance: f64,
    /// Travel time in seconds.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub duration: f64,
    /// `lng,lat;lng,lat` polyline, when the endpoint supplies one.
    #[serde(default, deserialize_with = "lenient_string")]
    pub polyline: String,
    /// Turn-by-turn steps.
    #[serde(default, deserialize_with = "lenient_list")]
    pub steps: Vec<StepOption>,
}

/// One instruction within a path or walking segment.
#[derive(Debug, Default, Deserialize)]
pub struct StepOption {
    /// Instruction text.
    #[serde(default, deserialize_with = "lenient_string")]
    pub instruction: String,
    /// Road name.
    #[serde(default, deserialize_with = "lenient_string")]
    pub road: String,
    /// Length in meters.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub distance: f64,
    /// Travel time in seconds.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub duration: f64,
    /// Step polyline.
    #[serde(default, deserialize_with = "lenient_string")]
    pub polyline: String,
}

/// One transit itinerary.
#[derive(Debug, Default, Deserialize)]
pub struct TransitOption {
    /// Total length in meters.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub distance: f64,
    /// Total travel time in seconds.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub duration: f64,
    /// Walking and riding segments in order.
    #[serde(default, deserialize_with = "lenient_list")]
    pub segments: Vec<Segment>,
}

/// A walking part followed by an optional ride.
#[derive(Debug, Default, Deserialize)]
pub struct Segment {
    /// Walk to the boarding stop.
    #[serde(default, deserialize_with = "lenient_object")]
    pub walking: Option<Walking>,
    /// Ride on a bus or metro line.
    #[serde(default, deserialize_with = "lenient_object")]
    pub bus: Option<Bus>,
}

/// Walking part of a transit segment.
#[derive(Debug, Default, Deserialize)]
pub struct Walking {
    /// Walking steps.
    #[serde(default, deserialize_with = "lenient_list")]
    pub steps: Vec<StepOption>,
}

/// Riding part of a transit segment.
#[derive(Debug, Default, Deserialize)]
pub struct Bus {
    /// Ride length in meters, when given at segment level.
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub distance: Option<f64>,
    /// Ride time in seconds, when given at segment level.
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub duration: Option<f64>,
    /// Candidate lines for the ride, best first.
    #[serde(default, deserialize_with = "lenient_list")]
    pub buslines: Vec<Busline>,
}

/// One line able to serve a ride.
#[derive(Debug, Default, Deserialize)]
pub struct Busline {
    /// Line name.
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    /// Ride length in meters.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub distance: f64,
    /// Ride time in seconds.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub duration: f64,
}

impl Bus {
    /// Distance and duration of the ride, or `None` when the segment has no
    /// ride.
    ///
    /// Segment-level figures win; otherwise the first line's figures are
    /// used.
    #[must_use]
    pub fn ride(&self) -> Option<(f64, f64)> {
        if self.distance.is_some() || self.duration.is_some() {
            return Some((
                self.distance.unwrap_or_default(),
                self.duration.unwrap_or_default(),
            ));
        }
        self.buslines
            .first()
            .map(|line| (line.distance, line.duration))
    }
}

fn number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    };
    parsed.filter(|v: &f64| v.is_finite() && *v >= 0.0)
}

fn lenient_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number(&Value::deserialize(deserializer)?))
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_f64(deserializer)?.unwrap_or_default())
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Number(number) => number.to_string(),
        _ => String::new(),
    })
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        value @ Value::Array(_) => serde_json::from_value(value).map_err(de::Error::custom),
        _ => Ok(Vec::new()),
    }
}

fn lenient_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => serde_json::from_value(value)
            .map(Some)
            .map_err(de::Error::custom),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn deserialise_walking_response() {
        let json = r#"{
            "status": "1",
            "info": "OK",
            "infocode": "10000",
            "route": {
                "origin": "121.4737,31.2304",
                "paths": [{
                    "distance": "1520",
                    "duration": 1216,
                    "steps": [
                        { "instruction": "向南步行100米", "road": "西藏中路", "distance": "100", "duration": "80", "polyline": "121.4737,31.2304;121.4737,31.2295" },
                        { "instruction": "到达目的地", "road": [], "distance": "1420", "duration": "1136", "polyline": [] }
                    ]
                }]
            }
        }"#;

        let response: DirectionResponse = serde_json::from_str(json).expect("should deserialise");

        assert!(response.is_ok());
        let route = response.route.expect("route present");
        let path = &route.paths[0];
        assert_eq!(path.distance, 1520.0);
        assert_eq!(path.duration, 1216.0);
        assert!(path.polyline.is_empty());
        assert_eq!(path.steps[1].road, "");
        assert_eq!(path.steps[1].polyline, "");
        assert!(route.transits.is_empty());
    }

    #[rstest]
    fn deserialise_error_response() {
        let json = r#"{ "status": "0", "info": "INVALID_USER_KEY", "infocode": "10001" }"#;

        let response: DirectionResponse = serde_json::from_str(json).expect("should deserialise");

        assert!(!response.is_ok());
        assert_eq!(response.info, "INVALID_USER_KEY");
        assert_eq!(response.infocode, "10001");
        assert!(response.route.is_none());
    }

    #[rstest]
    #[case(r#""12.5""#, 12.5)]
    #[case("7", 7.0)]
    #[case("[]", 0.0)]
    #[case("null", 0.0)]
    #[case(r#""abc""#, 0.0)]
    #[case(r#""NaN""#, 0.0)]
    #[case("-3", 0.0)]
    fn numbers_degrade_to_zero(#[case] raw: &str, #[case] expected: f64) {
        let json = format!(r#"{{ "distance": {raw} }}"#);
        let step: StepOption = serde_json::from_str(&json).expect("should deserialise");
        assert_eq!(step.distance, expected);
    }

    #[rstest]
    fn empty_route_array_counts_as_missing() {
        let json = r#"{ "status": "1", "info": "OK", "route": [] }"#;
        let response: DirectionResponse = serde_json::from_str(json).expect("should deserialise");
        assert!(response.route.is_none());
    }

    #[rstest]
    fn bus_ride_prefers_segment_figures_then_first_line() {
        let segment: Bus = serde_json::from_str(r#"{ "distance": "3000", "duration": "600" }"#)
            .expect("should deserialise");
        assert_eq!(segment.ride(), Some((3000.0, 600.0)));

        let lines: Bus = serde_json::from_str(
            r#"{ "buslines": [{ "name": "71路", "distance": "2500", "duration": "900" }, { "name": "空调920路", "distance": "2600", "duration": "950" }] }"#,
        )
        .expect("should deserialise");
        assert_eq!(lines.ride(), Some((2500.0, 900.0)));

        let empty: Bus = serde_json::from_str(r#"{ "buslines": [] }"#).expect("should deserialise");
        assert_eq!(empty.ride(), None);
    }
}
