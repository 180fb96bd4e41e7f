//! Path geometry helpers.
//!
//! Provider geometries are `lng,lat` pairs separated by `;`. Leg geometries
//! are concatenated with the same separator so the joined string stays
//! decodable as one path.

use geo::Coord;

/// Separator placed between leg geometries in a trip.
pub const GEOMETRY_SEPARATOR: &str = ";";

/// Geometry recorded for transit legs; the provider exposes no polyline for
/// mixed-mode itineraries.
pub const TRANSIT_GEOMETRY: &str = "transit";

/// Tolerance in degrees under which an end location is treated as the start.
const SAME_LOCATION_EPSILON: f64 = 0.0001;

/// Join geometries in order, skipping blank entries.
///
/// # Examples
/// ```
/// use storyroute_core::geometry::join_geometries;
///
/// let joined = join_geometries(["1,2;3,4", "", "5,6"]);
/// assert_eq!(joined, "1,2;3,4;5,6");
/// ```
pub fn join_geometries<'a, I>(geometries: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    geometries
        .into_iter()
        .filter(|geometry| !geometry.trim().is_empty())
        .collect::<Vec<_>>()
        .join(GEOMETRY_SEPARATOR)
}

/// Decode a `lng,lat;lng,lat` geometry into coordinates.
///
/// Pairs that do not parse, or that are not finite, are skipped. The transit
/// sentinel therefore decodes to nothing.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use storyroute_core::geometry::decode_path;
///
/// let path = decode_path("121.47,31.22;bogus;121.48,31.23");
/// assert_eq!(path, vec![Coord { x: 121.47, y: 31.22 }, Coord { x: 121.48, y: 31.23 }]);
/// assert!(decode_path("transit").is_empty());
/// ```
pub fn decode_path(geometry: &str) -> Vec<Coord<f64>> {
    geometry
        .split(GEOMETRY_SEPARATOR)
        .filter_map(decode_pair)
        .collect()
}

fn decode_pair(pair: &str) -> Option<Coord<f64>> {
    let mut parts = pair.split(',');
    let x: f64 = parts.next()?.trim().parse().ok()?;
    let y: f64 = parts.next()?.trim().parse().ok()?;
    if !x.is_finite() || !y.is_finite() {
        log::warn!("skipping non-finite path coordinate {pair:?}");
        return None;
    }
    Some(Coord { x, y })
}

/// Straight path through start, stops and end.
///
/// The end is omitted when it coincides with the start, which covers round
/// trips whose end was defaulted to the start location.
pub fn basic_path<I>(start: Coord<f64>, stops: I, end: Option<Coord<f64>>) -> Vec<Coord<f64>>
where
    I: IntoIterator<Item = Coord<f64>>,
{
    let mut path = vec![start];
    path.extend(stops);
    if let Some(end_coord) = end
        && !same_location(start, end_coord)
    {
        path.push(end_coord);
    }
    path
}

fn same_location(a: Coord<f64>, b: Coord<f64>) -> bool {
    (a.x - b.x).abs() < SAME_LOCATION_EPSILON && (a.y - b.y).abs() < SAME_LOCATION_EPSILON
}
