//! Fetch and accumulate the legs of a trip.

use std::time::Duration;

use geo::Coord;
use log::debug;

use crate::geometry::join_geometries;
use crate::{LegProvider, Point, RoutingError, TransportMode, TripLeg, Waypoint};

/// Legs of a trip with their accumulated totals.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Itinerary {
    /// Legs in visiting order.
    pub legs: Vec<TripLeg>,
    /// Sum of leg distances in meters.
    pub total_distance_m: f64,
    /// Sum of leg durations.
    pub total_duration: Duration,
    /// Leg geometries joined with [`crate::geometry::GEOMETRY_SEPARATOR`].
    pub geometry: String,
}

/// Request one leg per consecutive pair of locations and accumulate them.
///
/// The first leg departs from `start`. When `end` is supplied one more leg
/// runs from the last point, or from `start` if `points` is empty, to
/// `end`. The first provider failure aborts the trip; legs already fetched
/// are discarded.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use storyroute_core::{aggregate_trip, Point, TransportMode};
/// use storyroute_core::test_support::UnitLegProvider;
///
/// let start = Coord { x: 121.47, y: 31.22 };
/// let points = vec![Point::new(1, "a", Coord { x: 121.48, y: 31.23 })];
/// let trip = aggregate_trip(&UnitLegProvider, start, Some(start), &points, TransportMode::Walking)?;
/// assert_eq!(trip.legs.len(), 2);
/// assert_eq!(trip.total_distance_m, 200.0);
/// # Ok::<(), storyroute_core::RoutingError>(())
/// ```
pub fn aggregate_trip<P>(
    provider: &P,
    start: Coord<f64>,
    end: Option<Coord<f64>>,
    points: &[Point],
    mode: TransportMode,
) -> Result<Itinerary, RoutingError>
where
    P: LegProvider + ?Sized,
{
    let mut legs = Vec::with_capacity(points.len() + usize::from(end.is_some()));
    let mut from = (Waypoint::Start, start);
    for point in points {
        let to = (Waypoint::Point(point.id), point.location);
        legs.push(fetch_leg(provider, from, to, mode)?);
        from = to;
    }
    if let Some(end) = end {
        legs.push(fetch_leg(provider, from, (Waypoint::End, end), mode)?);
    }

    let total_distance_m = legs.iter().map(|trip_leg| trip_leg.leg.distance_m).sum();
    let total_duration = sum_durations(&legs)?;
    let geometry = join_geometries(legs.iter().map(|trip_leg| trip_leg.leg.geometry.as_str()));
    Ok(Itinerary {
        legs,
        total_distance_m,
        total_duration,
        geometry,
    })
}

/// Sum leg durations, rejecting totals a `Duration` cannot hold.
fn sum_durations(legs: &[TripLeg]) -> Result<Duration, RoutingError> {
    legs.iter()
        .try_fold(Duration::ZERO, |total, trip_leg| {
            total.checked_add(trip_leg.leg.duration)
        })
        .ok_or_else(|| RoutingError::Parse {
            message: format!("durations of {} legs overflow the trip total", legs.len()),
        })
}

fn fetch_leg<P>(
    provider: &P,
    (from, origin): (Waypoint, Coord<f64>),
    (to, destination): (Waypoint, Coord<f64>),
    mode: TransportMode,
) -> Result<TripLeg, RoutingError>
where
    P: LegProvider + ?Sized,
{
    debug!("requesting {mode} leg {from:?} -> {to:?}");
    let leg = provider.plan_leg(origin, destination, mode)?;
    debug!(
        "leg {from:?} -> {to:?}: {:.0} m in {}s",
        leg.distance_m,
        leg.duration.as_secs()
    );
    Ok(TripLeg { from, to, leg })
}
