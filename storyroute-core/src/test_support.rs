//! Deterministic `LegProvider` implementations and SQLite fixture helpers
//! used by unit and behaviour tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use geo::Coord;

use crate::{Leg, LegProvider, RoutingError, TransportMode};
#[cfg(feature = "store-sqlite")]
use crate::Point;

/// Provider returning a 100 m, one-minute leg for every request.
///
/// The leg geometry is the straight segment `origin;destination`.
#[derive(Default, Debug, Copy, Clone)]
pub struct UnitLegProvider;

impl LegProvider for UnitLegProvider {
    fn plan_leg(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
        _mode: TransportMode,
    ) -> Result<Leg, RoutingError> {
        Ok(Leg::new(
            100.0,
            Duration::from_secs(60),
            format!(
                "{},{};{},{}",
                origin.x, origin.y, destination.x, destination.y
            ),
        ))
    }
}

type Request = (Coord<f64>, Coord<f64>, TransportMode);

/// Provider replaying a fixed script of results and recording each request.
///
/// Once the script is exhausted every further request fails with
/// [`RoutingError::MissingRoute`].
#[derive(Debug, Default)]
pub struct ScriptedLegProvider {
    script: Mutex<VecDeque<Result<Leg, RoutingError>>>,
    requests: Mutex<Vec<Request>>,
}

impl ScriptedLegProvider {
    /// Create a provider that answers with `results` in order.
    pub fn new<I>(results: I) -> Self
    where
        I: IntoIterator<Item = Result<Leg, RoutingError>>,
    {
        Self {
            script: Mutex::new(results.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Number of requests received so far.
    pub fn calls(&self) -> usize {
        self.requests.lock().map_or(0, |requests| requests.len())
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<Request> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

impl LegProvider for ScriptedLegProvider {
    fn plan_leg(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
        mode: TransportMode,
    ) -> Result<Leg, RoutingError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push((origin, destination, mode));
        }
        self.script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front())
            .unwrap_or(Err(RoutingError::MissingRoute))
    }
}

/// Create the attraction, event and link tables read by
/// [`SqlitePointStore`](crate::store::SqlitePointStore).
#[cfg(feature = "store-sqlite")]
pub fn create_point_schema(connection: &rusqlite::Connection) -> rusqlite::Result<()> {
    connection.execute_batch(
        "CREATE TABLE attractions (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            address TEXT,
            longitude DECIMAL(10, 7),
            latitude DECIMAL(10, 7)
        );
        CREATE TABLE historical_events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            event_name TEXT NOT NULL,
            start_year INTEGER,
            end_year INTEGER,
            period TEXT
        );
        CREATE TABLE attraction_events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            attraction_id INTEGER,
            event_id INTEGER
        );",
    )
}

/// Persist `point` so that the store reads it back unchanged.
///
/// Each story point becomes a linked event. The first event carries the
/// point's period and years; later events are undated. A dated point
/// without story points gets one unnamed event.
#[cfg(feature = "store-sqlite")]
pub fn insert_point(connection: &rusqlite::Connection, point: &Point) -> rusqlite::Result<()> {
    use rusqlite::params;

    connection.execute(
        "INSERT INTO attractions (id, name, address, longitude, latitude) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![point.id, point.name, point.address, point.location.x, point.location.y],
    )?;

    let mut names: Vec<&str> = point.story_points.iter().map(String::as_str).collect();
    if names.is_empty() && (point.is_dated() || !point.period.is_empty()) {
        names.push("");
    }
    for (index, name) in names.into_iter().enumerate() {
        let (period, start_year, end_year) = if index == 0 {
            (
                Some(point.period.as_str()),
                point.is_dated().then_some(point.start_year),
                point.end_year,
            )
        } else {
            (None, None, None)
        };
        connection.execute(
            "INSERT INTO historical_events (event_name, start_year, end_year, period) VALUES (?1, ?2, ?3, ?4)",
            params![name, start_year, end_year, period],
        )?;
        let event_id = connection.last_insert_rowid();
        connection.execute(
            "INSERT INTO attraction_events (attraction_id, event_id) VALUES (?1, ?2)",
            params![point.id, event_id],
        )?;
    }
    Ok(())
}
