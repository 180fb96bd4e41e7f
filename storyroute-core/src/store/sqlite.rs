//! SQLite-backed point store.
//!
//! The database holds `attractions`, `historical_events` and the
//! `attraction_events` link table. A point takes its period and years from
//! the earliest linked event, and its story points from the names of every
//! linked event in link order.

use std::{
    collections::HashMap,
    fmt,
    path::{Path, PathBuf},
};

use geo::Coord;
use log::warn;
use rusqlite::{Connection, OpenFlags, params_from_iter};
use thiserror::Error;

use crate::{Point, PointResolver, Resolution, ResolveError, UNKNOWN_START_YEAR};

/// SQLite limits bound parameters per statement to 999 by default. The store
/// chunks `IN` queries to remain below that ceiling.
const SQLITE_MAX_VARIABLE_NUMBER: usize = 999;

/// Error raised when opening or querying the point database.
#[derive(Debug, Error)]
pub enum SqlitePointStoreError {
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path}: {source}")]
    OpenDatabase {
        /// Location of the SQLite database on disk.
        path: PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Generic SQLite error when reading point rows.
    #[error(transparent)]
    Database(#[from] rusqlite::Error),
}

/// Read-only point store backed by a SQLite database.
pub struct SqlitePointStore {
    connection: Connection,
    path: PathBuf,
}

impl fmt::Debug for SqlitePointStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlitePointStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

struct AttractionRow {
    id: u64,
    name: String,
    address: Option<String>,
    longitude: Option<f64>,
    latitude: Option<f64>,
}

struct EventRow {
    name: Option<String>,
    start_year: Option<i32>,
    end_year: Option<i32>,
    period: Option<String>,
}

impl SqlitePointStore {
    /// Open the database at `path` read-only.
    ///
    /// The file must already exist; it is never created.
    pub fn open<P>(path: P) -> Result<Self, SqlitePointStoreError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let connection = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|source| SqlitePointStoreError::OpenDatabase {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            connection,
            path: path.to_path_buf(),
        })
    }

    /// Location of the backing database.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every point among `ids` that exists, keyed by identifier.
    ///
    /// Attractions without coordinates cannot be routed and are left out.
    pub fn load_points(&self, ids: &[u64]) -> Result<HashMap<u64, Point>, SqlitePointStoreError> {
        let mut unique = ids.to_vec();
        unique.sort_unstable();
        unique.dedup();

        let mut points = HashMap::with_capacity(unique.len());
        for chunk in unique.chunks(SQLITE_MAX_VARIABLE_NUMBER) {
            let mut events = load_events_chunk(&self.connection, chunk)?;
            for row in load_attractions_chunk(&self.connection, chunk)? {
                let linked = events.remove(&row.id).unwrap_or_default();
                if let Some(point) = row.into_point(linked) {
                    points.insert(point.id, point);
                }
            }
        }
        Ok(points)
    }
}

impl PointResolver for SqlitePointStore {
    fn resolve(&self, ids: &[u64]) -> Result<Resolution, ResolveError> {
        if ids.is_empty() {
            return Err(ResolveError::EmptyInput);
        }
        let found = self
            .load_points(ids)
            .map_err(|err| ResolveError::StoreUnavailable {
                message: err.to_string(),
            })?;
        Ok(Resolution::from_lookup(ids, |id| found.get(&id).cloned()))
    }
}

impl AttractionRow {
    fn into_point(self, events: Vec<EventRow>) -> Option<Point> {
        let (Some(x), Some(y)) = (self.longitude, self.latitude) else {
            warn!("attraction {} has no coordinates; skipping", self.id);
            return None;
        };
        let mut point = Point::new(self.id, self.name, Coord { x, y })
            .with_address(self.address.unwrap_or_default());

        // `min_by_key` keeps the first of equal keys, so ties follow link order.
        let earliest = events
            .iter()
            .min_by_key(|event| (event.start_year.is_none(), event.start_year));
        if let Some(event) = earliest {
            point = point.with_period(
                event.period.clone().unwrap_or_default(),
                event.start_year.unwrap_or(UNKNOWN_START_YEAR),
            );
            if let Some(end_year) = event.end_year {
                point = point.with_end_year(end_year);
            }
        }
        Some(point.with_story_points(events.into_iter().filter_map(|event| event.name)))
    }
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

fn load_attractions_chunk(
    connection: &Connection,
    ids: &[u64],
) -> Result<Vec<AttractionRow>, SqlitePointStoreError> {
    let query = format!(
        "SELECT id, name, address, longitude, latitude FROM attractions WHERE id IN ({})",
        placeholders(ids.len())
    );
    let mut statement = connection.prepare(&query)?;
    let mut rows = statement.query(params_from_iter(ids.iter()))?;
    let mut attractions = Vec::new();
    while let Some(row) = rows.next()? {
        attractions.push(AttractionRow {
            id: row.get(0)?,
            name: row.get(1)?,
            address: row.get(2)?,
            longitude: row.get(3)?,
            latitude: row.get(4)?,
        });
    }
    Ok(attractions)
}

fn load_events_chunk(
    connection: &Connection,
    ids: &[u64],
) -> Result<HashMap<u64, Vec<EventRow>>, SqlitePointStoreError> {
    let query = format!(
        "SELECT ae.attraction_id, e.event_name, e.start_year, e.end_year, e.period \
         FROM attraction_events ae \
         JOIN historical_events e ON ae.event_id = e.id \
         WHERE ae.attraction_id IN ({}) \
         ORDER BY ae.attraction_id, ae.id",
        placeholders(ids.len())
    );
    let mut statement = connection.prepare(&query)?;
    let mut rows = statement.query(params_from_iter(ids.iter()))?;
    let mut events: HashMap<u64, Vec<EventRow>> = HashMap::new();
    while let Some(row) = rows.next()? {
        let attraction_id: u64 = row.get(0)?;
        events.entry(attraction_id).or_default().push(EventRow {
            name: row.get(1)?,
            start_year: row.get(2)?,
            end_year: row.get(3)?,
            period: row.get(4)?,
        });
    }
    Ok(events)
}
