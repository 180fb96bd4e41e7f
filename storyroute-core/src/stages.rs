//! Group visited points into chronological stages.
//!
//! Stages follow the order in which each period label is first seen. A label
//! that reappears later in the visit order joins its existing stage rather
//! than opening a new one, so interleaved periods collapse into one stage
//! each.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use crate::Point;

/// Year span a stage nominally covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct YearRange {
    /// Earliest start year among dated members.
    pub start: i32,
    /// Latest end year (or start year) among dated members.
    pub end: i32,
}

impl YearRange {
    fn covering(point: &Point) -> Option<Self> {
        point.is_dated().then(|| Self {
            start: point.start_year,
            end: point.end_year.unwrap_or(point.start_year).max(point.start_year),
        })
    }

    fn merge(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// A point as presented inside a stage.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StageStop {
    /// Identifier of the visited point.
    pub point_id: u64,
    /// Display name of the visited point.
    pub name: String,
    /// 1-based position within the stage.
    pub position: usize,
    /// Distance from the previous stop in the stage. Always zero.
    pub distance_from_previous_m: f64,
    /// Travel time from the previous stop in the stage. Always zero.
    pub duration_from_previous: Duration,
}

/// Contiguous narrative group of points sharing a period label.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stage {
    /// Period label shared by every stop.
    pub label: String,
    /// Years covered by the dated stops, if any.
    pub years: Option<YearRange>,
    /// Stops in visiting order.
    pub stops: Vec<StageStop>,
}

impl Stage {
    fn open(label: &str) -> Self {
        Self {
            label: label.to_owned(),
            years: None,
            stops: Vec::new(),
        }
    }

    fn push(&mut self, point: &Point) {
        self.stops.push(StageStop {
            point_id: point.id,
            name: point.name.clone(),
            position: self.stops.len() + 1,
            distance_from_previous_m: 0.0,
            duration_from_previous: Duration::ZERO,
        });
        if let Some(range) = YearRange::covering(point) {
            self.years = Some(self.years.map_or(range, |years| years.merge(range)));
        }
    }
}

/// Partition ordered points into stages by period label.
///
/// Every point lands in exactly one stage and stage stops keep the overall
/// visit order. Empty input yields no stages.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use storyroute_core::{Point, group_stages};
///
/// let at = Coord { x: 0.0, y: 0.0 };
/// let points = vec![
///     Point::new(1, "a", at).with_period("founding", 1921),
///     Point::new(2, "b", at).with_period("revolution", 1927),
///     Point::new(3, "c", at).with_period("founding", 1921),
/// ];
/// let stages = group_stages(&points);
/// assert_eq!(stages.len(), 2);
/// assert_eq!(stages[0].stops.len(), 2);
/// assert_eq!(stages[0].stops[1].position, 2);
/// ```
pub fn group_stages(points: &[Point]) -> Vec<Stage> {
    let mut index_by_label: HashMap<&str, usize> = HashMap::new();
    let mut stages: Vec<Stage> = Vec::new();
    for point in points {
        let label = point.period.as_str();
        let index = *index_by_label.entry(label).or_insert_with(|| {
            stages.push(Stage::open(label));
            stages.len() - 1
        });
        if let Some(stage) = stages.get_mut(index) {
            stage.push(point);
        }
    }
    stages
}
