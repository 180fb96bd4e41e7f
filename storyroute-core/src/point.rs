use geo::Coord;

/// Start year recorded for points without any linked historical event.
///
/// Undated points sort after every dated point when sequencing
/// chronologically.
pub const UNKNOWN_START_YEAR: i32 = 9999;

/// A sightseeing location with its historical context.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`.
/// Story points keep the order of the linked events and never contain blank
/// labels.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use storyroute_core::{Point, UNKNOWN_START_YEAR};
///
/// let point = Point::new(1, "Memorial Hall", Coord { x: 121.4752, y: 31.2204 });
/// assert_eq!(point.start_year, UNKNOWN_START_YEAR);
/// assert!(!point.is_dated());
///
/// let dated = point.with_period("Founding", 1921);
/// assert!(dated.is_dated());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    /// Unique identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Postal address, empty when unknown.
    pub address: String,
    /// Geospatial position.
    pub location: Coord<f64>,
    /// Historical period label, empty when undated.
    pub period: String,
    /// Start year of the earliest linked event.
    pub start_year: i32,
    /// End year of the earliest linked event, when recorded.
    pub end_year: Option<i32>,
    /// Narrative labels attached to the point.
    pub story_points: Vec<String>,
}

impl Point {
    /// Construct an undated point without address or story points.
    pub fn new(id: u64, name: impl Into<String>, location: Coord<f64>) -> Self {
        Self {
            id,
            name: name.into(),
            address: String::new(),
            location,
            period: String::new(),
            start_year: UNKNOWN_START_YEAR,
            end_year: None,
            story_points: Vec::new(),
        }
    }

    /// Attach a period label and start year.
    #[must_use]
    pub fn with_period(mut self, period: impl Into<String>, start_year: i32) -> Self {
        self.period = period.into();
        self.start_year = start_year;
        self
    }

    /// Attach the end year of the point's period.
    #[must_use]
    pub fn with_end_year(mut self, end_year: i32) -> Self {
        self.end_year = Some(end_year);
        self
    }

    /// Attach a postal address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    /// Attach story points, discarding blank labels.
    ///
    /// # Examples
    /// ```
    /// use geo::Coord;
    /// use storyroute_core::Point;
    ///
    /// let point = Point::new(1, "Red Boat", Coord { x: 120.7551, y: 30.7566 })
    ///     .with_story_points(["Red Boat Spirit", " ", "Lake classroom"]);
    /// assert_eq!(point.story_points, vec!["Red Boat Spirit", "Lake classroom"]);
    /// ```
    #[must_use]
    pub fn with_story_points<I, S>(mut self, story_points: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.story_points = story_points
            .into_iter()
            .map(Into::into)
            .filter(|label: &String| !label.trim().is_empty())
            .collect();
        self
    }

    /// Whether the point carries a real start year.
    pub fn is_dated(&self) -> bool {
        self.start_year != UNKNOWN_START_YEAR
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn new_point_is_undated() {
        let point = Point::new(7, "Museum", Coord { x: 0.0, y: 0.0 });
        assert_eq!(point.start_year, UNKNOWN_START_YEAR);
        assert!(point.period.is_empty());
        assert!(point.end_year.is_none());
    }

    #[rstest]
    fn builders_populate_fields() {
        let point = Point::new(3, "Museum", Coord { x: 114.1732, y: 26.572 })
            .with_address("Jinggangshan")
            .with_period("Land Revolution", 1927)
            .with_end_year(1937)
            .with_story_points(["Base area"]);
        assert_eq!(point.address, "Jinggangshan");
        assert_eq!(point.period, "Land Revolution");
        assert_eq!(point.start_year, 1927);
        assert_eq!(point.end_year, Some(1937));
        assert_eq!(point.story_points, vec!["Base area".to_owned()]);
    }
}
