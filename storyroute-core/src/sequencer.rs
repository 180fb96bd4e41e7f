//! Visiting order for resolved points.

use crate::{Point, Strategy, UNKNOWN_START_YEAR};

/// Order `points` according to `strategy`.
///
/// [`Strategy::Shortest`] keeps the given order, assuming the caller already
/// ordered by proximity. [`Strategy::Chronological`] performs a stable sort
/// by start year; undated points move to the end and ties keep their
/// relative order.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use storyroute_core::{Point, Strategy, sequence};
///
/// let origin = Coord { x: 0.0, y: 0.0 };
/// let points = vec![
///     Point::new(1, "a", origin).with_period("war", 1935),
///     Point::new(2, "b", origin).with_period("founding", 1921),
///     Point::new(3, "c", origin).with_period("founding", 1921),
/// ];
/// let ordered = sequence(points, Strategy::Chronological);
/// let ids: Vec<_> = ordered.iter().map(|p| p.id).collect();
/// assert_eq!(ids, vec![2, 3, 1]);
/// ```
pub fn sequence(mut points: Vec<Point>, strategy: Strategy) -> Vec<Point> {
    match strategy {
        Strategy::Shortest => points,
        Strategy::Chronological => {
            // `sort_by_key` is stable, which keeps equal years in input order.
            points.sort_by_key(chronological_key);
            points
        }
    }
}

fn chronological_key(point: &Point) -> (bool, i32) {
    (point.start_year == UNKNOWN_START_YEAR, point.start_year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use proptest::strategy::Just;
    use proptest::{prop_assert, prop_assert_eq, prop_oneof, proptest};
    use rstest::{fixture, rstest};

    fn dated(id: u64, year: i32) -> Point {
        Point::new(id, format!("point {id}"), Coord { x: 0.0, y: 0.0 }).with_period("p", year)
    }

    fn ids(points: &[Point]) -> Vec<u64> {
        points.iter().map(|p| p.id).collect()
    }

    #[fixture]
    fn mixed_years() -> Vec<Point> {
        vec![dated(1, 1935), dated(2, 1921), dated(3, 1921)]
    }

    #[rstest]
    fn chronological_orders_by_year_keeping_ties(mixed_years: Vec<Point>) {
        let ordered = sequence(mixed_years, Strategy::Chronological);
        assert_eq!(ids(&ordered), vec![2, 3, 1]);
    }

    #[rstest]
    fn shortest_passes_points_through(mixed_years: Vec<Point>) {
        let ordered = sequence(mixed_years, Strategy::Shortest);
        assert_eq!(ids(&ordered), vec![1, 2, 3]);
    }

    #[rstest]
    fn undated_points_sort_last() {
        let undated = Point::new(9, "undated", Coord { x: 0.0, y: 0.0 });
        let late = dated(4, 12000);
        let ordered = sequence(
            vec![undated, dated(5, 1949), late],
            Strategy::Chronological,
        );
        assert_eq!(ids(&ordered), vec![5, 4, 9]);
    }

    #[rstest]
    fn empty_input_yields_empty_output() {
        assert!(sequence(Vec::new(), Strategy::Chronological).is_empty());
    }

    fn year_strategy() -> impl proptest::strategy::Strategy<Value = i32> {
        prop_oneof![1900_i32..1960, Just(UNKNOWN_START_YEAR)]
    }

    proptest! {
        #[test]
        fn chronological_sort_is_stable_and_ordered(
            years in proptest::collection::vec(year_strategy(), 0..24)
        ) {
            let points: Vec<Point> = years
                .iter()
                .enumerate()
                .map(|(idx, &year)| dated(idx as u64, year))
                .collect();
            let ordered = sequence(points.clone(), Strategy::Chronological);

            prop_assert_eq!(ordered.len(), points.len());
            for pair in ordered.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                prop_assert!(chronological_key(a) <= chronological_key(b));
                if a.start_year == b.start_year {
                    // Ids were assigned in input order.
                    prop_assert!(a.id < b.id);
                }
            }
        }

        #[test]
        fn sequencing_is_idempotent(
            years in proptest::collection::vec(year_strategy(), 0..16)
        ) {
            let points: Vec<Point> = years
                .iter()
                .enumerate()
                .map(|(idx, &year)| dated(idx as u64, year))
                .collect();
            let once = sequence(points, Strategy::Chronological);
            let twice = sequence(once.clone(), Strategy::Chronological);
            prop_assert_eq!(once, twice);
        }
    }
}
