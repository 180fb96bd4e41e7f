//! Resolve point identifiers to full point records.
//!
//! A [`PointResolver`] answers with the points it knows, in request order,
//! and reports the identifiers it could not find instead of failing. Only an
//! empty request is rejected. [`FallbackResolver`] layers the built-in
//! [`StaticPointTable`] under an optional backing store so planning keeps
//! working when the store is missing or unreadable.

use std::collections::HashMap;

use geo::Coord;
use thiserror::Error;

use crate::Point;

/// Errors from [`PointResolver::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No identifiers were supplied.
    #[error("at least one point identifier is required")]
    EmptyInput,
    /// The backing store could not be read.
    #[error("point store unavailable: {message}")]
    StoreUnavailable {
        /// Description of the store failure.
        message: String,
    },
}

/// Outcome of a resolution request.
///
/// `points` follows the request order. `unresolved` lists identifiers that
/// were found nowhere, also in request order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Resolution {
    /// Fully populated points.
    pub points: Vec<Point>,
    /// Identifiers that did not resolve.
    pub unresolved: Vec<u64>,
}

impl Resolution {
    /// Build a resolution by looking each identifier up in `lookup`.
    pub fn from_lookup<F>(ids: &[u64], mut lookup: F) -> Self
    where
        F: FnMut(u64) -> Option<Point>,
    {
        let mut resolution = Self::default();
        for &id in ids {
            match lookup(id) {
                Some(point) => resolution.points.push(point),
                None => resolution.unresolved.push(id),
            }
        }
        resolution
    }

    /// Whether every requested identifier resolved.
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Read-only lookup of points by identifier.
///
/// # Examples
///
/// ```rust
/// use storyroute_core::{PointResolver, StaticPointTable};
///
/// let table = StaticPointTable::builtin();
/// let resolution = table.resolve(&[3, 42, 1])?;
/// let ids: Vec<_> = resolution.points.iter().map(|p| p.id).collect();
/// assert_eq!(ids, vec![3, 1]);
/// assert_eq!(resolution.unresolved, vec![42]);
/// # Ok::<(), storyroute_core::ResolveError>(())
/// ```
pub trait PointResolver {
    /// Resolve `ids`, omitting unknown identifiers from `points`.
    ///
    /// Implementations must return `Err(ResolveError::EmptyInput)` when `ids`
    /// is empty.
    fn resolve(&self, ids: &[u64]) -> Result<Resolution, ResolveError>;
}

/// Small in-memory table of points.
#[derive(Debug, Clone, Default)]
pub struct StaticPointTable {
    points: HashMap<u64, Point>,
}

impl StaticPointTable {
    /// Create a table from a collection of points.
    pub fn with_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Point>,
    {
        Self {
            points: points.into_iter().map(|point| (point.id, point)).collect(),
        }
    }

    /// The built-in table used when no backing store is reachable.
    pub fn builtin() -> Self {
        Self::with_points([
            Point::new(1, "中共一大会址", Coord { x: 121.4752, y: 31.2204 })
                .with_address("上海市黄浦区兴业路76号")
                .with_period("建党初期", 1921)
                .with_story_points(["初心教育", "建党会议场景"]),
            Point::new(2, "南湖红船", Coord { x: 120.7551, y: 30.7566 })
                .with_address("浙江省嘉兴市南湖区")
                .with_period("建党初期", 1921)
                .with_story_points(["红船精神", "水上课堂"]),
            Point::new(3, "井冈山革命博物馆", Coord { x: 114.1732, y: 26.5720 })
                .with_address("江西省吉安市井冈山市")
                .with_period("土地革命", 1927)
                .with_story_points(["井冈山斗争", "革命根据地"]),
            Point::new(4, "延安革命纪念馆", Coord { x: 109.4898, y: 36.5965 })
                .with_address("陕西省延安市宝塔区")
                .with_period("抗日战争", 1935)
                .with_story_points(["延安精神", "窑洞课堂"]),
        ])
    }

    /// Number of points in the table.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the table holds no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl PointResolver for StaticPointTable {
    fn resolve(&self, ids: &[u64]) -> Result<Resolution, ResolveError> {
        if ids.is_empty() {
            return Err(ResolveError::EmptyInput);
        }
        Ok(Resolution::from_lookup(ids, |id| self.points.get(&id).cloned()))
    }
}

/// Resolver that answers from a static table whenever the primary store is
/// absent or unavailable.
///
/// Identifiers the primary store does not know are not looked up in the
/// table; the table only stands in for a store that cannot be read.
#[derive(Debug)]
pub struct FallbackResolver<P> {
    primary: Option<P>,
    fallback: StaticPointTable,
}

impl<P: PointResolver> FallbackResolver<P> {
    /// Wrap `primary` with the built-in fallback table.
    pub fn new(primary: Option<P>) -> Self {
        Self::with_fallback(primary, StaticPointTable::builtin())
    }

    /// Wrap `primary` with an explicit fallback table.
    pub const fn with_fallback(primary: Option<P>, fallback: StaticPointTable) -> Self {
        Self { primary, fallback }
    }
}

impl<P: PointResolver> PointResolver for FallbackResolver<P> {
    fn resolve(&self, ids: &[u64]) -> Result<Resolution, ResolveError> {
        if ids.is_empty() {
            return Err(ResolveError::EmptyInput);
        }
        let Some(primary) = &self.primary else {
            log::debug!("no point store configured; resolving from fallback table");
            return self.fallback.resolve(ids);
        };
        match primary.resolve(ids) {
            Err(ResolveError::StoreUnavailable { message }) => {
                log::warn!("point store unavailable ({message}); resolving from fallback table");
                self.fallback.resolve(ids)
            }
            other => other,
        }
    }
}

impl<P: PointResolver + ?Sized> PointResolver for &P {
    fn resolve(&self, ids: &[u64]) -> Result<Resolution, ResolveError> {
        (**self).resolve(ids)
    }
}

impl<P: PointResolver + ?Sized> PointResolver for Box<P> {
    fn resolve(&self, ids: &[u64]) -> Result<Resolution, ResolveError> {
        (**self).resolve(ids)
    }
}
