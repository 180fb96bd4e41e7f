//! Transport modes and ordering strategies.
//!
//! Both enums parse leniently from request strings: input is trimmed and
//! compared case-insensitively, and unrecognised values fall back to the
//! default variant instead of failing.

use std::fmt;

/// Travel modality controlling which provider endpoint serves a leg.
///
/// # Examples
/// ```
/// use storyroute_core::TransportMode;
///
/// assert_eq!(TransportMode::parse(" Walking "), TransportMode::Walking);
/// assert_eq!(TransportMode::parse("cycling"), TransportMode::Driving);
/// assert_eq!(TransportMode::parse(""), TransportMode::Driving);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TransportMode {
    /// Car routing.
    #[default]
    Driving,
    /// Pedestrian routing.
    Walking,
    /// Public transport combined with walking.
    Transit,
}

impl TransportMode {
    /// Parse a mode name, treating anything unrecognised as driving.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "walking" => Self::Walking,
            "transit" => Self::Transit,
            _ => Self::Driving,
        }
    }

    /// Canonical lower-case name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Driving => "driving",
            Self::Walking => "walking",
            Self::Transit => "transit",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordering policy applied to resolved points before legs are requested.
///
/// # Examples
/// ```
/// use storyroute_core::Strategy;
///
/// assert_eq!(Strategy::parse("SHORTEST"), Strategy::Shortest);
/// assert_eq!(Strategy::parse("history_first"), Strategy::Chronological);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Strategy {
    /// Stable sort by start year, undated points last.
    #[default]
    Chronological,
    /// Keep the resolution order; the caller has already ordered by proximity.
    Shortest,
}

impl Strategy {
    /// Name accepted for the default chronological strategy.
    pub const DEFAULT_NAME: &'static str = "history_first";

    /// Parse a strategy name. Only `shortest` selects pass-through ordering.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("shortest") {
            Self::Shortest
        } else {
            Self::Chronological
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chronological => f.write_str(Self::DEFAULT_NAME),
            Self::Shortest => f.write_str("shortest"),
        }
    }
}
