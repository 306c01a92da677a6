//! # Grid Positions
//!
//! Converts clock times into vertical offsets on the day grid.
//!
//! A position is `minutes since local midnight × zoom`. The grid has no notion
//! of pixels or terminal rows; renderers divide positions by their own unit.

use chrono::{DateTime, TimeZone, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// How a fractional grid position becomes an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundingPolicy {
    /// Round half away from zero.
    #[default]
    Round,
    /// Drop the fractional part.
    Truncate,
}

impl RoundingPolicy {
    pub fn apply(self, value: f64) -> i64 {
        match self {
            RoundingPolicy::Round => value.round() as i64,
            RoundingPolicy::Truncate => value.trunc() as i64,
        }
    }
}

impl fmt::Display for RoundingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundingPolicy::Round => write!(f, "round"),
            RoundingPolicy::Truncate => write!(f, "truncate"),
        }
    }
}

impl FromStr for RoundingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "round" => Ok(RoundingPolicy::Round),
            "truncate" | "trunc" => Ok(RoundingPolicy::Truncate),
            other => Err(format!(
                "unknown rounding policy '{}' (expected 'round' or 'truncate')",
                other
            )),
        }
    }
}

/// Minutes elapsed since midnight in the timestamp's own time zone.
///
/// Seconds are ignored, so every instant within a minute maps to the same value.
pub fn minutes_since_midnight<Tz: TimeZone>(time: &DateTime<Tz>) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Vertical grid position of `time` at the given zoom.
pub fn calculate_grid_position<Tz: TimeZone>(
    time: &DateTime<Tz>,
    zoom_level: f64,
    rounding: RoundingPolicy,
) -> i64 {
    rounding.apply(f64::from(minutes_since_midnight(time)) * zoom_level)
}

/// Zoom multiplier and rounding policy, bundled so callers pick them once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridScale {
    pub zoom: f64,
    pub rounding: RoundingPolicy,
}

impl GridScale {
    pub fn new(zoom: f64, rounding: RoundingPolicy) -> Self {
        Self { zoom, rounding }
    }

    pub fn position<Tz: TimeZone>(&self, time: &DateTime<Tz>) -> i64 {
        calculate_grid_position(time, self.zoom, self.rounding)
    }

    /// Position of the following midnight, i.e. the height of the whole day.
    pub fn day_end(&self) -> i64 {
        self.rounding.apply(f64::from(MINUTES_PER_DAY) * self.zoom)
    }
}

impl Default for GridScale {
    fn default() -> Self {
        Self::new(ZoomLevel::default().value(), RoundingPolicy::default())
    }
}

/// A vertical `[start, end)` span on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSpan {
    pub start: i64,
    pub end: i64,
}

impl GridSpan {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Half-open overlap: spans that only touch at an endpoint do not overlap.
    pub fn overlaps(&self, other: &GridSpan) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Smallest span covering both.
    pub fn union(&self, other: &GridSpan) -> GridSpan {
        GridSpan::new(self.start.min(other.start), self.end.max(other.end))
    }

    pub fn len(&self) -> i64 {
        (self.end - self.start).max(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Renders as `start / end`, the CSS `grid-row` shorthand.
impl fmt::Display for GridSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.start, self.end)
    }
}

/// User-selectable zoom: 1x to 4x in half steps.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct ZoomLevel(f64);

impl ZoomLevel {
    pub const MIN: f64 = 1.0;
    pub const MAX: f64 = 4.0;
    pub const STEP: f64 = 0.5;

    /// Snap `value` to the nearest step inside the supported range.
    pub fn new(value: f64) -> Self {
        if !value.is_finite() {
            return Self::default();
        }
        let snapped = (value / Self::STEP).round() * Self::STEP;
        Self(snapped.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn zoom_in(self) -> Self {
        Self::new(self.0 + Self::STEP)
    }

    pub fn zoom_out(self) -> Self {
        Self::new(self.0 - Self::STEP)
    }
}

impl Default for ZoomLevel {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl From<f64> for ZoomLevel {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<ZoomLevel> for f64 {
    fn from(value: ZoomLevel) -> Self {
        value.0
    }
}

impl fmt::Display for ZoomLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.0)
    }
}
