//! Court data structures: quality tiers, features, and availability windows.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a court.
pub type CourtId = Uuid;

/// Court quality tier, ordered best-first.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourtQuality {
    Championship,
    Primary,
    Secondary,
    Practice,
}

/// Feature flags that matter for high-importance matches.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct CourtFeatures {
    pub scoreboard: bool,
    pub video_board: bool,
    pub capacity: u32,
    pub air_conditioning: bool,
    pub excellent_lighting: bool,
}

/// A half-open time interval [start, end).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// True when the two half-open intervals intersect.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// True when the interval contains the given instant.
    pub fn contains(&self, t: NaiveDateTime) -> bool {
        self.start <= t && t < self.end
    }
}

/// Date-scoped window during which a court may host games.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl AvailabilityWindow {
    /// True when [start, end) on `date` covers the given interval.
    pub fn covers(&self, window: &TimeWindow) -> bool {
        let open = self.date.and_time(self.start);
        let close = self.date.and_time(self.end);
        open <= window.start && window.end <= close
    }
}

/// A physical court with quality, priority, and availability data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Court {
    pub id: CourtId,
    pub name: String,
    pub quality: CourtQuality,
    /// Desirability rank, lower = more desirable.
    pub priority: u32,
    pub features: CourtFeatures,
    pub active: bool,
    /// Declared availability; empty means always available.
    pub availability: Vec<AvailabilityWindow>,
    /// Already-booked intervals (external bookings).
    pub bookings: Vec<TimeWindow>,
}

impl Court {
    /// Create an active court with default features and no bookings.
    pub fn new(name: impl Into<String>, quality: CourtQuality, priority: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            quality,
            priority,
            features: CourtFeatures::default(),
            active: true,
            availability: Vec::new(),
            bookings: Vec::new(),
        }
    }

    /// True when the court can host a game over the given interval:
    /// active, inside a declared availability window (if any are declared),
    /// and not overlapping an existing booking.
    pub fn available_for(&self, window: &TimeWindow) -> bool {
        if !self.active {
            return false;
        }
        if !self.availability.is_empty() && !self.availability.iter().any(|a| a.covers(window)) {
            return false;
        }
        !self.bookings.iter().any(|b| b.overlaps(window))
    }
}
