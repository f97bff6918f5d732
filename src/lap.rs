//! Laps: named time intervals within an activity or event.
//!
//! A lap holds no points. Its covering range is resolved on demand by
//! querying the owning [`Event`](crate::Event) with the lap's bounds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::MapConfig;
use crate::error::{Result, TimelineError};

/// How a lap was triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LapType {
    /// Split by the device (distance or time based)
    Automatic,
    /// Lap button pressed by the athlete
    Manual,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lap {
    lap_type: LapType,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
}

impl Lap {
    /// Create a lap. Fails if `end_date` precedes `start_date`.
    pub fn new(
        lap_type: LapType,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Result<Self> {
        if end_date < start_date {
            return Err(TimelineError::InvalidLapRange {
                start: start_date,
                end: end_date,
            });
        }
        Ok(Self {
            lap_type,
            start_date,
            end_date,
        })
    }

    pub fn lap_type(&self) -> LapType {
        self.lap_type
    }

    pub fn start_date(&self) -> DateTime<Utc> {
        self.start_date
    }

    pub fn end_date(&self) -> DateTime<Utc> {
        self.end_date
    }

    pub fn duration_seconds(&self) -> f64 {
        (self.end_date - self.start_date).num_milliseconds() as f64 / 1000.0
    }
}

/// Lap-kind toggle. Applied before range resolution so unwanted laps cost
/// nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LapFilter {
    pub show_auto_laps: bool,
    pub show_manual_laps: bool,
}

impl LapFilter {
    pub fn all() -> Self {
        Self {
            show_auto_laps: true,
            show_manual_laps: true,
        }
    }

    pub fn accepts(&self, lap: &Lap) -> bool {
        match lap.lap_type {
            LapType::Automatic => self.show_auto_laps,
            LapType::Manual => self.show_manual_laps,
        }
    }

    /// Keep the laps this filter accepts, preserving order.
    pub fn apply<'a>(&self, laps: &'a [Lap]) -> impl Iterator<Item = &'a Lap> + 'a {
        let filter = *self;
        laps.iter().filter(move |lap| filter.accepts(lap))
    }
}

impl From<&MapConfig> for LapFilter {
    fn from(config: &MapConfig) -> Self {
        Self {
            show_auto_laps: config.show_auto_laps,
            show_manual_laps: config.show_manual_laps,
        }
    }
}
