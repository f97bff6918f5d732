//! Unified error handling for the activity-timeline library.
//!
//! Errors only arise while an [`Event`](crate::Event) graph is being built.
//! Queries over a built graph are total and report missing data as empty
//! results or `None`, never as an error.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::DataType;

/// Unified error type for activity-timeline operations.
#[derive(Debug, Error)]
pub enum TimelineError {
    /// A point was appended with a timestamp earlier than the previous point
    #[error("Activity '{activity_id}' received point at {timestamp} before previous {previous}")]
    PointOutOfOrder {
        activity_id: String,
        previous: DateTime<Utc>,
        timestamp: DateTime<Utc>,
    },

    /// A lap ends before it starts
    #[error("Lap ends at {end} before it starts at {start}")]
    InvalidLapRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// A numeric reading was requested for a type that is not numeric
    #[error("Data type '{data_type}' does not carry a numeric value")]
    NotNumeric { data_type: DataType },

    /// A data type key did not match any known sensor kind
    #[error("Unknown data type '{key}'")]
    UnknownDataType { key: String },

    /// An activity with this id is already part of the event
    #[error("Activity '{activity_id}' already exists in event")]
    DuplicateActivity { activity_id: String },

    /// No activity with this id is part of the event
    #[error("Activity '{activity_id}' not found in event")]
    ActivityNotFound { activity_id: String },

    /// The event summary is write-once
    #[error("Summary for event '{event_id}' is already set")]
    SummaryAlreadySet { event_id: String },

    /// JSON export failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for activity-timeline operations.
pub type Result<T> = std::result::Result<T, TimelineError>;

/// Extension trait for converting Option to TimelineError.
pub trait OptionExt<T> {
    /// Convert Option to Result with an activity-not-found error.
    fn ok_or_activity_not_found(self, activity_id: &str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_activity_not_found(self, activity_id: &str) -> Result<T> {
        self.ok_or_else(|| TimelineError::ActivityNotFound {
            activity_id: activity_id.to_string(),
        })
    }
}
