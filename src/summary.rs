//! Precomputed aggregate snapshot attached to an [`Event`] once after import.

use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use crate::analytics;
use crate::config::GainConfig;
use crate::data::DataType;
use crate::event::Event;
use crate::query::EventQuery;

/// Event-wide statistics. `None` fields mean the event has no such data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSummary {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub activity_count: usize,
    pub point_count: usize,
    /// Meters along all positioned points
    pub distance_meters: f64,
    /// Sum of activity durations
    pub total_duration_seconds: f64,
    /// Noise-filtered altitude gain in meters
    pub ascent: f64,
    /// Noise-filtered altitude loss in meters
    pub descent: f64,
    pub avg_heart_rate: Option<f64>,
    pub max_heart_rate: Option<f64>,
    pub avg_cadence: Option<f64>,
    pub avg_speed: Option<f64>,
    pub avg_power: Option<f64>,
    pub max_power: Option<f64>,
}

impl EventSummary {
    /// Derive the summary from one full traversal of the event.
    pub fn compute(event: &Event, gain_config: &GainConfig) -> Self {
        let points = event.get_points(&EventQuery::all());
        let positioned: Vec<_> = points.iter().copied().filter(|p| p.has_position()).collect();
        let altitude = analytics::data_type_gain_loss(&points, DataType::Altitude, gain_config);

        let summary = Self {
            start_date: event.get_first_activity().and_then(|a| a.start_date()),
            end_date: event.activities().iter().filter_map(|a| a.end_date()).max(),
            activity_count: event.activities().len(),
            point_count: points.len(),
            distance_meters: event.geodesy().get_distance_of_points(&positioned),
            total_duration_seconds: event.get_total_duration_in_seconds(),
            ascent: altitude.gain,
            descent: altitude.loss,
            avg_heart_rate: analytics::data_type_average(&points, DataType::HeartRate),
            max_heart_rate: analytics::data_type_max(&points, DataType::HeartRate),
            avg_cadence: analytics::data_type_average(&points, DataType::Cadence),
            avg_speed: analytics::data_type_average(&points, DataType::Speed),
            avg_power: analytics::data_type_average(&points, DataType::Power),
            max_power: analytics::data_type_max(&points, DataType::Power),
        };

        info!(
            "[Summary] {}: {} points, {:.0}m, +{:.1}m/-{:.1}m",
            event.id(),
            summary.point_count,
            summary.distance_meters,
            summary.ascent,
            summary.descent
        );
        summary
    }
}
