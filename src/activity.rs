//! A single continuous recording: chronologically ordered points plus laps.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::config::InterpolationConfig;
use crate::data::DataValue;
use crate::error::{Result, TimelineError};
use crate::lap::Lap;
use crate::point::Point;
use crate::query::PointFilter;

/// One recorded session.
///
/// Points are append-only and kept in non-decreasing timestamp order, which
/// lets date-bounded queries binary search instead of scanning.
#[derive(Debug, Clone, Serialize)]
pub struct Activity {
    id: String,
    points: Vec<Point>,
    laps: Vec<Lap>,
}

impl Activity {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            points: Vec::new(),
            laps: Vec::new(),
        }
    }

    /// Build an activity from already ordered points.
    pub fn from_points(id: impl Into<String>, points: Vec<Point>) -> Result<Self> {
        let mut activity = Self::new(id);
        activity.points.reserve(points.len());
        for point in points {
            activity.add_point(point)?;
        }
        Ok(activity)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Append a point. Equal timestamps are accepted, earlier ones are not.
    pub fn add_point(&mut self, point: Point) -> Result<()> {
        if let Some(last) = self.points.last() {
            if point.timestamp() < last.timestamp() {
                return Err(TimelineError::PointOutOfOrder {
                    activity_id: self.id.clone(),
                    previous: last.timestamp(),
                    timestamp: point.timestamp(),
                });
            }
        }
        self.points.push(point);
        Ok(())
    }

    pub fn add_lap(&mut self, lap: Lap) {
        self.laps.push(lap);
    }

    pub fn laps(&self) -> &[Lap] {
        &self.laps
    }

    /// Every recorded point, in order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn start_date(&self) -> Option<DateTime<Utc>> {
        self.points.first().map(Point::timestamp)
    }

    pub fn end_date(&self) -> Option<DateTime<Utc>> {
        self.points.last().map(Point::timestamp)
    }

    /// Wall-clock span of this activity's points. Zero when empty.
    pub fn duration_seconds(&self) -> f64 {
        match (self.start_date(), self.end_date()) {
            (Some(start), Some(end)) => (end - start).num_milliseconds() as f64 / 1000.0,
            _ => 0.0,
        }
    }

    /// Contiguous run of points inside the filter's date bounds.
    ///
    /// Ignores the step. O(log n) to locate.
    pub fn points_in_range(&self, filter: &PointFilter) -> &[Point] {
        let lo = filter
            .start
            .map(|s| self.points.partition_point(|p| p.timestamp() < s))
            .unwrap_or(0);
        let hi = filter
            .end
            .map(|e| self.points.partition_point(|p| p.timestamp() <= e))
            .unwrap_or(self.points.len());
        if lo >= hi {
            return &[];
        }
        &self.points[lo..hi]
    }

    /// Points inside the filter's bounds, keeping every `step`-th one.
    pub fn get_points(&self, filter: &PointFilter) -> Vec<&Point> {
        self.points_in_range(filter)
            .iter()
            .step_by(filter.effective_step())
            .collect()
    }

    /// Denser synthetic view of the recording.
    ///
    /// Between consecutive real points a synthetic point is placed every
    /// `interval_seconds`. Numeric types present on both neighbours are
    /// linearly interpolated. Everything else, positions included, is copied
    /// from the nearer real neighbour so no geodesic path is invented across
    /// a gap. The owned points are never modified.
    ///
    /// An interval too large to represent yields only the recorded points.
    pub fn get_points_interpolated(&self, config: &InterpolationConfig) -> Vec<Point> {
        let interval = match Duration::try_seconds(config.interval_seconds.max(1)) {
            Some(interval) if self.points.len() >= 2 => interval,
            _ => return self.points.clone(),
        };
        let mut interpolated = Vec::with_capacity(self.points.len());

        for pair in self.points.windows(2) {
            let (previous, next) = (&pair[0], &pair[1]);
            interpolated.push(previous.clone());

            let mut cursor = previous.timestamp().checked_add_signed(interval);
            while let Some(timestamp) = cursor.filter(|t| *t < next.timestamp()) {
                interpolated.push(interpolate_between(previous, next, timestamp));
                cursor = timestamp.checked_add_signed(interval);
            }
        }
        if let Some(last) = self.points.last() {
            interpolated.push(last.clone());
        }

        interpolated
    }
}

/// Synthetic point at `timestamp`, strictly between `previous` and `next`.
fn interpolate_between(previous: &Point, next: &Point, timestamp: DateTime<Utc>) -> Point {
    let span = (next.timestamp() - previous.timestamp()).num_milliseconds() as f64;
    let ratio = if span > 0.0 {
        (timestamp - previous.timestamp()).num_milliseconds() as f64 / span
    } else {
        0.0
    };
    let nearest = if ratio < 0.5 { previous } else { next };

    let data_types: BTreeSet<_> = previous
        .data()
        .keys()
        .chain(next.data().keys())
        .copied()
        .collect();

    let mut point = Point::new(timestamp);
    for data_type in data_types {
        let endpoints = (
            previous.data_type_average(data_type),
            next.data_type_average(data_type),
        );
        if let (Some(a), Some(b)) = endpoints {
            if let Ok(value) = DataValue::numeric(data_type, a + (b - a) * ratio) {
                point.add_data(value);
                continue;
            }
        }
        for value in nearest.data_by_type(data_type) {
            point.add_data(*value);
        }
    }
    point
}
