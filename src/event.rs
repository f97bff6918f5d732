//! # Event
//!
//! The aggregate root: a named set of activities plus event-level laps and
//! a write-once summary. Every cross-activity query goes through here.
//!
//! ## Ownership
//!
//! The event owns its activities, each activity owns its points and laps,
//! and nothing points back up. Queries that need event-wide context (such as
//! resolving a lap to points) run top-down from the event.
//!
//! ## Query contract
//!
//! Every query takes an [`EventQuery`] and is total: empty selections give
//! empty vectors, `0.0` meters, or `None` for averages. Results are
//! concatenated in activity order, then chronologically within each
//! activity. Unknown activity ids in a subset are skipped.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use log::info;
use serde::Serialize;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::activity::Activity;
use crate::analytics::{self, GainLoss};
use crate::config::GainConfig;
use crate::data::{DataType, DataValue};
use crate::error::{OptionExt, Result, TimelineError};
use crate::geodesy::{GeodesicAdapter, GeodesyAdapter};
use crate::lap::{Lap, LapFilter};
use crate::observer::QueryObserver;
use crate::point::Point;
use crate::query::{EventQuery, PointFilter};
use crate::summary::EventSummary;

/// A lap together with the positioned points it covers.
#[derive(Debug, Clone)]
pub struct ResolvedLap<'a> {
    pub lap: &'a Lap,
    /// Positioned points inside the lap bounds, never empty
    pub points: Vec<&'a Point>,
}

impl<'a> ResolvedLap<'a> {
    /// Last positioned point of the lap (where a lap marker goes).
    pub fn end_point(&self) -> Option<&'a Point> {
        self.points.last().copied()
    }
}

/// One loaded recording.
pub struct Event {
    id: String,
    name: String,
    activities: Vec<Activity>,
    laps: Vec<Lap>,
    summary: Option<EventSummary>,
    geodesy: Box<dyn GeodesyAdapter>,
    observer: Option<Arc<dyn QueryObserver>>,
}

impl Event {
    /// Create an empty event using the WGS84 [`GeodesicAdapter`].
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            activities: Vec::new(),
            laps: Vec::new(),
            summary: None,
            geodesy: Box::new(GeodesicAdapter),
            observer: None,
        }
    }

    /// Replace the distance strategy.
    pub fn with_geodesy(mut self, adapter: impl GeodesyAdapter + 'static) -> Self {
        self.geodesy = Box::new(adapter);
        self
    }

    /// Attach a query timing hook.
    pub fn with_observer(mut self, observer: Arc<dyn QueryObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn geodesy(&self) -> &dyn GeodesyAdapter {
        self.geodesy.as_ref()
    }

    // ========================================================================
    // Activities, laps, summary
    // ========================================================================

    /// Append an activity. Ids must be unique within the event.
    pub fn add_activity(&mut self, activity: Activity) -> Result<()> {
        if self.activity(activity.id()).is_some() {
            return Err(TimelineError::DuplicateActivity {
                activity_id: activity.id().to_string(),
            });
        }
        info!(
            "[Event] Adding activity {} ({} points, {} laps) to {}",
            activity.id(),
            activity.points().len(),
            activity.laps().len(),
            self.id
        );
        self.activities.push(activity);
        Ok(())
    }

    /// Remove an activity by id and hand it back.
    ///
    /// The activity list is rebuilt without it rather than edited in place.
    pub fn remove_activity(&mut self, activity_id: &str) -> Result<Activity> {
        let (removed, kept): (Vec<Activity>, Vec<Activity>) = std::mem::take(&mut self.activities)
            .into_iter()
            .partition(|a| a.id() == activity_id);
        self.activities = kept;

        let removed = removed.into_iter().next().ok_or_activity_not_found(activity_id)?;
        info!("[Event] Removed activity {} from {}", activity_id, self.id);
        Ok(removed)
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn activity(&self, activity_id: &str) -> Option<&Activity> {
        self.activities.iter().find(|a| a.id() == activity_id)
    }

    /// Activity with the earliest start date. Ties go to the one added first;
    /// activities without points lose to any with points.
    pub fn get_first_activity(&self) -> Option<&Activity> {
        self.activities
            .iter()
            .reduce(|a, b| match (a.start_date(), b.start_date()) {
                (Some(sa), Some(sb)) if sb < sa => b,
                (None, Some(_)) => b,
                _ => a,
            })
    }

    /// Activity with the latest start date. Ties go to the one added last;
    /// activities without points lose to any with points.
    pub fn get_last_activity(&self) -> Option<&Activity> {
        self.activities
            .iter()
            .reduce(|a, b| match (a.start_date(), b.start_date()) {
                (Some(sa), Some(sb)) if sb >= sa => b,
                (None, _) => b,
                _ => a,
            })
    }

    pub fn add_lap(&mut self, lap: Lap) {
        self.laps.push(lap);
    }

    /// Event-level laps (those spanning activities).
    pub fn laps(&self) -> &[Lap] {
        &self.laps
    }

    /// Attach the precomputed summary. Write-once.
    pub fn set_summary(&mut self, summary: EventSummary) -> Result<()> {
        if self.summary.is_some() {
            return Err(TimelineError::SummaryAlreadySet {
                event_id: self.id.clone(),
            });
        }
        info!("[Event] Summary set for {}", self.id);
        self.summary = Some(summary);
        Ok(())
    }

    pub fn summary(&self) -> Option<&EventSummary> {
        self.summary.as_ref()
    }

    // ========================================================================
    // Point queries
    // ========================================================================

    fn selected_activities(&self, query: &EventQuery) -> Vec<&Activity> {
        match &query.activities {
            None => self.activities.iter().collect(),
            Some(ids) => ids.iter().filter_map(|id| self.activity(id)).collect(),
        }
    }

    /// Filtered points without observer reporting, for internal reuse.
    fn collect_points(&self, query: &EventQuery) -> Vec<&Point> {
        concat_activity_points(&self.selected_activities(query), &query.filter)
    }

    fn collect_points_with_position(&self, query: &EventQuery) -> Vec<&Point> {
        let mut points = self.collect_points(query);
        points.retain(|p| p.has_position());
        points
    }

    fn observe<T>(&self, operation: &'static str, run: impl FnOnce() -> (T, usize)) -> T {
        match &self.observer {
            None => run().0,
            Some(observer) => {
                let start = Instant::now();
                let (value, point_count) = run();
                observer.on_query(operation, point_count, start.elapsed());
                value
            }
        }
    }

    /// Points of the selected activities inside the query bounds.
    pub fn get_points(&self, query: &EventQuery) -> Vec<&Point> {
        self.observe("get_points", || {
            let points = self.collect_points(query);
            let count = points.len();
            (points, count)
        })
    }

    /// Like [`Event::get_points`], keeping only points with a position.
    pub fn get_points_with_position(&self, query: &EventQuery) -> Vec<&Point> {
        self.observe("get_points_with_position", || {
            let points = self.collect_points_with_position(query);
            let count = points.len();
            (points, count)
        })
    }

    /// Every reading of the filtered points, grouped by type in point order.
    pub fn get_data(&self, query: &EventQuery) -> BTreeMap<DataType, Vec<&DataValue>> {
        self.observe("get_data", || {
            let points = self.collect_points(query);
            let mut data: BTreeMap<DataType, Vec<&DataValue>> = BTreeMap::new();
            for point in points.iter().copied() {
                for (data_type, values) in point.data() {
                    data.entry(*data_type).or_default().extend(values.iter());
                }
            }
            (data, points.len())
        })
    }

    /// Readings of one type across the filtered points, in point order.
    pub fn get_data_by_type(&self, data_type: DataType, query: &EventQuery) -> Vec<&DataValue> {
        self.observe("get_data_by_type", || {
            let points = self.collect_points(query);
            let data = points
                .iter()
                .copied()
                .flat_map(|p| p.data_by_type(data_type))
                .collect();
            (data, points.len())
        })
    }

    // ========================================================================
    // Derived statistics
    // ========================================================================

    /// Mean of per-point averages. `None` when no filtered point has the type.
    pub fn get_data_type_average(&self, data_type: DataType, query: &EventQuery) -> Option<f64> {
        self.observe("get_data_type_average", || {
            let points = self.collect_points(query);
            (analytics::data_type_average(&points, data_type), points.len())
        })
    }

    pub fn get_data_type_gain_loss(
        &self,
        data_type: DataType,
        query: &EventQuery,
        config: &GainConfig,
    ) -> GainLoss {
        self.observe("get_data_type_gain_loss", || {
            let points = self.collect_points(query);
            (
                analytics::data_type_gain_loss(&points, data_type, config),
                points.len(),
            )
        })
    }

    /// Noise-filtered cumulative increase. See [`analytics::data_type_gain_loss`].
    pub fn get_data_type_gain(
        &self,
        data_type: DataType,
        query: &EventQuery,
        config: &GainConfig,
    ) -> f64 {
        self.get_data_type_gain_loss(data_type, query, config).gain
    }

    /// Noise-filtered cumulative decrease, as a positive number.
    pub fn get_data_type_loss(
        &self,
        data_type: DataType,
        query: &EventQuery,
        config: &GainConfig,
    ) -> f64 {
        self.get_data_type_gain_loss(data_type, query, config).loss
    }

    /// Track length over the positioned filtered points.
    pub fn get_distance_in_meters(&self, query: &EventQuery) -> f64 {
        self.observe("get_distance_in_meters", || {
            let points = self.collect_points_with_position(query);
            (self.geodesy.get_distance_of_points(&points), points.len())
        })
    }

    /// Sum of each activity's own duration. Overlapping activities are
    /// counted in full.
    pub fn get_total_duration_in_seconds(&self) -> f64 {
        self.activities.iter().map(Activity::duration_seconds).sum()
    }

    // ========================================================================
    // Laps
    // ========================================================================

    /// Positioned points covered by a lap, optionally within some activities.
    pub fn get_lap_points(&self, lap: &Lap, activities: Option<&[String]>) -> Vec<&Point> {
        let mut query = EventQuery::for_lap(lap);
        query.activities = activities.map(<[String]>::to_vec);
        self.collect_points_with_position(&query)
    }

    /// Resolve laps to their positioned points.
    ///
    /// Laps rejected by `filter` are dropped before any point lookup; laps
    /// covering no positioned point are dropped after.
    pub fn resolve_laps<'a>(
        &'a self,
        laps: &'a [Lap],
        filter: &LapFilter,
        activities: Option<&[String]>,
    ) -> Vec<ResolvedLap<'a>> {
        filter
            .apply(laps)
            .filter_map(|lap| {
                let points = self.get_lap_points(lap, activities);
                if points.is_empty() {
                    None
                } else {
                    Some(ResolvedLap { lap, points })
                }
            })
            .collect()
    }

    // ========================================================================
    // Export
    // ========================================================================

    /// JSON snapshot of the event: id, name, activities, laps and summary.
    pub fn to_json(&self) -> Result<String> {
        #[derive(Serialize)]
        struct EventJson<'a> {
            id: &'a str,
            name: &'a str,
            activities: &'a [Activity],
            laps: &'a [Lap],
            summary: Option<&'a EventSummary>,
        }

        Ok(serde_json::to_string(&EventJson {
            id: &self.id,
            name: &self.name,
            activities: &self.activities,
            laps: &self.laps,
            summary: self.summary.as_ref(),
        })?)
    }
}

/// Per-activity points concatenated in activity order.
#[cfg(feature = "parallel")]
fn concat_activity_points<'a>(activities: &[&'a Activity], filter: &PointFilter) -> Vec<&'a Point> {
    let per_activity: Vec<Vec<&'a Point>> = activities
        .par_iter()
        .map(|a| a.get_points(filter))
        .collect();
    per_activity.concat()
}

/// Per-activity points concatenated in activity order.
#[cfg(not(feature = "parallel"))]
fn concat_activity_points<'a>(activities: &[&'a Activity], filter: &PointFilter) -> Vec<&'a Point> {
    activities
        .iter()
        .flat_map(|a| a.get_points(filter))
        .collect()
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("activities", &self.activities.len())
            .field("laps", &self.laps.len())
            .field("summary", &self.summary.is_some())
            .field("geodesy", &self.geodesy)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
