//! Filter parameters shared by every point query.
//!
//! Both types are `Hash + Eq` so callers can key memoised results on them
//! (see [`QueryCache`](crate::cache::QueryCache)).

use chrono::{DateTime, Utc};

use crate::lap::Lap;

/// Date bounds and downsampling for a single activity's points.
///
/// Bounds are inclusive. A missing bound is unbounded on that side.
/// A step of `None`, `0` or `1` keeps every point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PointFilter {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub step: Option<usize>,
}

impl PointFilter {
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        self.start.map_or(true, |s| timestamp >= s) && self.end.map_or(true, |e| timestamp <= e)
    }

    /// Step actually applied when downsampling.
    pub fn effective_step(&self) -> usize {
        self.step.unwrap_or(1).max(1)
    }
}

/// Event-wide query: a [`PointFilter`] plus an optional activity subset.
///
/// With no subset every activity of the event is traversed, in insertion
/// order. With a subset the ids are traversed in the order given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct EventQuery {
    pub filter: PointFilter,
    pub activities: Option<Vec<String>>,
}

impl EventQuery {
    /// Everything: all activities, no bounds, no downsampling.
    pub fn all() -> Self {
        Self::default()
    }

    /// Covering range of a lap.
    pub fn for_lap(lap: &Lap) -> Self {
        Self::all().between(lap.start_date(), lap.end_date())
    }

    pub fn since(mut self, start: DateTime<Utc>) -> Self {
        self.filter.start = Some(start);
        self
    }

    pub fn until(mut self, end: DateTime<Utc>) -> Self {
        self.filter.end = Some(end);
        self
    }

    pub fn between(self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.since(start).until(end)
    }

    pub fn step(mut self, step: usize) -> Self {
        self.filter.step = Some(step);
        self
    }

    /// Restrict to these activity ids.
    pub fn activities<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.activities = Some(ids.into_iter().map(Into::into).collect());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lap::LapType;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_500_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_unbounded_contains_everything() {
        let filter = PointFilter::default();
        assert!(filter.contains(at(-1_000_000)));
        assert!(filter.contains(at(1_000_000)));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let filter = EventQuery::all().between(at(10), at(20)).filter;
        assert!(filter.contains(at(10)));
        assert!(filter.contains(at(20)));
        assert!(!filter.contains(at(9)));
        assert!(!filter.contains(at(21)));
    }

    #[test]
    fn test_effective_step() {
        assert_eq!(PointFilter::default().effective_step(), 1);
        assert_eq!(EventQuery::all().step(0).filter.effective_step(), 1);
        assert_eq!(EventQuery::all().step(5).filter.effective_step(), 5);
    }

    #[test]
    fn test_open_ended_bounds() {
        let since = EventQuery::all().since(at(10)).filter;
        assert_eq!(since.start, Some(at(10)));
        assert_eq!(since.end, None);
        assert!(since.contains(at(1_000_000)));

        let until = EventQuery::all().until(at(10)).filter;
        assert_eq!(until.start, None);
        assert!(!until.contains(at(11)));
    }

    #[test]
    fn test_for_lap() {
        let lap = Lap::new(LapType::Manual, at(5), at(65)).unwrap();
        let query = EventQuery::for_lap(&lap).activities(["ride"]);
        assert_eq!(query.filter.start, Some(at(5)));
        assert_eq!(query.filter.end, Some(at(65)));
        assert_eq!(query.activities, Some(vec!["ride".to_string()]));
    }
}
