//! Optional timing hook for event queries.
//!
//! Queries never read the clock on their own. Attach an observer to an
//! [`Event`](crate::Event) to receive one callback per query.

use std::time::Duration;

use log::debug;

/// Receives the outcome of each event query.
pub trait QueryObserver: Send + Sync {
    /// `operation` is the query name (e.g. `"get_points"`), `point_count`
    /// the number of points it traversed.
    fn on_query(&self, operation: &'static str, point_count: usize, elapsed: Duration);
}

/// Forwards query timings to the `log` facade at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl QueryObserver for LogObserver {
    fn on_query(&self, operation: &'static str, point_count: usize, elapsed: Duration) {
        debug!(
            "[Event] {} over {} points in {:.3}ms",
            operation,
            point_count,
            elapsed.as_secs_f64() * 1000.0
        );
    }
}
