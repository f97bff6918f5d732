//! # Activity Timeline
//!
//! Time-series data model and aggregation engine for recorded sports
//! activities.
//!
//! This library provides:
//! - An owned Event → Activity → Point graph of typed sensor readings
//! - Date-range and activity-subset queries over tens of thousands of points
//! - Derived statistics: distance, noise-filtered gain/loss, averages, bounds
//! - Swappable geodesic distance strategies
//! - Map view assembly (tracks, lap markers, reception warnings)
//!
//! ## Features
//!
//! - **`parallel`** - Traverse activities in parallel with rayon
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use activity_timeline::{Activity, DataType, DataValue, Event, EventQuery, GainConfig, Point};
//! use chrono::{TimeZone, Utc};
//!
//! let points = (0..5)
//!     .map(|i| {
//!         Point::new(Utc.timestamp_opt(1_600_000_000 + i * 10, 0).unwrap())
//!             .with_data(DataValue::position(51.5074 + i as f64 * 0.001, -0.1278))
//!             .with_data(DataValue::Altitude(20.0 + i as f64 * 2.0))
//!     })
//!     .collect();
//!
//! let mut event = Event::new("morning-ride");
//! event.add_activity(Activity::from_points("ride", points).unwrap()).unwrap();
//!
//! let query = EventQuery::all();
//! let meters = event.get_distance_in_meters(&query);
//! let gain = event.get_data_type_gain(DataType::Altitude, &query, &GainConfig::default());
//! assert!(meters > 400.0);
//! assert_eq!(gain, 8.0);
//! ```

// Unified error handling
pub mod error;
pub use error::{OptionExt, Result, TimelineError};

// Tunables (gain thresholds, interpolation density, map toggles)
pub mod config;
pub use config::{CacheConfig, GainConfig, InterpolationConfig, MapConfig};

// Sensor readings
pub mod data;
pub use data::{DataType, DataValue, Position};

// Timestamped bags of readings
pub mod point;
pub use point::Point;

// Lap intervals and lap-kind filtering
pub mod lap;
pub use lap::{Lap, LapFilter, LapType};

// Query filters
pub mod query;
pub use query::{EventQuery, PointFilter};

// Single recorded session
pub mod activity;
pub use activity::Activity;

// Geodesic distance strategies
pub mod geodesy;
pub use geodesy::{GeodesicAdapter, GeodesyAdapter, HaversineAdapter};

// Stateless reductions over point sequences
pub mod analytics;
pub use analytics::{Bounds, GainLoss, SatellitePartition};

// Query timing hook
pub mod observer;
pub use observer::{LogObserver, QueryObserver};

// Aggregate root and cross-activity queries
pub mod event;
pub use event::{Event, ResolvedLap};

// Write-once event statistics
pub mod summary;
pub use summary::EventSummary;

// Map view assembly
pub mod map;
pub use map::{build_map_data, map_bounds, nearest_point_on_track, MapData};

// Call-site memoisation
pub mod cache;
pub use cache::{QueryCache, QueryKey};
