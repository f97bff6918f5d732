//! Tunables for the aggregation routines and the map view assembly.
//!
//! All configs deserialize with `#[serde(default)]`, so a partial JSON
//! document fills the missing fields from [`Default`].

use serde::{Deserialize, Serialize};

/// Configuration for noise-filtered gain/loss accumulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GainConfig {
    /// Decimal places each reading is rounded to before comparison.
    /// Default: 1
    pub precision: u32,

    /// Minimum change between baseline and reading to count as movement.
    /// Changes at or below this are treated as sensor noise.
    /// Default: 1.5
    pub min_diff: f64,
}

impl Default for GainConfig {
    fn default() -> Self {
        Self {
            precision: 1,
            min_diff: 1.5,
        }
    }
}

/// Configuration for the synthetic interpolated point view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpolationConfig {
    /// Spacing of synthetic points in seconds. Values below 1 are clamped to 1.
    /// Default: 1
    pub interval_seconds: i64,
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 1,
        }
    }
}

/// Display toggles driving [`build_map_data`](crate::map::build_map_data).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Include automatic laps. Default: true
    pub show_auto_laps: bool,
    /// Include manual laps. Default: false
    pub show_manual_laps: bool,
    /// Use the interpolated point view instead of the recorded points.
    /// Default: false
    pub show_interpolated: bool,
    /// Collect points with poor satellite reception. Default: false
    pub show_data_warnings: bool,
    /// Satellite count below which a point is flagged. Default: 7
    pub min_satellites: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            show_auto_laps: true,
            show_manual_laps: false,
            show_interpolated: false,
            show_data_warnings: false,
            min_satellites: 7,
        }
    }
}

/// Configuration for [`QueryCache`](crate::cache::QueryCache).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum cached entries before the least recently used is evicted.
    /// Default: 32
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { capacity: 32 }
    }
}
