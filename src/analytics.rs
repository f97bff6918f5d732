//! Stateless reductions over point sequences.
//!
//! Every routine here takes the points an [`Event`](crate::Event) or
//! [`Activity`](crate::Activity) query returned and is defined for every
//! input, including the empty one.
//!
//! ## Missing data convention
//!
//! "No data" is `None`, never `0.0`. A point whose reading is a genuine
//! zero takes part in averages; a point without the reading does not.

use serde::{Deserialize, Serialize};

use crate::config::GainConfig;
use crate::data::DataType;
use crate::point::Point;

/// Mean of each point's own average for `data_type`, skipping points that
/// lack it. `None` when no point carries the type.
pub fn data_type_average(points: &[&Point], data_type: DataType) -> Option<f64> {
    let (sum, count) = points
        .iter()
        .filter_map(|p| p.data_type_average(data_type))
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Lowest per-point average for `data_type`.
pub fn data_type_min(points: &[&Point], data_type: DataType) -> Option<f64> {
    points
        .iter()
        .filter_map(|p| p.data_type_average(data_type))
        .reduce(f64::min)
}

/// Highest per-point average for `data_type`.
pub fn data_type_max(points: &[&Point], data_type: DataType) -> Option<f64> {
    points
        .iter()
        .filter_map(|p| p.data_type_average(data_type))
        .reduce(f64::max)
}

/// Cumulative positive and negative change of one data type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GainLoss {
    pub gain: f64,
    pub loss: f64,
}

/// Highest precision `round_to` honours; f64 carries about 15 significant
/// decimal digits.
const MAX_PRECISION: u32 = 15;

/// Round to `precision` decimal places, capped at 15.
pub fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision.min(MAX_PRECISION) as i32);
    (value * factor).round() / factor
}

/// Noise-filtered gain and loss in one pass.
///
/// Readings are rounded to `config.precision`. A reading only counts once
/// it moves more than `config.min_diff` away from the baseline; it then
/// adds to gain or loss and becomes the new baseline. Sub-threshold moves
/// leave the baseline untouched, and points lacking the type are skipped
/// without touching it either.
pub fn data_type_gain_loss(
    points: &[&Point],
    data_type: DataType,
    config: &GainConfig,
) -> GainLoss {
    let mut totals = GainLoss::default();
    let mut baseline: Option<f64> = None;

    let readings = points
        .iter()
        .filter_map(|p| p.data_type_average(data_type))
        .map(|v| round_to(v, config.precision));

    for value in readings {
        let Some(previous) = baseline else {
            baseline = Some(value);
            continue;
        };
        if value > previous + config.min_diff {
            totals.gain += value - previous;
            baseline = Some(value);
        } else if value < previous - config.min_diff {
            totals.loss += previous - value;
            baseline = Some(value);
        }
    }

    totals
}

pub fn data_type_gain(points: &[&Point], data_type: DataType, config: &GainConfig) -> f64 {
    data_type_gain_loss(points, data_type, config).gain
}

pub fn data_type_loss(points: &[&Point], data_type: DataType, config: &GainConfig) -> f64 {
    data_type_gain_loss(points, data_type, config).loss
}

/// Smallest lat/long rectangle containing every position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl Bounds {
    /// Bounds of the positioned points. A zero-sized box at the origin when
    /// none have a position.
    pub fn from_points(points: &[&Point]) -> Self {
        let mut positions = points.iter().filter_map(|p| p.position());
        let Some(first) = positions.next() else {
            return Self::default();
        };

        let mut bounds = Self {
            north: first.latitude,
            south: first.latitude,
            east: first.longitude,
            west: first.longitude,
        };
        for p in positions {
            bounds.north = bounds.north.max(p.latitude);
            bounds.south = bounds.south.min(p.latitude);
            bounds.east = bounds.east.max(p.longitude);
            bounds.west = bounds.west.min(p.longitude);
        }
        bounds
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Center as (latitude, longitude).
    pub fn center(&self) -> (f64, f64) {
        (
            (self.north + self.south) / 2.0,
            (self.east + self.west) / 2.0,
        )
    }
}

/// Points split by satellite reception.
#[derive(Debug, Clone, Default)]
pub struct SatellitePartition<'a> {
    /// Points with enough satellites, or with no satellite reading at all
    pub reliable: Vec<&'a Point>,
    /// Points whose average satellite count is below the threshold
    pub low: Vec<&'a Point>,
}

/// Split points on `NumberOfSatellites < min_satellites`, preserving order.
///
/// A point without a satellite reading is not flagged.
pub fn partition_by_satellites<'a>(
    points: &[&'a Point],
    min_satellites: u8,
) -> SatellitePartition<'a> {
    let (low, reliable) = points
        .iter()
        .copied()
        .partition(|p| is_low_satellite(p, min_satellites));
    SatellitePartition { reliable, low }
}

fn is_low_satellite(point: &Point, min_satellites: u8) -> bool {
    point
        .data_type_average(DataType::NumberOfSatellites)
        .is_some_and(|count| count < f64::from(min_satellites))
}
