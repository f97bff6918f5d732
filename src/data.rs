//! Typed sensor readings.
//!
//! A [`DataValue`] is one reading attached to a [`Point`](crate::Point).
//! The variant *is* the sensor kind, so a value's shape is fixed by its
//! [`DataType`]: a position never exposes a scalar, and a heart rate never
//! exposes coordinates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TimelineError};

/// Sensor kind of a reading. Used as the key of a point's data map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DataType {
    Position,
    Altitude,
    HeartRate,
    Cadence,
    Speed,
    Power,
    Temperature,
    NumberOfSatellites,
    Distance,
}

impl DataType {
    /// Every known sensor kind, in key order.
    pub const ALL: [DataType; 9] = [
        DataType::Position,
        DataType::Altitude,
        DataType::HeartRate,
        DataType::Cadence,
        DataType::Speed,
        DataType::Power,
        DataType::Temperature,
        DataType::NumberOfSatellites,
        DataType::Distance,
    ];

    /// Stable display key, e.g. `"Heart Rate"`.
    pub fn key(&self) -> &'static str {
        match self {
            DataType::Position => "Position",
            DataType::Altitude => "Altitude",
            DataType::HeartRate => "Heart Rate",
            DataType::Cadence => "Cadence",
            DataType::Speed => "Speed",
            DataType::Power => "Power",
            DataType::Temperature => "Temperature",
            DataType::NumberOfSatellites => "Number of Satellites",
            DataType::Distance => "Distance",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for DataType {
    type Err = TimelineError;

    fn from_str(s: &str) -> Result<Self> {
        DataType::ALL
            .iter()
            .copied()
            .find(|t| t.key() == s)
            .ok_or_else(|| TimelineError::UnknownDataType { key: s.to_string() })
    }
}

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check if the position has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// A single typed sensor reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum DataValue {
    Position(Position),
    /// Meters above sea level
    Altitude(f64),
    /// Beats per minute
    HeartRate(f64),
    /// Revolutions or steps per minute
    Cadence(f64),
    /// Meters per second
    Speed(f64),
    /// Watts
    Power(f64),
    /// Degrees Celsius
    Temperature(f64),
    NumberOfSatellites(f64),
    /// Cumulative meters reported by the device
    Distance(f64),
}

impl DataValue {
    /// Build a scalar reading of the given kind.
    ///
    /// Fails with [`TimelineError::NotNumeric`] for [`DataType::Position`].
    pub fn numeric(data_type: DataType, value: f64) -> Result<Self> {
        Ok(match data_type {
            DataType::Position => return Err(TimelineError::NotNumeric { data_type }),
            DataType::Altitude => DataValue::Altitude(value),
            DataType::HeartRate => DataValue::HeartRate(value),
            DataType::Cadence => DataValue::Cadence(value),
            DataType::Speed => DataValue::Speed(value),
            DataType::Power => DataValue::Power(value),
            DataType::Temperature => DataValue::Temperature(value),
            DataType::NumberOfSatellites => DataValue::NumberOfSatellites(value),
            DataType::Distance => DataValue::Distance(value),
        })
    }

    pub fn position(latitude: f64, longitude: f64) -> Self {
        DataValue::Position(Position::new(latitude, longitude))
    }

    pub fn data_type(&self) -> DataType {
        match self {
            DataValue::Position(_) => DataType::Position,
            DataValue::Altitude(_) => DataType::Altitude,
            DataValue::HeartRate(_) => DataType::HeartRate,
            DataValue::Cadence(_) => DataType::Cadence,
            DataValue::Speed(_) => DataType::Speed,
            DataValue::Power(_) => DataType::Power,
            DataValue::Temperature(_) => DataType::Temperature,
            DataValue::NumberOfSatellites(_) => DataType::NumberOfSatellites,
            DataValue::Distance(_) => DataType::Distance,
        }
    }

    /// Scalar value, or `None` for positions.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            DataValue::Position(_) => None,
            DataValue::Altitude(v)
            | DataValue::HeartRate(v)
            | DataValue::Cadence(v)
            | DataValue::Speed(v)
            | DataValue::Power(v)
            | DataValue::Temperature(v)
            | DataValue::NumberOfSatellites(v)
            | DataValue::Distance(v) => Some(v),
        }
    }

    pub fn as_position(&self) -> Option<&Position> {
        match self {
            DataValue::Position(p) => Some(p),
            _ => None,
        }
    }
}
