//! Timestamped bags of sensor readings.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::data::{DataType, DataValue, Position};

/// The atomic unit of a recording: every reading taken at one instant.
///
/// Several readings of the same type may share a point (e.g. two heart
/// rate straps), so each type maps to an ordered sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    timestamp: DateTime<Utc>,
    data: BTreeMap<DataType, Vec<DataValue>>,
}

impl Point {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            data: BTreeMap::new(),
        }
    }

    /// Builder form of [`Point::add_data`].
    pub fn with_data(mut self, value: DataValue) -> Self {
        self.add_data(value);
        self
    }

    /// Attach a reading. Readings of one type keep their insertion order.
    pub fn add_data(&mut self, value: DataValue) {
        self.data.entry(value.data_type()).or_default().push(value);
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// All readings, keyed by type.
    pub fn data(&self) -> &BTreeMap<DataType, Vec<DataValue>> {
        &self.data
    }

    /// Readings of one type, empty if the point has none.
    pub fn data_by_type(&self, data_type: DataType) -> &[DataValue] {
        self.data
            .get(&data_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_data_type(&self, data_type: DataType) -> bool {
        !self.data_by_type(data_type).is_empty()
    }

    /// First valid position reading, if any.
    ///
    /// Non-finite or out-of-range coordinates are ignored, so a corrupt
    /// fix never reaches geodesic math.
    pub fn position(&self) -> Option<&Position> {
        self.data_by_type(DataType::Position)
            .iter()
            .filter_map(DataValue::as_position)
            .find(|p| p.is_valid())
    }

    pub fn has_position(&self) -> bool {
        self.position().is_some()
    }

    /// Mean of this point's readings of a numeric type.
    ///
    /// `None` means "no data" and is distinct from a genuine `0.0` reading.
    /// Positions never average.
    pub fn data_type_average(&self, data_type: DataType) -> Option<f64> {
        let (sum, count) = self
            .data_by_type(data_type)
            .iter()
            .filter_map(DataValue::as_f64)
            .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
        if count == 0 {
            None
        } else {
            Some(sum / count as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_500_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_missing_type_is_empty() {
        let point = Point::new(at(0)).with_data(DataValue::Altitude(100.0));
        assert!(point.data_by_type(DataType::HeartRate).is_empty());
        assert_eq!(point.data_type_average(DataType::HeartRate), None);
        assert!(!point.has_position());
    }

    #[test]
    fn test_redundant_sensors_average() {
        let point = Point::new(at(0))
            .with_data(DataValue::HeartRate(140.0))
            .with_data(DataValue::HeartRate(146.0));
        assert_eq!(point.data_by_type(DataType::HeartRate).len(), 2);
        assert_eq!(point.data_type_average(DataType::HeartRate), Some(143.0));
    }

    #[test]
    fn test_zero_reading_is_data() {
        let point = Point::new(at(0)).with_data(DataValue::Speed(0.0));
        assert_eq!(point.data_type_average(DataType::Speed), Some(0.0));
    }

    #[test]
    fn test_position_lookup() {
        let point = Point::new(at(0))
            .with_data(DataValue::position(46.52, 6.63))
            .with_data(DataValue::position(46.53, 6.64));
        assert_eq!(point.position(), Some(&Position::new(46.52, 6.63)));
        assert_eq!(point.data_type_average(DataType::Position), None);
        assert_eq!(point.data().len(), 1);
    }

    #[test]
    fn test_invalid_position_ignored() {
        let corrupt = Point::new(at(0)).with_data(DataValue::position(f64::NAN, 7.0));
        assert!(!corrupt.has_position());

        let point = Point::new(at(0))
            .with_data(DataValue::position(95.0, 7.0))
            .with_data(DataValue::position(45.0, 7.0));
        assert_eq!(point.position(), Some(&Position::new(45.0, 7.0)));
    }
}
