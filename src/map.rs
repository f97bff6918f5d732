//! Per-activity map view assembly.
//!
//! Produces everything a map widget needs to draw an event (track points,
//! start marker, lap markers, reception warnings, bounds) without drawing
//! anything itself.

use std::borrow::Cow;

use log::debug;

use crate::activity::Activity;
use crate::analytics::{self, Bounds};
use crate::config::{InterpolationConfig, MapConfig};
use crate::data::Position;
use crate::event::{Event, ResolvedLap};
use crate::geodesy::GeodesyAdapter;
use crate::lap::LapFilter;
use crate::point::Point;

/// Map-ready data for one activity.
#[derive(Debug, Clone)]
pub struct MapData<'a> {
    pub activity: &'a Activity,
    /// Positioned points, recorded or interpolated. Never empty.
    pub points: Vec<Cow<'a, Point>>,
    /// Laps passing the lap filter that cover at least one positioned point
    pub laps: Vec<ResolvedLap<'a>>,
    /// Satellite threshold when reception warnings are on
    warn_below_satellites: Option<u8>,
}

impl<'a> MapData<'a> {
    pub fn point_refs(&self) -> Vec<&Point> {
        self.points.iter().map(|p| &**p).collect()
    }

    /// First positioned point (the start marker).
    pub fn start_point(&self) -> Option<&Point> {
        self.points.first().map(|p| &**p)
    }

    /// Points with poor reception. Empty unless warnings were requested.
    pub fn low_satellite_points(&self) -> Vec<&Point> {
        match self.warn_below_satellites {
            Some(min_satellites) => {
                analytics::partition_by_satellites(&self.point_refs(), min_satellites).low
            }
            None => Vec::new(),
        }
    }
}

/// Assemble map data for the given activities (all when `None`), in order.
///
/// Activities without any positioned point are skipped.
pub fn build_map_data<'a>(
    event: &'a Event,
    activity_ids: Option<&[String]>,
    config: &MapConfig,
    interpolation: &InterpolationConfig,
) -> Vec<MapData<'a>> {
    let activities: Vec<&Activity> = match activity_ids {
        None => event.activities().iter().collect(),
        Some(ids) => ids.iter().filter_map(|id| event.activity(id)).collect(),
    };
    let lap_filter = LapFilter::from(config);

    activities
        .into_iter()
        .filter_map(|activity| {
            let points: Vec<Cow<'a, Point>> = if config.show_interpolated {
                activity
                    .get_points_interpolated(interpolation)
                    .into_iter()
                    .filter(Point::has_position)
                    .map(Cow::Owned)
                    .collect()
            } else {
                activity
                    .points()
                    .iter()
                    .filter(|p| p.has_position())
                    .map(Cow::Borrowed)
                    .collect()
            };

            if points.is_empty() {
                debug!("[Map] Skipping activity {} without positions", activity.id());
                return None;
            }

            let scope = [activity.id().to_string()];
            let laps = event.resolve_laps(activity.laps(), &lap_filter, Some(&scope));

            Some(MapData {
                activity,
                points,
                laps,
                warn_below_satellites: config
                    .show_data_warnings
                    .then_some(config.min_satellites),
            })
        })
        .collect()
}

/// Bounds over every activity's points. Zero box when there are none.
pub fn map_bounds(map_data: &[MapData<'_>]) -> Bounds {
    let points: Vec<&Point> = map_data.iter().flat_map(|m| m.point_refs()).collect();
    Bounds::from_points(&points)
}

/// Track point nearest to a clicked position.
pub fn nearest_point_on_track<'m>(
    target: &Position,
    map_data: &'m MapData<'_>,
    adapter: &dyn GeodesyAdapter,
) -> Option<&'m Point> {
    adapter.get_nearest_point_to_position(target, &map_data.point_refs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataValue;
    use crate::geodesy::GeodesicAdapter;
    use crate::lap::{Lap, LapType};
    use chrono::{DateTime, TimeZone, Utc};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_500_000_000 + secs, 0).unwrap()
    }

    fn track(id: &str, lat: f64) -> Activity {
        let points = (0..6)
            .map(|i| {
                Point::new(at(i * 10))
                    .with_data(DataValue::position(lat, 6.0 + i as f64 * 0.01))
                    .with_data(DataValue::NumberOfSatellites(if i == 2 { 4.0 } else { 9.0 }))
            })
            .collect();
        let mut activity = Activity::from_points(id, points).unwrap();
        activity.add_lap(Lap::new(LapType::Automatic, at(0), at(20)).unwrap());
        activity.add_lap(Lap::new(LapType::Manual, at(20), at(50)).unwrap());
        activity
    }

    fn sample_event() -> Event {
        let mut event = Event::new("e");
        event.add_activity(track("north", 47.0)).unwrap();
        event.add_activity(track("south", 46.0)).unwrap();
        let indoor = Activity::from_points(
            "indoor",
            vec![Point::new(at(0)).with_data(DataValue::HeartRate(130.0))],
        )
        .unwrap();
        event.add_activity(indoor).unwrap();
        event
    }

    #[test]
    fn test_default_config() {
        let event = sample_event();
        let data = build_map_data(
            &event,
            None,
            &MapConfig::default(),
            &InterpolationConfig::default(),
        );

        // Indoor activity has no positions
        assert_eq!(data.len(), 2);
        assert_eq!(data[0].activity.id(), "north");
        assert_eq!(data[0].points.len(), 6);
        assert_eq!(data[0].start_point().unwrap().timestamp(), at(0));
        assert!(data[0].low_satellite_points().is_empty());

        // Only the automatic lap by default
        assert_eq!(data[0].laps.len(), 1);
        assert_eq!(data[0].laps[0].lap.lap_type(), LapType::Automatic);
        // Lap points stay inside their own activity
        assert_eq!(data[0].laps[0].points.len(), 3);
    }

    #[test]
    fn test_warnings_and_manual_laps() {
        let event = sample_event();
        let config = MapConfig {
            show_auto_laps: false,
            show_manual_laps: true,
            show_data_warnings: true,
            ..MapConfig::default()
        };
        let south = ["south".to_string()];
        let interpolation = InterpolationConfig::default();
        let data = build_map_data(&event, Some(&south[..]), &config, &interpolation);

        assert_eq!(data.len(), 1);
        let low = data[0].low_satellite_points();
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].timestamp(), at(20));

        assert_eq!(data[0].laps.len(), 1);
        assert_eq!(data[0].laps[0].lap.lap_type(), LapType::Manual);
        assert_eq!(data[0].laps[0].end_point().unwrap().timestamp(), at(50));
    }

    #[test]
    fn test_interpolated_points() {
        let event = sample_event();
        let config = MapConfig {
            show_interpolated: true,
            ..MapConfig::default()
        };
        let data = build_map_data(&event, None, &config, &InterpolationConfig::default());
        // 6 points 10s apart become 51 at 1s spacing
        assert_eq!(data[0].points.len(), 51);
        assert!(matches!(data[0].points[1], Cow::Owned(_)));
    }

    #[test]
    fn test_bounds_and_nearest() {
        let event = sample_event();
        let data = build_map_data(
            &event,
            None,
            &MapConfig::default(),
            &InterpolationConfig::default(),
        );

        let bounds = map_bounds(&data);
        assert_eq!(bounds.north, 47.0);
        assert_eq!(bounds.south, 46.0);
        assert_eq!(bounds.west, 6.0);
        assert!((bounds.east - 6.05).abs() < 1e-9);

        let clicked = Position::new(47.0001, 6.0302);
        let nearest = nearest_point_on_track(&clicked, &data[0], &GeodesicAdapter).unwrap();
        assert_eq!(nearest.timestamp(), at(30));
    }

    #[test]
    fn test_empty_event() {
        let event = Event::new("empty");
        let data = build_map_data(
            &event,
            None,
            &MapConfig::default(),
            &InterpolationConfig::default(),
        );
        assert!(data.is_empty());
        assert!(map_bounds(&data).is_empty());
    }
}
