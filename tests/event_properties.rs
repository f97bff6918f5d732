//! Behavioural properties of the event query surface.

use std::sync::Arc;

use activity_timeline::{
    build_map_data, map_bounds, Activity, Bounds, DataType, DataValue, Event, EventQuery,
    EventSummary, GainConfig, InterpolationConfig, Lap, LapType, LogObserver, MapConfig, Point,
};
use chrono::{DateTime, TimeZone, Utc};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_600_000_000 + secs, 0).unwrap()
}

/// `count` points every second from `offset`; every third point lacks a position.
fn activity(id: &str, offset: i64, count: i64) -> Activity {
    let points = (0..count)
        .map(|i| {
            let point = Point::new(at(offset + i)).with_data(DataValue::HeartRate(130.0));
            if i % 3 == 2 {
                point
            } else {
                point.with_data(DataValue::position(45.0 + i as f64 * 0.0001, 7.0))
            }
        })
        .collect();
    Activity::from_points(id, points).unwrap()
}

fn two_activity_event() -> Event {
    init_logging();
    let mut event = Event::new("event").with_observer(Arc::new(LogObserver));
    event.add_activity(activity("a1", 0, 30)).unwrap();
    event.add_activity(activity("a2", 15, 30)).unwrap();
    event
}

#[test]
fn points_are_concatenated_in_activity_order() {
    let event = two_activity_event();
    let all = event.get_points(&EventQuery::all());

    let a1: Vec<&Point> = event.activities()[0].points().iter().collect();
    let a2: Vec<&Point> = event.activities()[1].points().iter().collect();
    let expected: Vec<&Point> = a1.into_iter().chain(a2).collect();

    assert_eq!(all.len(), expected.len());
    assert!(all.iter().zip(&expected).all(|(a, b)| std::ptr::eq(*a, *b)));
    for window in all[..30].windows(2) {
        assert!(window[0].timestamp() <= window[1].timestamp());
    }
}

#[test]
fn filtered_points_are_a_bounded_subset() {
    let event = two_activity_event();
    let (start, end) = (at(10), at(20));
    let all = event.get_points(&EventQuery::all());
    let filtered = event.get_points(&EventQuery::all().between(start, end));

    // 11 from a1 (10..=20), 6 from a2 (15..=20)
    assert_eq!(filtered.len(), 17);
    for point in &filtered {
        assert!(point.timestamp() >= start && point.timestamp() <= end);
        assert!(all.iter().any(|p| std::ptr::eq(*p, *point)));
    }
}

#[test]
fn step_downsamples_within_each_activity() {
    let event = two_activity_event();
    let stepped = event.get_points(&EventQuery::all().activities(["a1"]).step(10));
    let stamps: Vec<_> = stepped.iter().map(|p| p.timestamp()).collect();
    assert_eq!(stamps, vec![at(0), at(10), at(20)]);
}

#[test]
fn positionless_points_are_excluded() {
    let event = two_activity_event();
    let positioned = event.get_points_with_position(&EventQuery::all());
    assert_eq!(positioned.len(), 40);
    assert!(positioned.iter().all(|p| p.position().is_some()));
}

#[test]
fn gain_and_loss_follow_hysteresis() {
    let altitudes = [100.0, 100.2, 103.0, 102.9, 106.0];
    let points = altitudes
        .iter()
        .enumerate()
        .map(|(i, alt)| Point::new(at(i as i64)).with_data(DataValue::Altitude(*alt)))
        .collect();
    let mut event = Event::new("hill");
    event
        .add_activity(Activity::from_points("climb", points).unwrap())
        .unwrap();

    let config = GainConfig {
        precision: 1,
        min_diff: 1.5,
    };
    let query = EventQuery::all();
    assert_eq!(event.get_data_type_gain(DataType::Altitude, &query, &config), 6.0);
    assert_eq!(event.get_data_type_loss(DataType::Altitude, &query, &config), 0.0);
}

#[test]
fn bounding_box_of_four_points() {
    let points: Vec<Point> = [(10.0, 10.0), (20.0, 5.0), (0.0, 15.0), (5.0, 20.0)]
        .iter()
        .enumerate()
        .map(|(i, &(lat, lng))| Point::new(at(i as i64)).with_data(DataValue::position(lat, lng)))
        .collect();
    let mut event = Event::new("box");
    event
        .add_activity(Activity::from_points("a", points).unwrap())
        .unwrap();

    let bounds = Bounds::from_points(&event.get_points_with_position(&EventQuery::all()));
    assert_eq!(
        bounds,
        Bounds {
            north: 20.0,
            south: 0.0,
            east: 20.0,
            west: 5.0
        }
    );

    let map = build_map_data(&event, None, &MapConfig::default(), &InterpolationConfig::default());
    assert_eq!(map_bounds(&map), bounds);
}

#[test]
fn empty_inputs_are_total() {
    let mut event = Event::new("indoor");
    event
        .add_activity(
            Activity::from_points(
                "trainer",
                vec![Point::new(at(0)).with_data(DataValue::Power(210.0))],
            )
            .unwrap(),
        )
        .unwrap();

    let query = EventQuery::all();
    assert_eq!(event.get_distance_in_meters(&query), 0.0);
    assert_eq!(Bounds::from_points(&event.get_points_with_position(&query)), Bounds::default());
    assert_eq!(event.get_data_type_average(DataType::HeartRate, &query), None);
    assert!(event.get_data(&EventQuery::all().since(at(100))).is_empty());

    let empty = Event::new("empty");
    assert!(empty.get_points(&query).is_empty());
    assert_eq!(empty.get_total_duration_in_seconds(), 0.0);
    assert!(empty.get_first_activity().is_none());
}

#[test]
fn overlapping_durations_are_summed() {
    let hour = Activity::from_points("hour", vec![Point::new(at(0)), Point::new(at(3_600))]);
    let half = Activity::from_points("half", vec![Point::new(at(600)), Point::new(at(2_400))]);
    let mut event = Event::new("overlap");
    event.add_activity(hour.unwrap()).unwrap();
    event.add_activity(half.unwrap()).unwrap();

    assert_eq!(event.get_total_duration_in_seconds(), 5_400.0);
}

#[test]
fn auto_laps_hidden_everywhere() {
    let mut a = activity("a1", 0, 60);
    for i in 0..5 {
        a.add_lap(Lap::new(LapType::Automatic, at(i * 10), at(i * 10 + 9)).unwrap());
    }
    a.add_lap(Lap::new(LapType::Manual, at(50), at(59)).unwrap());
    let mut event = Event::new("laps");
    event.add_activity(a).unwrap();

    let config = MapConfig {
        show_auto_laps: false,
        show_manual_laps: true,
        ..MapConfig::default()
    };
    let map = build_map_data(&event, None, &config, &InterpolationConfig::default());
    assert_eq!(map[0].laps.len(), 1);
    assert!(map[0]
        .laps
        .iter()
        .all(|resolved| resolved.lap.lap_type() != LapType::Automatic));
}

#[test]
fn repeated_queries_are_identical() {
    let event = two_activity_event();
    let query = EventQuery::all().between(at(5), at(40)).step(2);
    let first = event.get_distance_in_meters(&query);
    let second = event.get_distance_in_meters(&query);
    assert_eq!(first, second);
    assert_eq!(event.get_points(&query), event.get_points(&query));
}

#[test]
fn summary_round_trip_through_event() {
    let mut event = two_activity_event();
    let summary = EventSummary::compute(&event, &GainConfig::default());
    event.set_summary(summary).unwrap();

    let summary = event.summary().unwrap();
    assert_eq!(summary.point_count, 60);
    assert_eq!(summary.avg_heart_rate, Some(130.0));
    assert_eq!(summary.total_duration_seconds, 58.0);
    assert!(summary.distance_meters > 0.0);
}
