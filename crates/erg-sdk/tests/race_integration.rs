//! 门面集成测试
//!
//! 只经 `erg_sdk::prelude` 暴露的 API 跑通一场短比赛，验证各层 re-export
//! 与事件流向。链路名额进程级，串行执行。

use erg_sdk::prelude::*;
use erg_sdk::protocol::{Command, ErgFrame};
use erg_sdk::serial::{FRAME_LEN, MockSerial};
use serial_test::serial;
use std::time::Duration;

/// 500 米单赛道：三拍划完，完成事件恰好一次
#[test]
#[serial]
fn test_facade_race_lifecycle() {
    let mut tick: usize = 0;
    let script: Vec<(u8, f32, f32)> = vec![
        (0xC4 + 2, 0.0, 0.0),
        (0xC4 + 2, 250.0, 55.0),
        (0xC4 + 1, 500.0, 110.0),
    ];

    let responder = move |bytes: &[u8]| -> Vec<[u8; FRAME_LEN]> {
        let Ok(cmd) = Command::try_from(bytes[0]) else {
            return vec![];
        };
        match cmd {
            Command::QueryDistance => {
                let (status, distance, _) = script[tick.min(script.len() - 1)];
                tick += 1;
                vec![ErgFrame::encode(status, distance)]
            },
            Command::QueryTime => {
                let (_, _, elapsed) = script[(tick - 1).min(script.len() - 1)];
                vec![ErgFrame::encode(0x00, elapsed)]
            },
            _ => vec![],
        }
    };

    let workout = Workout::distance(500.0).add_lane(Lane::human("Solo", 0));
    let options = RaceOptions {
        boat_smoothing: false,
        ..RaceOptions::default()
    };

    let link = ErgLinkBuilder::new()
        .workout_type(workout.workout_type())
        .read_timeout(Duration::from_millis(20))
        .response_timeout(Duration::from_millis(200))
        .build_with(MockSerial::new(responder))
        .unwrap();

    let (mut aggregator, events) = StrokeAggregator::new(workout, options, link).unwrap();
    for second in (1..=3).rev() {
        aggregator.display_countdown(second).unwrap();
    }
    aggregator.start_rowing().unwrap();

    let mut finished_after = None;
    for i in 0..3 {
        let snapshot = aggregator.collect_tick().unwrap();
        assert_eq!(snapshot.lane_count(), 1);
        if events.try_recv() == Ok(RaceEvent::WorkoutFinished) {
            finished_after = Some(i);
        }
    }

    assert_eq!(finished_after, Some(2), "finish must land after the final tick");
    assert!(aggregator.finished());

    let last = aggregator.snapshot_cell().latest().unwrap();
    assert!(last.stroke(0).is_end_of_workout());
    assert_eq!(last.stroke(0).distance_m, 500.0);

    aggregator.shutdown().unwrap();
}

/// 派生量经门面可用：功率到船速、卡路里
#[test]
fn test_facade_derived_quantities() {
    let mut sample = StrokeSample::empty();
    sample.power_w = 2.8;
    assert!((sample.meters_per_second() - 1.0).abs() < 1e-9);

    sample.power_w = 1.0;
    assert!((sample.calories_per_hour() - 303.4416).abs() < 1e-9);
}
