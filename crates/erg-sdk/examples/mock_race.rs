//! 无硬件演示：用模拟设备跑一场 1000 米双赛道比赛
//!
//! ```bash
//! cargo run -p erg-sdk --example mock_race --features mock
//! ```

use erg_sdk::prelude::*;
use erg_sdk::protocol::{Command, ErgFrame};
use erg_sdk::serial::{FRAME_LEN, MockSerial};
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    erg_sdk::init_logging();

    // 模拟一台按 4 m/s 匀速推进的测功仪
    let mut tick: u32 = 0;
    let responder = move |bytes: &[u8]| -> Vec<[u8; FRAME_LEN]> {
        let Ok(cmd) = Command::try_from(bytes[0]) else {
            return vec![];
        };
        match cmd {
            Command::QueryDistance => {
                tick += 1;
                let distance = (tick as f32) * 4.0;
                let status = if distance >= 1000.0 { 0xC4 + 1 } else { 0xC4 + 2 };
                vec![ErgFrame::encode(status, distance.min(1000.0))]
            },
            Command::QueryTime => vec![ErgFrame::encode(0x00, tick as f32)],
            _ => vec![],
        }
    };

    let options = RaceOptions::default();
    let workout = Workout::distance(1000.0)
        .add_lane(Lane::human("You", 0))
        .add_lane(Lane::pacer(
            "Pacer",
            PacerSpec::FixedSplit {
                split: 130.0,
                finish_time: 260.0,
            },
        ));

    let link = ErgLinkBuilder::new()
        .workout_type(workout.workout_type())
        .read_timeout(Duration::from_millis(20))
        .response_timeout(Duration::from_millis(200))
        .build_with(MockSerial::new(responder))?;

    let (mut aggregator, events) = StrokeAggregator::new(workout, options, link)?;
    aggregator.start_rowing()?;

    loop {
        let snapshot = aggregator.collect_tick()?;
        println!(
            "you: {:6.1} m   pacer: {:6.1} m",
            snapshot.stroke(0).distance_m,
            snapshot.stroke(1).distance_m,
        );

        if let Ok(RaceEvent::WorkoutFinished) = events.try_recv() {
            println!("workout finished");
            break;
        }
    }

    aggregator.shutdown()?;
    Ok(())
}
