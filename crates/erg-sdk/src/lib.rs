//! # Erg SDK
//!
//! PM2+ 划船测功仪的统一入口，把分层 crate 以模块别名聚合：
//!
//! - [`protocol`]: 命令字节、帧编解码、采样与派生量（无硬件依赖）
//! - [`serial`]: 串口抽象层（9600-8-N-1，收发可拆分）
//! - [`driver`]: 设备链路、RX 线程、帧折叠与单槽交接
//! - [`race`]: 多赛道聚合、配速手、平滑时钟与生命周期事件
//!
//! # 典型用法
//!
//! ```no_run
//! use erg_sdk::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     erg_sdk::init_logging();
//!
//!     let options = RaceOptions::default();
//!     let workout = Workout::distance(1000.0)
//!         .add_lane(Lane::human("Alice", 0))
//!         .add_lane(Lane::pacer(
//!             "Pacer",
//!             PacerSpec::FixedSplit { split: 110.0, finish_time: 220.0 },
//!         ));
//!
//!     let link = ErgLinkBuilder::new()
//!         .port(&options.serial_port)
//!         .workout_type(workout.workout_type())
//!         .full_data(options.full_stroke_data)
//!         .build()?;
//!
//!     let (mut aggregator, events) = StrokeAggregator::new(workout, options, link)?;
//!     aggregator.start_rowing()?;
//!
//!     loop {
//!         let snapshot = aggregator.collect_tick()?;
//!         println!("lane 0 at {:.0} m", snapshot.stroke(0).distance_m);
//!         if let Ok(RaceEvent::WorkoutFinished) = events.try_recv() {
//!             break;
//!         }
//!     }
//!
//!     aggregator.shutdown()?;
//!     Ok(())
//! }
//! ```

pub use erg_driver as driver;
pub use erg_protocol as protocol;
pub use erg_race as race;
pub use erg_serial as serial;

/// 常用类型一次性导入
pub mod prelude {
    pub use erg_driver::{DriverError, ErgLink, ErgLinkBuilder, StartMode};
    pub use erg_protocol::{StrokeSample, StrokeStatus, WorkoutType};
    pub use erg_race::{
        Lane, PacerSpec, RaceError, RaceEvent, RaceOptions, RowerKind, StrokeAggregator,
        StrokeHook, StrokeSnapshot, Workout,
    };
}

/// 初始化 tracing 日志（RUST_LOG 控制过滤，重复调用安全）
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}
