//! # Erg Race
//!
//! 多赛道聚合层。每个渲染节拍从各赛道来源（真实设备、合成配速手）
//! 各取一份采样，套用平滑时钟对齐后合成一份快照，交给渲染与记录
//! 协作方。
//!
//! ## 模块
//!
//! - `workout`: 训练与赛道描述（标签变体，聚合器按标签分派）
//! - `pacer`: 配速手生成器（固定配速 / 录像回放两种变体）
//! - `recording`: 录像检查点文件装载
//! - `smoothing`: 平滑时钟（设备约一秒一报，用 lag 插值让船连续前进）
//! - `snapshot`: 每节拍快照与无锁最新快照单元
//! - `hooks`: 逐桨记录回调接口（文件格式由协作方实现）
//! - `aggregator`: 节拍聚合器与生命周期事件
//! - `options`: 运行配置的装载与保存

pub mod aggregator;
pub mod hooks;
pub mod options;
pub mod pacer;
pub mod recording;
pub mod smoothing;
pub mod snapshot;
pub mod workout;

mod error;

// 重新导出常用类型
pub use aggregator::{RaceEvent, StrokeAggregator};
pub use error::RaceError;
pub use hooks::StrokeHook;
pub use options::RaceOptions;
pub use pacer::{FixedSplitPacer, PacerSource, RecordedPacer};
pub use recording::Checkpoint;
pub use smoothing::LagClock;
pub use snapshot::{SnapshotCell, StrokeSnapshot};
pub use workout::{Lane, PacerSpec, RowerKind, Workout};

// 下游只需要依赖本 crate 即可拿到驱动层的起划方式与训练类型
pub use erg_driver::StartMode;
pub use erg_protocol::WorkoutType;
