//! 帧折叠状态机
//!
//! 每个查询应答只携带一个浮点值，一份完整采样需要按固定顺序折叠
//! 2 帧（基础数据：距离、时间）或 4 帧（完整数据：距离、时间、配速、
//! 心率）。折叠状态由「哪些字段已填充」显式决定：
//!
//! 1. 无在途采样 → 状态字节重映射 + 距离
//! 2. 时间未填 → 时间（此时的状态字节是回显旧值，忽略）
//! 3. 功率未填 → 状态字节作桨频、浮点值作原始配速导出功率
//! 4. 其余 → 浮点值作心率周期导出心率
//!
//! 状态机无法检测乱序到达，依赖调用方按查询序列的发出纪律。每折叠
//! 一帧就向交接槽发布一份不可变快照，无论命中哪个分支都恰好一次。

use crate::slot::StrokeSlot;
use erg_protocol::{
    ErgFrame, ProtocolError, StrokeSample, StrokeStatus, UNSET, UNSET_RATE, WorkoutType,
    heart_rate_from_period, power_from_pace,
};
use std::sync::Arc;
use tracing::trace;

/// 在途采样的已填充字段
struct Partial {
    status: StrokeStatus,
    distance_m: f32,
    elapsed_s: Option<f32>,
    pace: Option<(i32, f64)>,
    heart_bpm: Option<f32>,
}

impl Partial {
    fn snapshot(&self) -> StrokeSample {
        StrokeSample {
            status: self.status,
            distance_m: self.distance_m,
            elapsed_s: self.elapsed_s.unwrap_or(UNSET),
            stroke_rate: self.pace.map(|(rate, _)| rate).unwrap_or(UNSET_RATE),
            power_w: self.pace.map(|(_, power)| power).unwrap_or(UNSET as f64),
            heart_rate_bpm: self.heart_bpm.unwrap_or(UNSET),
        }
    }
}

/// 把原始应答帧折叠为采样快照的状态机
///
/// 由 RX 线程独占驱动；轮询线程仅在发起新一轮查询序列前调用
/// [`FrameAssembler::reset`]。
pub struct FrameAssembler {
    workout: WorkoutType,
    pending: Option<Partial>,
    slot: Arc<StrokeSlot>,
}

impl FrameAssembler {
    pub fn new(workout: WorkoutType, slot: Arc<StrokeSlot>) -> Self {
        Self {
            workout,
            pending: None,
            slot,
        }
    }

    /// 丢弃在途采样，下一帧重新开始
    pub fn reset(&mut self) {
        self.pending = None;
    }

    /// 折叠一个完整的 5 字节帧并发布快照
    pub fn ingest(&mut self, buf: &[u8]) -> Result<(), ProtocolError> {
        let frame = ErgFrame::decode(buf)?;
        trace!(raw = %hex::encode(buf), value = frame.value, "frame received");

        match &mut self.pending {
            None => {
                self.pending = Some(Partial {
                    status: StrokeStatus::from_device(frame.status, self.workout),
                    distance_m: frame.value,
                    elapsed_s: None,
                    pace: None,
                    heart_bpm: None,
                });
            },
            Some(p) if p.elapsed_s.is_none() => {
                p.elapsed_s = Some(frame.value);
            },
            Some(p) if p.pace.is_none() => {
                p.pace = Some((frame.status as i32, power_from_pace(frame.value)));
            },
            Some(p) => {
                p.heart_bpm = Some(heart_rate_from_period(frame.value as u32));
            },
        }

        // 无论命中哪个分支，每帧恰好发布一次
        if let Some(p) = &self.pending {
            self.slot.publish(p.snapshot());
        }
        Ok(())
    }
}
