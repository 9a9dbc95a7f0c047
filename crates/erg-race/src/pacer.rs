//! 配速手生成器
//!
//! 给定当前（平滑后的）训练时间，凭空合成一份采样，不碰任何硬件。
//! 两个变体：固定配速按简单的匀速模型推算距离；录像回放在此前记录的
//! 检查点序列上线性插值。聚合器按 [`PacerSource`] 标签分派。

use crate::recording::{Checkpoint, load_checkpoints};
use crate::{RaceError, workout::PacerSpec};
use erg_protocol::{StrokeSample, StrokeStatus, WorkoutType};
use std::path::Path;

/// 配速手来源（标签变体）
pub enum PacerSource {
    FixedSplit(FixedSplitPacer),
    Recorded(RecordedPacer),
}

impl PacerSource {
    /// 按配速手描述构造来源
    ///
    /// 录像文件装载失败在这里（开赛前）报错。固定配速的参数按训练
    /// 类型取舍：距离训练用全程距离 + 目标用时，时间训练用分段配速。
    pub fn from_spec(
        spec: &PacerSpec,
        workout_type: WorkoutType,
        target_distance: Option<f32>,
    ) -> Result<Self, RaceError> {
        match spec {
            PacerSpec::FixedSplit { split, finish_time } => {
                let pacer = match workout_type {
                    WorkoutType::Distance => {
                        let distance = target_distance.ok_or_else(|| {
                            RaceError::Configuration(
                                "fixed-split pacer in a distance workout needs a target distance"
                                    .into(),
                            )
                        })?;
                        FixedSplitPacer::for_distance_workout(distance, *finish_time)
                    },
                    WorkoutType::Time => FixedSplitPacer::for_time_workout(*split, *finish_time),
                    WorkoutType::JustRow => {
                        return Err(RaceError::Configuration(
                            "pacers are not available in just-row workouts".into(),
                        ));
                    },
                };
                Ok(PacerSource::FixedSplit(pacer))
            },
            PacerSpec::Recorded { path } => Ok(PacerSource::Recorded(RecordedPacer::from_file(path)?)),
        }
    }

    /// 在给定训练时间处取一份采样
    pub fn sample_at(&mut self, elapsed: f32) -> StrokeSample {
        match self {
            PacerSource::FixedSplit(p) => p.sample_at(elapsed),
            PacerSource::Recorded(p) => p.sample_at(elapsed),
        }
    }
}

/// 固定配速变体
///
/// 匀速模型：时间训练按分段配速换算米每秒，距离训练按「全程距离 /
/// 目标用时」。只填距离、时间与状态，其余字段保持未设置。
#[derive(Debug, Clone, Copy)]
pub struct FixedSplitPacer {
    workout: WorkoutType,
    target_distance: f32,
    split: f32,
    finish_time: f32,
}

impl FixedSplitPacer {
    /// 距离目标训练的配速手
    pub fn for_distance_workout(target_distance: f32, finish_time: f32) -> Self {
        Self {
            workout: WorkoutType::Distance,
            target_distance,
            split: 0.0,
            finish_time,
        }
    }

    /// 时间目标训练的配速手
    pub fn for_time_workout(split: f32, finish_time: f32) -> Self {
        Self {
            workout: WorkoutType::Time,
            target_distance: 0.0,
            split,
            finish_time,
        }
    }

    /// 在给定训练时间处取一份采样
    pub fn sample_at(&self, elapsed: f32) -> StrokeSample {
        let mut sample = StrokeSample::empty();
        let finished = elapsed >= self.finish_time;

        match self.workout {
            WorkoutType::Time => {
                sample.distance_m = elapsed * 500.0 / self.split;
            },
            _ => {
                // 距离训练：匀速推进，封顶在全程距离
                let mut distance = elapsed * self.target_distance / self.finish_time;
                if distance > self.target_distance {
                    distance = self.target_distance;
                }
                sample.distance_m = distance;

                // 完赛后时间固定在目标用时，排名读到稳定的完赛时间
                // 而不是持续走表的时钟值
                sample.elapsed_s = if finished { self.finish_time } else { elapsed };
            },
        }

        sample.status = if finished {
            StrokeStatus::EndOfWorkout
        } else {
            StrokeStatus::EndOfStroke
        };

        sample
    }
}

/// 录像回放变体
///
/// 检查点游标只进不退，依赖查询时间单调到达（聚合器的平滑时钟保证
/// 这一点）。游标落在最后一个检查点（或撞上「尾部零时刻」哨兵，
/// 记录文件用零填充未用的尾部槽位）时按终点原样返回，不外推。
pub struct RecordedPacer {
    checkpoints: Vec<Checkpoint>,
    cursor: usize,
}

impl RecordedPacer {
    /// 从录像文件构造，装载失败即报错
    pub fn from_file(path: &Path) -> Result<Self, RaceError> {
        Ok(Self::from_checkpoints(load_checkpoints(path)?))
    }

    /// 直接由检查点序列构造（测试与上层组合用）
    pub fn from_checkpoints(checkpoints: Vec<Checkpoint>) -> Self {
        Self {
            checkpoints,
            cursor: 0,
        }
    }

    /// 在给定训练时间处取一份采样
    pub fn sample_at(&mut self, elapsed: f32) -> StrokeSample {
        let cps = &self.checkpoints;
        let mut next_exists = true;

        loop {
            // 非首位的零时刻检查点是「数据到此为止」的哨兵。真在 t=0
            // 记下的中段检查点会被误判截断，读入时无法区分
            if self.cursor != 0 && cps[self.cursor].time == 0.0 {
                self.cursor -= 1;
                next_exists = false;
                break;
            }

            if elapsed >= cps[self.cursor].time {
                if self.cursor + 1 >= cps.len() {
                    // 已是最后一个检查点，按终点返回
                    next_exists = false;
                    break;
                }
                if elapsed < cps[self.cursor + 1].time {
                    break;
                }
                self.cursor += 1;
            } else {
                // 游标已越过查询时间（只在首个检查点之前可能发生）
                break;
            }
        }

        let mut sample = StrokeSample::empty();
        let cp = cps[self.cursor];

        if next_exists {
            // 在游标与下一个检查点之间线性插值
            let next = cps[self.cursor + 1];
            let m_per_s = (next.distance - cp.distance) / (next.time - cp.time);
            sample.distance_m = (elapsed - cp.time) * m_per_s + cp.distance;
            sample.elapsed_s = elapsed;
        } else {
            sample.distance_m = cp.distance;
            sample.elapsed_s = cp.time;
        }

        // Split 为 0 的记录只有基础数据，功率、桨频、心率不携带
        if cp.has_full_data() {
            sample.power_w = cp.power;
            sample.stroke_rate = cp.spm;
            sample.heart_rate_bpm = cp.heart_rate;
        }

        sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cp(time: f32, distance: f32) -> Checkpoint {
        Checkpoint {
            time,
            distance,
            ..Checkpoint::default()
        }
    }

    /// 时间训练：100 秒 / 500 米的配速在 100 秒处划出 500 米
    #[test]
    fn test_fixed_split_time_workout() {
        let pacer = FixedSplitPacer::for_time_workout(100.0, 300.0);

        let s = pacer.sample_at(100.0);
        assert_eq!(s.distance_m, 500.0);
        assert!(s.is_end_of_stroke());

        let s = pacer.sample_at(300.0);
        assert!(s.is_end_of_workout());
    }

    /// 距离训练：匀速推进、封顶、完赛后时间固定在目标用时
    #[test]
    fn test_fixed_split_distance_workout() {
        let pacer = FixedSplitPacer::for_distance_workout(1000.0, 200.0);

        let s = pacer.sample_at(100.0);
        assert_eq!(s.distance_m, 500.0);
        assert_eq!(s.elapsed_s, 100.0);
        assert!(s.is_end_of_stroke());

        // 超过目标用时：距离封顶、时间固定、状态终止
        let s = pacer.sample_at(250.0);
        assert_eq!(s.distance_m, 1000.0);
        assert_eq!(s.elapsed_s, 200.0);
        assert!(s.is_end_of_workout());
    }

    /// 回放插值：(0,0) 与 (10,100) 之间在 t=5 处恰为 50
    #[test]
    fn test_recorded_interpolation() {
        let mut pacer = RecordedPacer::from_checkpoints(vec![cp(0.0, 0.0), cp(10.0, 100.0)]);

        let s = pacer.sample_at(5.0);
        assert_eq!(s.distance_m, 50.0);
        assert_eq!(s.elapsed_s, 5.0);
        // 基础数据记录不携带功率
        assert_eq!(s.power_w, -1.0);
    }

    /// 游标单调推进，跨检查点查询不回退
    #[test]
    fn test_cursor_advances_monotonically() {
        let mut pacer = RecordedPacer::from_checkpoints(vec![
            cp(0.0, 0.0),
            cp(10.0, 100.0),
            cp(20.0, 250.0),
        ]);

        assert_eq!(pacer.sample_at(5.0).distance_m, 50.0);
        assert_eq!(pacer.sample_at(15.0).distance_m, 175.0);
        assert_eq!(pacer.sample_at(20.0).distance_m, 250.0);
    }

    /// 尾部零时刻哨兵：其后的数据视为不存在，按终点原样返回
    #[test]
    fn test_trailing_zero_sentinel() {
        let mut pacer = RecordedPacer::from_checkpoints(vec![
            cp(0.0, 0.0),
            cp(10.0, 100.0),
            cp(0.0, 0.0),
            cp(0.0, 0.0),
        ]);

        let s = pacer.sample_at(30.0);
        assert_eq!(s.distance_m, 100.0);
        assert_eq!(s.elapsed_s, 10.0);
    }

    /// 超出最后一个检查点不外推
    #[test]
    fn test_no_extrapolation_past_end() {
        let mut pacer = RecordedPacer::from_checkpoints(vec![cp(0.0, 0.0), cp(10.0, 100.0)]);

        let s = pacer.sample_at(99.0);
        assert_eq!(s.distance_m, 100.0);
        assert_eq!(s.elapsed_s, 10.0);
    }

    /// 完整数据记录的功率、桨频、心率随采样带出
    #[test]
    fn test_full_data_carry_through() {
        let full = Checkpoint {
            time: 10.0,
            distance: 100.0,
            split: 1.5,
            power: 150.0,
            spm: 28,
            heart_rate: 155.0,
        };
        let mut pacer = RecordedPacer::from_checkpoints(vec![cp(0.0, 0.0), full, cp(20.0, 200.0)]);

        let s = pacer.sample_at(12.0);
        assert_eq!(s.power_w, 150.0);
        assert_eq!(s.stroke_rate, 28);
        assert_eq!(s.heart_rate_bpm, 155.0);
    }
}
