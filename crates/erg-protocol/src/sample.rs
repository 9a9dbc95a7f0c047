//! 单次采样数据
//!
//! [`StrokeSample`] 是一次测量节拍的快照。聚合层每个节拍为每条赛道构造
//! 一份，放入快照后不再修改。未采到的字段统一取 -1。
//!
//! 派生量全部是功率的纯函数，公式来自设备的简化桨叶模型：
//!
//! ```text
//! power = 2.8 / pace³          （pace 为秒每米）
//! m/s   = (power / 2.8)^(1/3)
//! cal/h = power · 4 · 0.8604 + 300
//! ```

use crate::status::StrokeStatus;

/// 浮点字段的未设置值
pub const UNSET: f32 = -1.0;

/// 桨频字段的未设置值
pub const UNSET_RATE: i32 = -1;

/// 一次测量节拍的快照
///
/// 同一来源一次训练内的 `distance_m` 与 `elapsed_s` 单调不减；
/// `status == EndOfWorkout` 为该来源的终态。
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StrokeSample {
    /// 归一化状态
    pub status: StrokeStatus,
    /// 已划距离（米），-1 未设置
    pub distance_m: f32,
    /// 已划时间（秒），-1 未设置
    pub elapsed_s: f32,
    /// 桨频（桨/分钟），-1 未设置
    pub stroke_rate: i32,
    /// 心率（次/分钟），由原始心率周期导出，-1 未设置
    pub heart_rate_bpm: f32,
    /// 功率（瓦），由原始配速导出，-1 未设置
    pub power_w: f64,
}

impl Default for StrokeSample {
    fn default() -> Self {
        Self {
            status: StrokeStatus::Unset,
            distance_m: UNSET,
            elapsed_s: UNSET,
            stroke_rate: UNSET_RATE,
            heart_rate_bpm: UNSET,
            power_w: UNSET as f64,
        }
    }
}

impl StrokeSample {
    /// 全未设置的空样本
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_end_of_stroke(&self) -> bool {
        self.status.is_end_of_stroke()
    }

    pub fn is_end_of_workout(&self) -> bool {
        self.status.is_end_of_workout()
    }

    /// 船速（米/秒）
    ///
    /// 功率非正时为 0（尚未起划）。
    pub fn meters_per_second(&self) -> f64 {
        if self.power_w <= 0.0 {
            0.0
        } else {
            (self.power_w / 2.8).powf(1.0 / 3.0)
        }
    }

    /// 每小时卡路里消耗
    ///
    /// 功率非正时为 0，而不是静息值 300。
    pub fn calories_per_hour(&self) -> f64 {
        if self.power_w <= 0.0 {
            0.0
        } else {
            self.power_w * (4.0 * 0.8604) + 300.0
        }
    }

    /// 500 米分段配速，"分.秒" 复合形式
    ///
    /// 整数部分是分钟，小数部分是秒除以 100（即 1.30 表示 1 分 30 秒）。
    /// 划船界的标准配速表示，显示层直接拆开渲染。
    pub fn split_per_500m(&self) -> f64 {
        if self.power_w <= 0.0 {
            return 0.0;
        }

        let minutes_per_500 = 500.0 / (self.meters_per_second() * 60.0);
        let mins = minutes_per_500.trunc();
        let seconds = (minutes_per_500 - mins) * 60.0 / 100.0;

        mins + seconds
    }
}

/// 原始配速值导出功率
///
/// 配速非正时不套用立方公式，原值直接带回（上游据此区分「未起划」
/// 与「未设置」）。
pub fn power_from_pace(pace: f32) -> f64 {
    if pace > 0.0 {
        2.8 / (pace as f64).powi(3)
    } else {
        pace as f64
    }
}

/// 原始心率周期导出心率（次/分钟）
///
/// 周期 0 映射为心率 0。整数除法截断后再转浮点：周期 10000 得 57。
pub fn heart_rate_from_period(period: u32) -> f32 {
    if period == 0 { 0.0 } else { (576_000 / period) as f32 }
}
