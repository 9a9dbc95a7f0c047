//! 设备状态字节重映射
//!
//! 查询应答的状态字节由「训练类型基码 + 事件掩码位」组成。距离目标训练
//! 基码 0xC4，时间目标训练基码 0xC8；桨结束加 2，训练结束加 1（场地赛
//! 模式下还会再加 16，含义未完全确定，两种训练结束变体归一化为同一终态）。
//! 自由划（无目标）不做重映射，原始码原样携带。

/// 训练类型
///
/// 影响状态字节重映射与设定命令的选择。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WorkoutType {
    /// 自由划，无目标，设备不报训练结束
    #[default]
    JustRow,
    /// 距离目标
    Distance,
    /// 时间目标
    Time,
}

/// 距离目标训练的状态基码
pub const DISTANCE_WORKOUT_BASE: u8 = 0xC4;

/// 时间目标训练的状态基码
pub const TIME_WORKOUT_BASE: u8 = 0xC8;

/// 训练结束掩码位
pub const END_OF_WORKOUT_MASK: u8 = 1;

/// 桨结束掩码位
pub const END_OF_STROKE_MASK: u8 = 2;

/// 场地赛附加掩码位（具体含义未确定）
pub const VENUE_RACING_MASK: u8 = 16;

/// 归一化后的采样状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StrokeStatus {
    /// 尚未收到状态
    #[default]
    Unset,
    /// 一桨结束
    EndOfStroke,
    /// 训练结束（该来源的终态，之后不再查询）
    EndOfWorkout,
    /// 未识别的原始设备码
    Device(u8),
}

impl StrokeStatus {
    /// 从设备状态字节归一化
    ///
    /// 只有与训练类型匹配的基码组合会被重映射，其余原样携带为
    /// [`StrokeStatus::Device`]。
    pub fn from_device(byte: u8, workout: WorkoutType) -> Self {
        let base = match workout {
            WorkoutType::Distance => DISTANCE_WORKOUT_BASE,
            WorkoutType::Time => TIME_WORKOUT_BASE,
            WorkoutType::JustRow => return StrokeStatus::Device(byte),
        };

        if byte == base + END_OF_WORKOUT_MASK || byte == base + END_OF_WORKOUT_MASK + VENUE_RACING_MASK
        {
            StrokeStatus::EndOfWorkout
        } else if byte == base + END_OF_STROKE_MASK {
            StrokeStatus::EndOfStroke
        } else {
            StrokeStatus::Device(byte)
        }
    }

    pub fn is_end_of_stroke(self) -> bool {
        self == StrokeStatus::EndOfStroke
    }

    pub fn is_end_of_workout(self) -> bool {
        self == StrokeStatus::EndOfWorkout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 距离训练：基码 + 掩码的三种组合
    #[test]
    fn test_distance_workout_remap() {
        let w = WorkoutType::Distance;
        assert_eq!(StrokeStatus::from_device(0xC4 + 1, w), StrokeStatus::EndOfWorkout);
        assert_eq!(StrokeStatus::from_device(0xC4 + 1 + 16, w), StrokeStatus::EndOfWorkout);
        assert_eq!(StrokeStatus::from_device(0xC4 + 2, w), StrokeStatus::EndOfStroke);
        assert_eq!(StrokeStatus::from_device(0xC4, w), StrokeStatus::Device(0xC4));
    }

    /// 时间训练基码 0xC8
    #[test]
    fn test_time_workout_remap() {
        let w = WorkoutType::Time;
        assert_eq!(StrokeStatus::from_device(0xC8 + 1, w), StrokeStatus::EndOfWorkout);
        assert_eq!(StrokeStatus::from_device(0xC8 + 1 + 16, w), StrokeStatus::EndOfWorkout);
        assert_eq!(StrokeStatus::from_device(0xC8 + 2, w), StrokeStatus::EndOfStroke);
        // 距离基码在时间训练下不匹配
        assert_eq!(StrokeStatus::from_device(0xC4 + 2, w), StrokeStatus::Device(0xC6));
    }

    /// 自由划不重映射
    #[test]
    fn test_just_row_no_remap() {
        assert_eq!(
            StrokeStatus::from_device(0xC4 + 2, WorkoutType::JustRow),
            StrokeStatus::Device(0xC6)
        );
    }

    /// 两种训练结束变体归一化为同一终态
    #[test]
    fn test_end_of_workout_variants_normalize() {
        let plain = StrokeStatus::from_device(0xC9, WorkoutType::Time);
        let venue = StrokeStatus::from_device(0xC9 + 16, WorkoutType::Time);
        assert_eq!(plain, venue);
        assert!(plain.is_end_of_workout());
    }
}
