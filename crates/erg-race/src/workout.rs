//! 训练与赛道描述
//!
//! 赛道来源用标签变体表达：人类（设备驱动，带测功仪编号）或配速手
//! （固定配速 / 录像回放）。聚合器按标签分派，不做具体类型探测。

use crate::RaceError;
use erg_driver::StartMode;
use erg_protocol::WorkoutType;
use std::path::PathBuf;

/// 配速手描述
#[derive(Debug, Clone, PartialEq)]
pub enum PacerSpec {
    /// 固定配速：按恒定 500 米分段时间匀速推进
    FixedSplit {
        /// 500 米分段时间（秒），时间目标训练用
        split: f32,
        /// 划完全程的目标用时（秒）
        finish_time: f32,
    },
    /// 录像回放：按此前记录的检查点序列推进
    Recorded { path: PathBuf },
}

/// 赛道上的划手
#[derive(Debug, Clone, PartialEq)]
pub enum RowerKind {
    /// 人类划手，通过共享链路上的测功仪编号寻址
    Human { ergo_number: u8 },
    /// 合成配速手，无硬件
    Pacer(PacerSpec),
}

/// 一条赛道
#[derive(Debug, Clone, PartialEq)]
pub struct Lane {
    pub name: String,
    pub rower: RowerKind,
    /// 附在人类赛道上的影子配速手（"幽灵船"）
    pub shadow: Option<PacerSpec>,
}

impl Lane {
    pub fn human(name: impl Into<String>, ergo_number: u8) -> Self {
        Self {
            name: name.into(),
            rower: RowerKind::Human { ergo_number },
            shadow: None,
        }
    }

    pub fn pacer(name: impl Into<String>, spec: PacerSpec) -> Self {
        Self {
            name: name.into(),
            rower: RowerKind::Pacer(spec),
            shadow: None,
        }
    }

    pub fn with_shadow(mut self, spec: PacerSpec) -> Self {
        self.shadow = Some(spec);
        self
    }

    pub fn is_human(&self) -> bool {
        matches!(self.rower, RowerKind::Human { .. })
    }
}

/// 一次训练的完整描述
#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    workout_type: WorkoutType,
    /// 距离目标（米），距离训练设置
    distance_m: Option<f32>,
    /// 时间目标（秒），时间训练设置
    duration_s: Option<f32>,
    /// 河道显示长度（米），渲染协作方消费
    show_distance_m: Option<f32>,
    start_mode: StartMode,
    lanes: Vec<Lane>,
}

impl Workout {
    /// 距离目标训练
    pub fn distance(meters: f32) -> Self {
        Self {
            workout_type: WorkoutType::Distance,
            distance_m: Some(meters),
            duration_s: None,
            show_distance_m: None,
            start_mode: StartMode::OnStroke,
            lanes: Vec::new(),
        }
    }

    /// 时间目标训练
    pub fn time(seconds: f32) -> Self {
        Self {
            workout_type: WorkoutType::Time,
            distance_m: None,
            duration_s: Some(seconds),
            show_distance_m: None,
            start_mode: StartMode::OnStroke,
            lanes: Vec::new(),
        }
    }

    /// 自由划：单条人类赛道，无目标，下一桨开始
    pub fn just_row() -> Self {
        Self {
            workout_type: WorkoutType::JustRow,
            distance_m: None,
            duration_s: None,
            show_distance_m: None,
            start_mode: StartMode::OnStroke,
            lanes: vec![Lane::human("", 0)],
        }
    }

    pub fn with_start_mode(mut self, mode: StartMode) -> Self {
        self.start_mode = mode;
        self
    }

    pub fn with_show_distance(mut self, meters: f32) -> Self {
        self.show_distance_m = Some(meters);
        self
    }

    pub fn add_lane(mut self, lane: Lane) -> Self {
        self.lanes.push(lane);
        self
    }

    pub fn workout_type(&self) -> WorkoutType {
        self.workout_type
    }

    pub fn start_mode(&self) -> StartMode {
        self.start_mode
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    pub fn human_lane_count(&self) -> usize {
        self.lanes.iter().filter(|l| l.is_human()).count()
    }

    pub fn show_distance(&self) -> Option<f32> {
        self.show_distance_m
    }

    /// 设定命令的目标值：距离训练为米数，时间训练为秒数
    pub fn target(&self) -> Option<f32> {
        match self.workout_type {
            WorkoutType::Distance => self.distance_m,
            WorkoutType::Time => self.duration_s,
            WorkoutType::JustRow => None,
        }
    }

    /// 距离目标（米）
    pub fn target_distance(&self) -> Option<f32> {
        self.distance_m
    }

    /// 校验赛道/训练组合
    ///
    /// - 至少一条赛道
    /// - 配速手赛道要求至少一条人类赛道存在：配速手的时钟锚定在平滑
    ///   后的人类时间上，纯配速手阵容没有可用锚点
    /// - 影子只能附在人类赛道上
    /// - 距离/时间训练必须有对应目标值
    pub fn validate(&self) -> Result<(), RaceError> {
        if self.lanes.is_empty() {
            return Err(RaceError::Configuration("workout has no lanes".into()));
        }

        let humans = self.human_lane_count();
        if humans == 0 {
            return Err(RaceError::Configuration(
                "pacer lanes require at least one human lane as time anchor".into(),
            ));
        }

        for lane in &self.lanes {
            if lane.shadow.is_some() && !lane.is_human() {
                return Err(RaceError::Configuration(format!(
                    "lane '{}': shadows can only attach to human lanes",
                    lane.name
                )));
            }
        }

        match self.workout_type {
            WorkoutType::Distance if self.distance_m.is_none() => Err(RaceError::Configuration(
                "distance workout without target distance".into(),
            )),
            WorkoutType::Time if self.duration_s.is_none() => Err(RaceError::Configuration(
                "time workout without target duration".into(),
            )),
            _ => Ok(()),
        }
    }
}
