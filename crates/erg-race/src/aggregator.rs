//! 节拍聚合器
//!
//! 外部渲染循环以固定节拍调用 [`StrokeAggregator::collect_tick`]。每个
//! 节拍对每条赛道取一份采样：人类赛道经共享链路按测功仪编号发一轮
//! 查询并阻塞等完整；配速手赛道直接用平滑后的训练时间合成。采样合并
//! 成快照后发布，所有人类赛道都报训练结束时向编排方发完成事件：
//! 在快照交付之后，且只发一次。
//!
//! 节拍内的设备故障让该节拍以错误返回（可恢复：训练仍可中止），聚合
//! 器自己绝不重试查询（一问一答没有幂等重放保证）。节拍之间才
//! 检查中止（协作式取消，在途往返不被打断）。

use crate::hooks::StrokeHook;
use crate::pacer::PacerSource;
use crate::smoothing::LagClock;
use crate::snapshot::{SnapshotCell, StrokeSnapshot};
use crate::workout::{RowerKind, Workout};
use crate::{RaceError, RaceOptions};
use crossbeam_channel::{Receiver, Sender};
use erg_driver::ErgLink;
use std::sync::Arc;
use tracing::{info, warn};

/// 发给编排方的生命周期事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RaceEvent {
    /// 所有人类赛道完成训练（最终快照交付之后发出，恰好一次）
    WorkoutFinished,
    /// 训练被中止
    WorkoutAborted,
    /// 节拍内的设备故障（同一错误也经 `collect_tick` 的返回值上抛）
    DeviceError(String),
}

/// 赛道来源（按标签分派，不做类型探测）
enum LaneSource {
    Human { ergo_number: u8 },
    Pacer(PacerSource),
}

/// 节拍聚合器
pub struct StrokeAggregator {
    workout: Workout,
    options: RaceOptions,
    link: ErgLink,
    sources: Vec<LaneSource>,
    shadows: Vec<Option<PacerSource>>,
    hooks: Vec<Option<Box<dyn StrokeHook>>>,
    clock: LagClock,
    cell: Arc<SnapshotCell>,
    event_tx: Sender<RaceEvent>,
    finished: bool,
    aborted: bool,
}

impl std::fmt::Debug for StrokeAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrokeAggregator")
            .field("finished", &self.finished)
            .field("aborted", &self.aborted)
            .finish_non_exhaustive()
    }
}

impl StrokeAggregator {
    /// 构建聚合器并完成设备端训练设定
    ///
    /// 链路由调用方显式构建并移交所有权。开赛前的任何失败（阵容校验、
    /// 录像装载、设定命令）都在这里返回，绝不带病开赛。
    pub fn new(
        workout: Workout,
        options: RaceOptions,
        mut link: ErgLink,
    ) -> Result<(Self, Receiver<RaceEvent>), RaceError> {
        workout.validate()?;

        if link.workout_type() != workout.workout_type() {
            return Err(RaceError::Configuration(format!(
                "link opened for {:?} but workout is {:?}",
                link.workout_type(),
                workout.workout_type()
            )));
        }

        let mut sources = Vec::with_capacity(workout.lane_count());
        let mut shadows = Vec::with_capacity(workout.lane_count());
        let mut hooks = Vec::with_capacity(workout.lane_count());

        for lane in workout.lanes() {
            let source = match &lane.rower {
                RowerKind::Human { ergo_number } => LaneSource::Human {
                    ergo_number: *ergo_number,
                },
                RowerKind::Pacer(spec) => LaneSource::Pacer(PacerSource::from_spec(
                    spec,
                    workout.workout_type(),
                    workout.target_distance(),
                )?),
            };
            sources.push(source);

            shadows.push(match &lane.shadow {
                Some(spec) => Some(PacerSource::from_spec(
                    spec,
                    workout.workout_type(),
                    workout.target_distance(),
                )?),
                None => None,
            });
            hooks.push(None);
        }

        // 设备端设定：锁定、写目标、重锁
        link.setup_workout(workout.target())?;

        let (event_tx, event_rx) = crossbeam_channel::unbounded();

        Ok((
            Self {
                workout,
                options,
                link,
                sources,
                shadows,
                hooks,
                clock: LagClock::new(),
                cell: Arc::new(SnapshotCell::new()),
                event_tx,
                finished: false,
                aborted: false,
            },
            event_rx,
        ))
    }

    /// 给某条人类赛道挂一个逐桨记录回调
    pub fn set_hook(&mut self, lane: usize, hook: Box<dyn StrokeHook>) -> Result<(), RaceError> {
        match self.workout.lanes().get(lane) {
            Some(l) if l.is_human() => {
                self.hooks[lane] = Some(hook);
                Ok(())
            },
            Some(_) => Err(RaceError::Configuration(format!(
                "lane {lane} is not a human lane"
            ))),
            None => Err(RaceError::Configuration(format!("no such lane: {lane}"))),
        }
    }

    /// 渲染协作方读取最新快照的单元
    pub fn snapshot_cell(&self) -> Arc<SnapshotCell> {
        Arc::clone(&self.cell)
    }

    /// 所有人类赛道是否已完成
    pub fn finished(&self) -> bool {
        self.finished
    }

    /// 在设备面板显示倒计时数字
    pub fn display_countdown(&mut self, seconds_remaining: u8) -> Result<(), RaceError> {
        self.link.display_count(seconds_remaining)?;
        Ok(())
    }

    /// 按训练配置的方式发出开始命令
    pub fn start_rowing(&mut self) -> Result<(), RaceError> {
        self.link.start_rowing(self.workout.start_mode())?;
        Ok(())
    }

    /// 聚合一个节拍
    pub fn collect_tick(&mut self) -> Result<StrokeSnapshot, RaceError> {
        let lane_count = self.sources.len();
        let mut snapshot = StrokeSnapshot::new(lane_count);
        let mut all_finished = true;
        let mut lag = 0.0f32;

        for i in 0..lane_count {
            let ergo = match &self.sources[i] {
                LaneSource::Human { ergo_number } => Some(*ergo_number),
                LaneSource::Pacer(_) => None,
            };

            if let Some(ergo) = ergo {
                let mut stroke = match self.link.retrieve_stroke(ergo) {
                    Ok(stroke) => stroke,
                    Err(e) => {
                        warn!(lane = i, error = %e, "tick aborted on device error");
                        let _ = self.event_tx.send(RaceEvent::DeviceError(e.to_string()));
                        return Err(e.into());
                    },
                };

                if self.options.boat_smoothing {
                    // 设备时间一秒一跳，显示时间用 lag 垫出连续前进
                    lag = self.clock.update(stroke.elapsed_s);
                    stroke.elapsed_s = self.clock.smoothed_time(lag);
                } else {
                    self.clock.track_raw(stroke.elapsed_s);
                }

                snapshot.set_stroke(i, stroke);

                // 影子与人类参照船共用同一条平滑时钟
                let shadow_time = self.clock.smoothed_time(lag);
                if let Some(shadow) = self.shadows[i].as_mut() {
                    snapshot.set_shadow(i, shadow.sample_at(shadow_time));
                }

                if let Some(hook) = self.hooks[i].as_mut() {
                    if stroke.is_end_of_stroke() {
                        hook.on_stroke(i, &stroke);
                    }
                    if stroke.is_end_of_workout() {
                        hook.on_workout_finished(i, &stroke);
                    }
                }

                all_finished = all_finished && stroke.is_end_of_workout();
            } else {
                let t = self.clock.smoothed_time(lag);
                if let LaneSource::Pacer(p) = &mut self.sources[i] {
                    snapshot.set_stroke(i, p.sample_at(t));
                }
            }
        }

        self.cell.publish(snapshot.clone());

        // 完成信号在快照交付之后，且只发一次
        if all_finished && !self.finished {
            self.finished = true;
            info!("workout finished on all human lanes");
            let _ = self.event_tx.send(RaceEvent::WorkoutFinished);
        }

        Ok(snapshot)
    }

    /// 中止训练
    ///
    /// 不打断在途的节拍（协作式取消：编排方在节拍之间调用）。回调与
    /// 事件只发一次。
    pub fn abort(&mut self) {
        if self.aborted {
            return;
        }
        self.aborted = true;

        for (i, hook) in self.hooks.iter_mut().enumerate() {
            if let Some(hook) = hook.as_mut() {
                hook.on_workout_aborted(i);
            }
        }
        info!("workout aborted");
        let _ = self.event_tx.send(RaceEvent::WorkoutAborted);
    }

    /// 关闭设备链路
    ///
    /// 解锁-静置序列完成后端口才释放，设备不会留在锁定态。
    pub fn shutdown(&mut self) -> Result<(), RaceError> {
        self.link.close()?;
        Ok(())
    }
}
