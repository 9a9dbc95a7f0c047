//! 设备链路
//!
//! [`ErgLink`] 对外封装一台 PM2+：持有串口发送半部和后台 RX 线程，
//! 提供锁定/设定/开始/查询/关闭的完整命令面。一个进程同一时刻至多
//! 打开一条链路：设备物理上只有一台，多条人类赛道通过各自的测功仪
//! 编号在这一条链路上复用。

use crate::assembler::FrameAssembler;
use crate::error::DriverError;
use crate::slot::StrokeSlot;
use crossbeam_channel::Receiver;
use erg_protocol::{
    BASIC_QUERY_SEQUENCE, Command, FULL_QUERY_SEQUENCE, SETTLE_AFTER_CONTROL, SETTLE_AFTER_START,
    StrokeSample, WorkoutType, encode_setup_target,
};
use erg_serial::SerialTx;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, info, warn};

/// 进程级链路占用标志
///
/// 第二次打开立即报 [`DriverError::LinkAlreadyOpen`]，而不是悄悄
/// 共享状态。
static LINK_CLAIMED: AtomicBool = AtomicBool::new(false);

pub(crate) fn claim_link() -> Result<(), DriverError> {
    if LINK_CLAIMED
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
    {
        return Err(DriverError::LinkAlreadyOpen);
    }
    Ok(())
}

pub(crate) fn release_link() {
    LINK_CLAIMED.store(false, Ordering::Release);
}

/// 计时开始方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartMode {
    /// 下一桨开始
    OnStroke,
    /// 立即开始（倒计时结束时用）
    Immediate,
}

/// 一台已打开的 PM2+ 链路
///
/// 由 [`ErgLinkBuilder`](crate::ErgLinkBuilder) 构造。[`Drop`] 时尽力
/// 执行解锁-静置-收线，但无法上报错误；建议显式调用 [`ErgLink::close`]。
pub struct ErgLink {
    tx: Box<dyn SerialTx>,
    slot: Arc<StrokeSlot>,
    assembler: Arc<Mutex<FrameAssembler>>,
    running: Arc<AtomicBool>,
    rx_thread: Option<JoinHandle<()>>,
    err_rx: Receiver<DriverError>,
    workout: WorkoutType,
    query_plan: &'static [Command],
    response_timeout: Option<Duration>,
    closed: bool,
}

impl ErgLink {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        tx: Box<dyn SerialTx>,
        slot: Arc<StrokeSlot>,
        assembler: Arc<Mutex<FrameAssembler>>,
        running: Arc<AtomicBool>,
        rx_thread: JoinHandle<()>,
        err_rx: Receiver<DriverError>,
        workout: WorkoutType,
        full_data: bool,
        response_timeout: Option<Duration>,
    ) -> Self {
        Self {
            tx,
            slot,
            assembler,
            running,
            rx_thread: Some(rx_thread),
            err_rx,
            workout,
            query_plan: if full_data {
                FULL_QUERY_SEQUENCE
            } else {
                BASIC_QUERY_SEQUENCE
            },
            response_timeout,
            closed: false,
        }
    }

    /// 本链路的训练类型
    pub fn workout_type(&self) -> WorkoutType {
        self.workout
    }

    /// 设定训练目标并锁定设备
    ///
    /// 序列：锁定、静置；设定命令 + 4 字节目标值（逐字节发送）、静置；
    /// 再次锁定、静置。重锁是设备的已知怪癖：设定后不重锁，面板会
    /// 退出受控状态。自由划只做锁定。
    ///
    /// `target`：距离训练为米数，时间训练为秒数，自由划忽略。
    pub fn setup_workout(&mut self, target: Option<f32>) -> Result<(), DriverError> {
        self.tx.write_bytes(&[Command::Lock.into()])?;
        spin_sleep::sleep(SETTLE_AFTER_CONTROL);

        let setup = match self.workout {
            WorkoutType::Distance => Some(Command::SetupDistance),
            WorkoutType::Time => Some(Command::SetupTime),
            WorkoutType::JustRow => None,
        };

        if let Some(cmd) = setup {
            let target = target.ok_or_else(|| {
                DriverError::InvalidInput("workout target required for distance/time setup".into())
            })?;

            self.tx.write_bytes(&[cmd.into()])?;
            for byte in encode_setup_target(target) {
                self.tx.write_bytes(&[byte])?;
            }
            spin_sleep::sleep(SETTLE_AFTER_CONTROL);
        }

        self.tx.write_bytes(&[Command::Lock.into()])?;
        spin_sleep::sleep(SETTLE_AFTER_CONTROL);

        info!(workout = ?self.workout, target = ?target, "workout setup complete");
        Ok(())
    }

    /// 发出开始计时命令
    pub fn start_rowing(&mut self, mode: StartMode) -> Result<(), DriverError> {
        let cmd = match mode {
            StartMode::OnStroke => Command::StartOnStroke,
            StartMode::Immediate => Command::StartNow,
        };
        self.tx.write_bytes(&[cmd.into()])?;
        // 静置压到最短，命令发出后尽快起划
        spin_sleep::sleep(SETTLE_AFTER_START);
        Ok(())
    }

    /// 在面板显示倒计时数字（不静置，倒计时节奏由调用方掌握）
    pub fn display_count(&mut self, digit: u8) -> Result<(), DriverError> {
        self.tx.write_bytes(&[Command::DisplayNumber.into(), digit])?;
        Ok(())
    }

    /// 在面板显示名次
    pub fn display_place(&mut self, place: u8) -> Result<(), DriverError> {
        self.tx.write_bytes(&[Command::DisplayPlace.into(), place])?;
        Ok(())
    }

    /// 向指定编号的测功仪发一轮查询序列，阻塞到采样完整
    ///
    /// 严格一问一答：每个命令发出后等待交接槽就绪再发下一个。完整数据
    /// 模式查 4 帧（距离、时间、配速、心率），否则查 2 帧。
    ///
    /// # 错误
    /// - [`DriverError::DeviceTimeout`]: 限时等待超时（未配置限时则挂起）
    /// - RX 线程已上报的链路故障优先于超时返回
    pub fn retrieve_stroke(&mut self, ergo_number: u8) -> Result<StrokeSample, DriverError> {
        self.assembler.lock().reset();
        self.slot.reset();

        let mut latest = None;
        for &cmd in self.query_plan {
            self.tx.write_bytes(&[cmd.into(), ergo_number])?;

            match self.slot.wait_and_take(self.response_timeout) {
                Some(sample) => latest = Some(sample),
                None => {
                    return Err(self.take_rx_error().unwrap_or(DriverError::DeviceTimeout));
                },
            }
        }

        // 查询序列至少两条命令，latest 必已填充
        latest.ok_or_else(|| DriverError::InvalidInput("empty query plan".into()))
    }

    /// 解锁设备并关闭链路
    ///
    /// 幂等：重复调用是空操作。协议要求解锁后静置约 100ms 才能释放
    /// 端口，否则设备可能停留在锁定态影响下一次会话。RX 线程在一个
    /// 读取超时内退出，join 是有界的。
    pub fn close(&mut self) -> Result<(), DriverError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let unlock = self.tx.write_bytes(&[Command::Unlock.into()]);
        spin_sleep::sleep(SETTLE_AFTER_CONTROL);

        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.rx_thread.take()
            && handle.join().is_err()
        {
            warn!("rx thread panicked during shutdown");
        }

        release_link();
        debug!("erg link closed");

        unlock.map_err(Into::into)
    }

    fn take_rx_error(&self) -> Option<DriverError> {
        self.err_rx.try_recv().ok()
    }
}

impl Drop for ErgLink {
    fn drop(&mut self) {
        if !self.closed
            && let Err(e) = self.close()
        {
            warn!(error = %e, "erg link close failed in drop");
        }
    }
}
