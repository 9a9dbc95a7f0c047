//! Builder 模式实现
//!
//! 提供链式构造 [`ErgLink`] 实例的便捷方式。构造即占用进程级链路
//! 名额、打开端口并拉起 RX 线程；任何一步失败都会释放已占用的资源。

use crate::assembler::FrameAssembler;
use crate::error::DriverError;
use crate::link::{self, ErgLink};
use crate::pipeline::rx_loop;
use crate::slot::StrokeSlot;
use erg_protocol::WorkoutType;
use erg_serial::SplittableSerial;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

/// 设备无应答的默认等待上限
///
/// 正常往返几十毫秒；2 秒足以判定设备失联。
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(2);

/// RX 半部的默认读取超时（决定关闭时 RX 线程的退出延迟）
const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(500);

/// ErgLink Builder（链式构造）
///
/// # Example
///
/// ```no_run
/// use erg_driver::ErgLinkBuilder;
/// use erg_protocol::WorkoutType;
///
/// let link = ErgLinkBuilder::new()
///     .port("/dev/ttyUSB0")
///     .workout_type(WorkoutType::Distance)
///     .full_data(true)
///     .build()
///     .unwrap();
/// ```
pub struct ErgLinkBuilder {
    port: Option<String>,
    workout: WorkoutType,
    full_data: bool,
    response_timeout: Option<Duration>,
    read_timeout: Duration,
}

impl ErgLinkBuilder {
    pub fn new() -> Self {
        Self {
            port: None,
            workout: WorkoutType::JustRow,
            full_data: false,
            response_timeout: Some(DEFAULT_RESPONSE_TIMEOUT),
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }

    /// 串口名（如 "/dev/ttyUSB0"、"COM3"）
    pub fn port(mut self, port: impl Into<String>) -> Self {
        self.port = Some(port.into());
        self
    }

    /// 训练类型（影响状态字节重映射与设定命令）
    pub fn workout_type(mut self, workout: WorkoutType) -> Self {
        self.workout = workout;
        self
    }

    /// 是否查询完整数据（配速与心率，默认关闭）
    pub fn full_data(mut self, full_data: bool) -> Self {
        self.full_data = full_data;
        self
    }

    /// 设备应答的等待上限（默认 2 秒）
    pub fn response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = Some(timeout);
        self
    }

    /// 关闭应答等待上限
    ///
    /// 无限等待：设备失联会挂起轮询线程。仅用于协议保真测试。
    pub fn no_response_timeout(mut self) -> Self {
        self.response_timeout = None;
        self
    }

    /// RX 半部的读取超时（默认 500ms）
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// 打开命名端口并构建链路
    #[cfg(feature = "serialport")]
    pub fn build(self) -> Result<ErgLink, DriverError> {
        let port = self
            .port
            .clone()
            .ok_or_else(|| DriverError::InvalidInput("serial port name not set".into()))?;

        link::claim_link()?;
        let adapter = match erg_serial::PortAdapter::open(&port) {
            Ok(adapter) => adapter,
            Err(e) => {
                link::release_link();
                return Err(e.into());
            },
        };
        self.spawn(adapter)
    }

    /// 在任意可拆分适配器上构建链路（测试注入模拟后端用）
    pub fn build_with(self, adapter: impl SplittableSerial) -> Result<ErgLink, DriverError> {
        link::claim_link()?;
        self.spawn(adapter)
    }

    /// 占用名额之后的公共构建路径，失败时释放名额
    fn spawn(self, adapter: impl SplittableSerial) -> Result<ErgLink, DriverError> {
        let (rx, tx) = match adapter.split(self.read_timeout) {
            Ok(halves) => halves,
            Err(e) => {
                link::release_link();
                return Err(e.into());
            },
        };

        let slot = Arc::new(StrokeSlot::new());
        let assembler = Arc::new(Mutex::new(FrameAssembler::new(self.workout, Arc::clone(&slot))));
        let running = Arc::new(AtomicBool::new(true));
        let (err_tx, err_rx) = crossbeam_channel::bounded(1);

        let thread_assembler = Arc::clone(&assembler);
        let thread_running = Arc::clone(&running);
        let rx_thread = std::thread::Builder::new()
            .name("erg-rx".into())
            .spawn(move || {
                #[cfg(feature = "realtime")]
                if let Err(e) = thread_priority::set_current_thread_priority(
                    thread_priority::ThreadPriority::Max,
                ) {
                    tracing::warn!(error = ?e, "failed to raise rx thread priority");
                }

                rx_loop(rx, thread_assembler, thread_running, err_tx);
            })
            .map_err(|e| {
                link::release_link();
                DriverError::RxThread(e.to_string())
            })?;

        Ok(ErgLink::new(
            Box::new(tx),
            slot,
            assembler,
            running,
            rx_thread,
            err_rx,
            self.workout,
            self.full_data,
            self.response_timeout,
        ))
    }
}

impl Default for ErgLinkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
