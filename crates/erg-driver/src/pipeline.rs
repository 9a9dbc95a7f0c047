//! RX 线程循环
//!
//! 后台线程独占串口的接收半部，阻塞读取应答帧并交给折叠状态机。
//! 读取超时是常态（设备只在被查询时说话），静默跳过；其余错误视为
//! 链路故障：上报错误通道后退出循环，由轮询侧在下一次等待时发现。

use crate::assembler::FrameAssembler;
use crate::error::DriverError;
use crossbeam_channel::Sender;
use erg_serial::{SerialError, SerialRx};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

/// RX 循环
///
/// # 参数
/// - `rx`: 串口接收半部（线程独占）
/// - `assembler`: 折叠状态机（与轮询线程共享，轮询线程只在重置时短暂加锁）
/// - `running`: 运行标志，清除后循环在一个读取超时内退出
/// - `err_tx`: 错误通道，链路故障经此上报
pub fn rx_loop(
    mut rx: impl SerialRx,
    assembler: Arc<Mutex<FrameAssembler>>,
    running: Arc<AtomicBool>,
    err_tx: Sender<DriverError>,
) {
    debug!("rx loop started");

    while running.load(Ordering::Acquire) {
        let frame = match rx.read_frame() {
            Ok(frame) => frame,
            Err(SerialError::Timeout) => continue,
            Err(e) => {
                warn!(error = %e, "rx loop terminating on serial error");
                let _ = err_tx.send(DriverError::Serial(e));
                return;
            },
        };

        if let Err(e) = assembler.lock().ingest(&frame) {
            // 固定长度读取下不应出现，解码失败按链路故障处理
            warn!(error = %e, "rx loop terminating on malformed frame");
            let _ = err_tx.send(DriverError::Protocol(e));
            return;
        }
    }

    debug!("rx loop stopped");
}
