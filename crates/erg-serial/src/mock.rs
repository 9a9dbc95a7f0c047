//! 可编程模拟后端
//!
//! 无硬件测试用。写入的命令字节交给一个可编程应答器（[`Responder`]），
//! 应答器产出的帧进入接收队列，由 RX 半按真实时序阻塞读出。
//!
//! # 使用示例
//!
//! ```ignore
//! // 需要启用 `mock` feature
//! use erg_serial::{MockSerial, SerialRx, SerialTx, SplittableSerial};
//! use std::time::Duration;
//!
//! // 对任何两字节查询回一个固定帧
//! let mock = MockSerial::new(|bytes: &[u8]| {
//!     if bytes.len() == 2 {
//!         vec![[bytes[0], 0, 0, 0, 0]]
//!     } else {
//!         vec![]
//!     }
//! });
//! let (mut rx, mut tx) = mock.split(Duration::from_millis(10)).unwrap();
//!
//! tx.write_bytes(&[0xB0, 0x00]).unwrap();
//! assert_eq!(rx.read_frame().unwrap()[0], 0xB0);
//! ```

use crate::{FRAME_LEN, SerialError, SerialRx, SerialTx, SplittableSerial};
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// 模拟设备的应答逻辑
///
/// 每次 TX 写入调用一次，入参是写入的字节，返回要排队给 RX 的帧。
pub type Responder = Box<dyn FnMut(&[u8]) -> Vec<[u8; FRAME_LEN]> + Send>;

struct Shared {
    queue: Mutex<MockState>,
    data_ready: Condvar,
}

struct MockState {
    frames: VecDeque<[u8; FRAME_LEN]>,
    responder: Responder,
    disconnected: bool,
}

/// 模拟串口（未拆分）
pub struct MockSerial {
    shared: Arc<Shared>,
}

impl MockSerial {
    pub fn new(responder: impl FnMut(&[u8]) -> Vec<[u8; FRAME_LEN]> + Send + 'static) -> Self {
        Self {
            shared: Arc::new(Shared {
                queue: Mutex::new(MockState {
                    frames: VecDeque::new(),
                    responder: Box::new(responder),
                    disconnected: false,
                }),
                data_ready: Condvar::new(),
            }),
        }
    }

    /// 返回一个断连开关，用于模拟设备中途拔线
    pub fn disconnect_handle(&self) -> DisconnectHandle {
        DisconnectHandle {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl SplittableSerial for MockSerial {
    type Rx = MockSerialRx;
    type Tx = MockSerialTx;

    fn split(self, read_timeout: Duration) -> Result<(MockSerialRx, MockSerialTx), SerialError> {
        Ok((
            MockSerialRx {
                shared: Arc::clone(&self.shared),
                read_timeout,
            },
            MockSerialTx {
                shared: self.shared,
            },
        ))
    }
}

/// 模拟拔线开关
pub struct DisconnectHandle {
    shared: Arc<Shared>,
}

impl DisconnectHandle {
    pub fn disconnect(&self) {
        self.shared.queue.lock().disconnected = true;
        self.shared.data_ready.notify_all();
    }
}

/// 模拟接收半部
pub struct MockSerialRx {
    shared: Arc<Shared>,
    read_timeout: Duration,
}

impl SerialRx for MockSerialRx {
    fn read_frame(&mut self) -> Result<[u8; FRAME_LEN], SerialError> {
        let mut state = self.shared.queue.lock();

        loop {
            if state.disconnected {
                return Err(SerialError::Disconnected);
            }
            if let Some(frame) = state.frames.pop_front() {
                return Ok(frame);
            }
            if self
                .shared
                .data_ready
                .wait_for(&mut state, self.read_timeout)
                .timed_out()
            {
                return Err(SerialError::Timeout);
            }
        }
    }
}

/// 模拟发送半部
pub struct MockSerialTx {
    shared: Arc<Shared>,
}

impl SerialTx for MockSerialTx {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), SerialError> {
        let mut state = self.shared.queue.lock();
        if state.disconnected {
            return Err(SerialError::Disconnected);
        }

        let frames = (state.responder)(bytes);
        let produced = !frames.is_empty();
        state.frames.extend(frames);
        drop(state);

        if produced {
            self.shared.data_ready.notify_all();
        }
        Ok(())
    }
}
