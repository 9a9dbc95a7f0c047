//! # Erg Serial Adapter Layer
//!
//! 串口硬件抽象层，提供统一的收发接口抽象。
//!
//! PM2+ 走 9600-8-N-1 的半双工一问一答协议：轮询线程写命令字节，
//! RX 线程阻塞读取固定 5 字节应答帧。两个方向分别抽象为 [`SerialTx`]
//! 和 [`SerialRx`]，由 [`SplittableSerial`] 从同一个已打开的端口拆出，
//! 供驱动层把读写放到不同线程。

use std::time::Duration;
use thiserror::Error;

// 重新导出 erg-protocol 中的帧长度
pub use erg_protocol::FRAME_LEN;

#[cfg(feature = "serialport")]
pub mod port;

#[cfg(feature = "serialport")]
pub use port::{PortAdapter, PortRx, PortTx};

#[cfg(any(test, feature = "mock"))]
pub mod mock;

#[cfg(any(test, feature = "mock"))]
pub use mock::{MockSerial, MockSerialRx, MockSerialTx, Responder};

/// 串口适配层统一错误类型
#[derive(Error, Debug)]
pub enum SerialError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    /// 端口被其他进程占用或不存在
    #[error("Port in use or unavailable: {port}")]
    PortInUse { port: String },
    /// 固定参数（9600-8-N-1）无法应用到该端口
    #[error("Unsupported port configuration: {0}")]
    UnsupportedConfig(String),
    #[error("Read timeout")]
    Timeout,
    #[error("Port disconnected")]
    Disconnected,
}

impl SerialError {
    /// 是否为不可恢复错误（链路应当关闭）
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SerialError::PortInUse { .. } | SerialError::UnsupportedConfig(_) | SerialError::Disconnected
        )
    }
}

/// 发送方向：逐字节写命令
pub trait SerialTx: Send {
    /// 写入并立即刷出一串命令字节
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), SerialError>;
}

/// 接收方向：阻塞读取一个完整应答帧
pub trait SerialRx: Send {
    /// 读满一个 5 字节帧或超时
    ///
    /// 超时返回 [`SerialError::Timeout`]；已累积的部分帧字节必须保留到
    /// 下一次调用，不得丢弃。
    fn read_frame(&mut self) -> Result<[u8; FRAME_LEN], SerialError>;
}

/// 可拆分的串口适配器
///
/// 打开后拆成独立的收发两半：RX 半交给后台接收线程独占，
/// TX 半留在轮询线程。
pub trait SplittableSerial {
    type Rx: SerialRx + 'static;
    type Tx: SerialTx + 'static;

    fn split(self, read_timeout: Duration) -> Result<(Self::Rx, Self::Tx), SerialError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 致命错误分类
    #[test]
    fn test_error_fatality() {
        assert!(SerialError::PortInUse { port: "COM3".into() }.is_fatal());
        assert!(SerialError::Disconnected.is_fatal());
        assert!(SerialError::UnsupportedConfig("parity".into()).is_fatal());
        assert!(!SerialError::Timeout.is_fatal());
        assert!(!SerialError::Io(std::io::Error::other("x")).is_fatal());
    }
}
