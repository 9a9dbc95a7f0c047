//! 驱动层错误类型定义

use erg_protocol::ProtocolError;
use erg_serial::SerialError;
use thiserror::Error;

/// 驱动层错误类型
#[derive(Error, Debug)]
pub enum DriverError {
    /// 串口层错误
    #[error("Serial error: {0}")]
    Serial(#[from] SerialError),

    /// 协议解析错误
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// 已有一条打开的链路（设备物理上只有一台）
    #[error("An erg link is already open in this process")]
    LinkAlreadyOpen,

    /// 设备在限定时间内未应答
    #[error("Device did not respond within the configured timeout")]
    DeviceTimeout,

    /// RX 线程异常退出
    #[error("RX thread error: {0}")]
    RxThread(String),

    /// 无效输入（如缺少端口名）
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

#[cfg(test)]
mod tests {
    use super::DriverError;
    use erg_serial::SerialError;

    /// Display 信息包含底层错误内容
    #[test]
    fn test_error_display() {
        let e = DriverError::Serial(SerialError::Timeout);
        assert!(format!("{e}").contains("Read timeout"));

        let e = DriverError::LinkAlreadyOpen;
        assert!(format!("{e}").contains("already open"));

        let e = DriverError::RxThread("boom".to_string());
        assert!(format!("{e}").contains("boom"));
    }

    /// From<SerialError> 转换
    #[test]
    fn test_from_serial_error() {
        let e: DriverError = SerialError::Disconnected.into();
        assert!(matches!(e, DriverError::Serial(SerialError::Disconnected)));
    }
}
