//! serialport 后端
//!
//! 基于 `serialport` crate 的真实硬件适配器。端口参数在打开时一次性
//! 固定为 PM2+ 要求的 9600-8-N-1，之后不可更改。

use crate::{FRAME_LEN, SerialError, SerialRx, SerialTx, SplittableSerial};
use serialport::SerialPort;
use std::io::Read;
use std::time::Duration;
use tracing::debug;

/// PM2+ 固定波特率
pub const BAUD_RATE: u32 = 9600;

/// 已打开的串口（未拆分）
pub struct PortAdapter {
    port: Box<dyn SerialPort>,
    name: String,
}

impl PortAdapter {
    /// 按固定配置打开一个命名端口
    ///
    /// # 错误
    /// - [`SerialError::PortInUse`]: 端口被其他进程持有或不存在
    /// - [`SerialError::UnsupportedConfig`]: 固定参数无法应用
    /// - [`SerialError::Io`]: 其余流获取失败
    pub fn open(name: &str) -> Result<Self, SerialError> {
        let port = serialport::new(name, BAUD_RATE)
            .data_bits(serialport::DataBits::Eight)
            .stop_bits(serialport::StopBits::One)
            .parity(serialport::Parity::None)
            .flow_control(serialport::FlowControl::None)
            .timeout(Duration::from_millis(500))
            .open()
            .map_err(|e| match e.kind {
                serialport::ErrorKind::NoDevice => SerialError::PortInUse {
                    port: name.to_string(),
                },
                serialport::ErrorKind::InvalidInput => {
                    SerialError::UnsupportedConfig(e.description)
                },
                _ => SerialError::Io(std::io::Error::other(e.description)),
            })?;

        debug!(port = name, baud = BAUD_RATE, "serial port opened");
        Ok(Self {
            port,
            name: name.to_string(),
        })
    }

    /// 端口名
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl SplittableSerial for PortAdapter {
    type Rx = PortRx;
    type Tx = PortTx;

    /// 通过 `try_clone` 拆出独立的收发句柄
    ///
    /// `read_timeout` 只作用于 RX 半；TX 半保留打开时的写超时。
    fn split(self, read_timeout: Duration) -> Result<(PortRx, PortTx), SerialError> {
        let mut rx_port = self
            .port
            .try_clone()
            .map_err(|e| SerialError::Io(std::io::Error::other(e.description)))?;
        rx_port
            .set_timeout(read_timeout)
            .map_err(|e| SerialError::UnsupportedConfig(e.description))?;

        Ok((
            PortRx {
                port: rx_port,
                pending: Vec::with_capacity(FRAME_LEN),
            },
            PortTx { port: self.port },
        ))
    }
}

/// 接收半部
pub struct PortRx {
    port: Box<dyn SerialPort>,
    /// 跨调用保留的部分帧字节
    pending: Vec<u8>,
}

impl SerialRx for PortRx {
    fn read_frame(&mut self) -> Result<[u8; FRAME_LEN], SerialError> {
        let mut chunk = [0u8; FRAME_LEN];

        while self.pending.len() < FRAME_LEN {
            let n = match self.port.read(&mut chunk) {
                Ok(0) => return Err(SerialError::Disconnected),
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => {
                    return Err(SerialError::Timeout);
                },
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                    return Err(SerialError::Disconnected);
                },
                Err(e) => return Err(SerialError::Io(e)),
            };
            self.pending.extend_from_slice(&chunk[..n]);
        }

        let mut frame = [0u8; FRAME_LEN];
        frame.copy_from_slice(&self.pending[..FRAME_LEN]);
        self.pending.drain(..FRAME_LEN);
        Ok(frame)
    }
}

/// 发送半部
pub struct PortTx {
    port: Box<dyn SerialPort>,
}

impl SerialTx for PortTx {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), SerialError> {
        use std::io::Write;

        self.port.write_all(bytes)?;
        self.port.flush()?;
        Ok(())
    }
}
