//! # Erg Protocol
//!
//! PM2+ 划船测功仪串口协议定义（无硬件依赖）
//!
//! ## 模块
//!
//! - `command`: 命令字节常量定义
//! - `frame`: 5 字节应答帧解析
//! - `status`: 设备状态字节重映射
//! - `sample`: 单次采样数据与派生量计算
//!
//! ## 字节序
//!
//! 应答帧中的 4 字节浮点数按**传输逆序**重组（最后到达的字节为最高位），
//! 再按 IEEE-754 单精度位模式解释。设定命令的目标值则按最低位在前的顺序
//! 逐字节发送。本模块提供两个方向的转换工具函数。

pub mod command;
pub mod frame;
pub mod sample;
pub mod status;

// 重新导出常用类型
pub use command::*;
pub use frame::*;
pub use sample::*;
pub use status::*;

use thiserror::Error;

/// 协议解析错误类型
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Invalid frame length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Unknown command byte: 0x{0:02X}")]
    UnknownCommand(u8),
}
