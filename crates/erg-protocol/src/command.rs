//! 命令字节定义
//!
//! PM2+ 采用半双工一问一答协议：主机写入一个命令字节（查询命令附带一个
//! 测功仪编号参数字节），设备以固定 5 字节帧应答。命令取值是该设备家族
//! 特有的，不构成通用串口框架。

use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::time::Duration;

/// PM2+ 命令字节
///
/// | 命令 | 字节 | 参数 |
/// |------|------|------|
/// | Lock | 0xE0 | 无 |
/// | Unlock | 0xC7 | 无 |
/// | QueryDistance | 0xB0 | 测功仪编号 |
/// | QueryPace | 0xB1 | 测功仪编号 |
/// | QueryHeart | 0xB2 | 测功仪编号 |
/// | QueryTime | 0xB3 | 测功仪编号 |
/// | SetupDistance | 0x94 | 4 字节目标值 |
/// | SetupTime | 0x95 | 4 字节目标值 |
/// | StartOnStroke | 0xC5 | 无 |
/// | StartNow | 0xC6 | 无 |
/// | DisplayNumber | 0x99 | 显示的数字 |
/// | DisplayPlace | 0x93 | 名次 |
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum Command {
    /// 锁定设备面板
    Lock = 0xE0,
    /// 解锁设备面板
    Unlock = 0xC7,
    /// 查询已划距离
    QueryDistance = 0xB0,
    /// 查询当前配速
    QueryPace = 0xB1,
    /// 查询心率周期
    QueryHeart = 0xB2,
    /// 查询已划时间
    QueryTime = 0xB3,
    /// 设定距离目标训练
    SetupDistance = 0x94,
    /// 设定时间目标训练
    SetupTime = 0x95,
    /// 下一桨开始计时
    StartOnStroke = 0xC5,
    /// 立即开始计时
    StartNow = 0xC6,
    /// 在面板上显示数字（倒计时用）
    DisplayNumber = 0x99,
    /// 在面板上显示名次
    DisplayPlace = 0x93,
}

impl Command {
    /// 命令是否附带测功仪编号参数
    pub fn takes_ergo_number(self) -> bool {
        matches!(
            self,
            Command::QueryDistance | Command::QueryPace | Command::QueryHeart | Command::QueryTime
        )
    }
}

/// 基础查询序列（距离、时间）
///
/// 帧组装器按此顺序折叠应答，调用方必须保证发出顺序一致。
pub const BASIC_QUERY_SEQUENCE: &[Command] = &[Command::QueryDistance, Command::QueryTime];

/// 完整查询序列（距离、时间、配速、心率）
pub const FULL_QUERY_SEQUENCE: &[Command] = &[
    Command::QueryDistance,
    Command::QueryTime,
    Command::QueryPace,
    Command::QueryHeart,
];

/// 锁定/解锁/设定后的静置时间
///
/// 设备在这些命令后需要约 100ms 处理时间，期间写入会被丢弃。
pub const SETTLE_AFTER_CONTROL: Duration = Duration::from_millis(100);

/// 开始命令后的静置时间（尽量短，保证尽快起划）
pub const SETTLE_AFTER_START: Duration = Duration::from_millis(10);
