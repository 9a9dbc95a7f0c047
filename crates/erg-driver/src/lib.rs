//! # Erg Driver
//!
//! 驱动层模块，提供 PM2+ 的设备链路功能，包括：
//!
//! - RX 线程管理（后台读取 5 字节应答帧）
//! - 帧折叠状态机（四次应答折叠为一份采样）
//! - 单槽交接（RX 线程与轮询线程之间的同步原语）
//! - 命令发送与协议时序（锁定/设定/静置/重锁）
//! - 进程级单链路约束（同一时刻至多一条打开的链路）
//!
//! # 使用场景
//!
//! 适用于需要直接驱动设备收发的场景。大多数用户应该使用 `erg-race`
//! 提供的聚合层接口。

mod assembler;
mod builder;
mod error;
pub mod pipeline;
mod link;
mod slot;

pub use assembler::FrameAssembler;
pub use builder::ErgLinkBuilder;
pub use error::DriverError;
pub use link::{ErgLink, StartMode};
pub use slot::StrokeSlot;
