//! 聚合层错误类型定义

use erg_driver::DriverError;
use std::path::PathBuf;
use thiserror::Error;

/// 聚合层错误类型
#[derive(Error, Debug)]
pub enum RaceError {
    /// 设备链路错误（单个节拍失败，训练可中止）
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// 录像检查点文件缺失或无法解析（开赛前的致命错误）
    #[error("Replay file error ({path}): {reason}")]
    ReplayFile { path: PathBuf, reason: String },

    /// 无效的赛道/训练组合
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// 配置文件读写失败
    #[error("Options error ({path}): {reason}")]
    Options { path: PathBuf, reason: String },
}
