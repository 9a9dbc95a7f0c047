//! 运行配置
//!
//! 串口名、平滑开关、完整数据开关、倒计时时长。显式结构体按引用传递，
//! 用 TOML 落盘。未知字段忽略、缺省字段补默认值，旧配置文件可以直接
//! 升级。

use crate::RaceError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 运行配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceOptions {
    /// 串口名（OS 相关）
    pub serial_port: String,

    /// 船体平滑：在离散的设备时间更新之间插值船的前进
    pub boat_smoothing: bool,

    /// 完整数据：每桨额外查询配速与心率（查询从 2 帧变 4 帧）
    pub full_stroke_data: bool,

    /// 开赛倒计时（秒）
    pub countdown_delay_s: u8,
}

impl Default for RaceOptions {
    fn default() -> Self {
        Self {
            serial_port: default_serial_port(),
            boat_smoothing: true,
            full_stroke_data: false,
            countdown_delay_s: 5,
        }
    }
}

#[cfg(target_os = "windows")]
fn default_serial_port() -> String {
    "COM1".to_string()
}

#[cfg(not(target_os = "windows"))]
fn default_serial_port() -> String {
    "/dev/ttyUSB0".to_string()
}

impl RaceOptions {
    /// 从 TOML 文件装载
    pub fn load(path: &Path) -> Result<Self, RaceError> {
        let options_err = |reason: String| RaceError::Options {
            path: path.to_path_buf(),
            reason,
        };

        let text = std::fs::read_to_string(path).map_err(|e| options_err(e.to_string()))?;
        toml::from_str(&text).map_err(|e| options_err(e.to_string()))
    }

    /// 保存到 TOML 文件
    pub fn save(&self, path: &Path) -> Result<(), RaceError> {
        let options_err = |reason: String| RaceError::Options {
            path: path.to_path_buf(),
            reason,
        };

        let text = toml::to_string_pretty(self).map_err(|e| options_err(e.to_string()))?;
        std::fs::write(path, text).map_err(|e| options_err(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 保存再装载还原全部字段
    #[test]
    fn test_save_load_roundtrip() {
        let mut path = std::env::temp_dir();
        path.push(format!("erg-race-options-{}.toml", std::process::id()));

        let options = RaceOptions {
            serial_port: "/dev/ttyS3".into(),
            boat_smoothing: false,
            full_stroke_data: true,
            countdown_delay_s: 10,
        };
        options.save(&path).unwrap();
        let loaded = RaceOptions::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, options);
    }

    /// 缺省字段补默认值
    #[test]
    fn test_partial_file_fills_defaults() {
        let loaded: RaceOptions = toml::from_str("boat_smoothing = false").unwrap();
        assert!(!loaded.boat_smoothing);
        assert_eq!(loaded.countdown_delay_s, 5);
        assert!(!loaded.full_stroke_data);
    }

    /// 文件缺失报配置错误
    #[test]
    fn test_missing_file() {
        let err = RaceOptions::load(Path::new("/nonexistent/options.toml")).unwrap_err();
        assert!(matches!(err, RaceError::Options { .. }));
    }
}
