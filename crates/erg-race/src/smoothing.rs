//! 平滑时钟
//!
//! 设备大约一秒更新一次时间，直接渲染会让船一跳一跳地前进。平滑时钟
//! 在两次设备更新之间垫一个持续增长的 lag：设备报告的时间一变就重置
//! 毫秒锚点，lag 取锚点以来的墙钟秒数并钳制在 1.0。钳制挡住了船往
//! 回漂，但只是视觉动机的公式，不是物理模型，不要外推。
//!
//! 配速手与影子用同一个平滑时钟取样，与人类参照船步调一致。

use std::time::Instant;

/// 平滑时钟
#[derive(Debug, Clone)]
pub struct LagClock {
    /// 设备最近一次报告的训练时间
    last_time: f32,
    /// 最近一次时间变化的墙钟锚点
    anchor: Instant,
}

impl LagClock {
    pub fn new() -> Self {
        Self {
            last_time: -1.0,
            anchor: Instant::now(),
        }
    }

    /// 平滑路径：喂入设备报告的时间，返回当前 lag（0.0..=1.0）
    pub fn update(&mut self, device_time: f32) -> f32 {
        self.update_at(device_time, Instant::now())
    }

    /// 非平滑路径：只记录设备时间，lag 恒为 0
    pub fn track_raw(&mut self, device_time: f32) {
        self.last_time = device_time;
    }

    /// 最近一次设备报告的时间
    pub fn last_time(&self) -> f32 {
        self.last_time
    }

    /// 平滑后的显示时间
    pub fn smoothed_time(&self, lag: f32) -> f32 {
        self.last_time + lag
    }

    fn update_at(&mut self, device_time: f32, now: Instant) -> f32 {
        if device_time != self.last_time {
            self.last_time = device_time;
            self.anchor = now;
        }

        let lag = now.saturating_duration_since(self.anchor).as_secs_f32();
        lag.min(1.0)
    }
}

impl Default for LagClock {
    fn default() -> Self {
        Self::new()
    }
}
