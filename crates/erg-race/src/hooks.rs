//! 逐桨记录回调
//!
//! 训练日志的文件格式由协作方实现，这里只定义聚合器向外的调用面：
//! 人类赛道每划完一桨回调一次，训练结束/中止各回调一次。回调在聚合
//! 节拍内同步执行，实现方应尽快返回（缓冲写盘，别在回调里刷新）。

use erg_protocol::StrokeSample;

/// 逐桨记录回调接口
pub trait StrokeHook: Send {
    /// 该赛道划完一桨
    fn on_stroke(&mut self, lane: usize, sample: &StrokeSample);

    /// 该赛道报告训练结束（编排方停止节拍后不再触发）
    fn on_workout_finished(&mut self, lane: usize, sample: &StrokeSample);

    /// 训练被中止
    fn on_workout_aborted(&mut self, lane: usize);
}
