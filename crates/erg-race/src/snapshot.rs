//! 每节拍快照
//!
//! 一个节拍产出一份 [`StrokeSnapshot`]：每条赛道一份采样，外加平行的
//! 影子采样序列（可缺）。赛道数量与下标在一次训练内固定。
//! [`SnapshotCell`] 把最新快照无锁地发布给渲染协作方。

use arc_swap::ArcSwapOption;
use erg_protocol::StrokeSample;
use std::sync::Arc;

/// 一个聚合节拍的产出
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeSnapshot {
    strokes: Vec<StrokeSample>,
    shadows: Vec<Option<StrokeSample>>,
}

impl StrokeSnapshot {
    /// 按赛道数构造，所有槽位初始为空采样
    pub fn new(lane_count: usize) -> Self {
        Self {
            strokes: vec![StrokeSample::empty(); lane_count],
            shadows: vec![None; lane_count],
        }
    }

    pub fn lane_count(&self) -> usize {
        self.strokes.len()
    }

    pub fn stroke(&self, lane: usize) -> &StrokeSample {
        &self.strokes[lane]
    }

    pub fn shadow(&self, lane: usize) -> Option<&StrokeSample> {
        self.shadows[lane].as_ref()
    }

    pub fn set_stroke(&mut self, lane: usize, sample: StrokeSample) {
        self.strokes[lane] = sample;
    }

    pub fn set_shadow(&mut self, lane: usize, sample: StrokeSample) {
        self.shadows[lane] = Some(sample);
    }

    pub fn strokes(&self) -> &[StrokeSample] {
        &self.strokes
    }
}

/// 最新快照单元（无锁读取）
///
/// 聚合线程每节拍 store 一次，渲染线程任意频率 load，互不阻塞。
#[derive(Default)]
pub struct SnapshotCell {
    latest: ArcSwapOption<StrokeSnapshot>,
}

impl SnapshotCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// 发布新快照
    pub fn publish(&self, snapshot: StrokeSnapshot) {
        self.latest.store(Some(Arc::new(snapshot)));
    }

    /// 读取最新快照（尚无快照时为 None）
    pub fn latest(&self) -> Option<Arc<StrokeSnapshot>> {
        self.latest.load_full()
    }

    /// 清空（训练结束后复位）
    pub fn clear(&self) {
        self.latest.store(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use erg_protocol::StrokeStatus;

    /// 槽位写入读取与影子缺省
    #[test]
    fn test_snapshot_slots() {
        let mut snap = StrokeSnapshot::new(2);
        assert_eq!(snap.lane_count(), 2);
        assert!(snap.shadow(0).is_none());

        let mut s = StrokeSample::empty();
        s.status = StrokeStatus::EndOfStroke;
        s.distance_m = 42.0;
        snap.set_stroke(1, s);
        snap.set_shadow(0, s);

        assert_eq!(snap.stroke(1).distance_m, 42.0);
        assert_eq!(snap.shadow(0).unwrap().distance_m, 42.0);
        assert_eq!(snap.stroke(0).distance_m, -1.0);
    }

    /// 单元发布覆盖旧快照，clear 后为空
    #[test]
    fn test_snapshot_cell() {
        let cell = SnapshotCell::new();
        assert!(cell.latest().is_none());

        cell.publish(StrokeSnapshot::new(1));
        cell.publish(StrokeSnapshot::new(3));
        assert_eq!(cell.latest().unwrap().lane_count(), 3);

        cell.clear();
        assert!(cell.latest().is_none());
    }
}
