//! 单槽交接
//!
//! RX 线程与轮询线程之间唯一的共享可变状态。槽里至多保存一份在途采样
//! 快照：生产侧每收到一帧覆盖写入并置位就绪；消费侧阻塞等待就绪，
//! 取走快照并复位。协议保证同一时刻至多一个未完成请求，因此覆盖写入
//! 不会丢失有效数据。
//!
//! 用「布尔标志 + yield 自旋」也能做这件事，但那样的跨线程可见性
//! 没有保证；这里用 Mutex + Condvar 给出显式同步契约，唤醒延迟仍在
//! 协议往返（几十毫秒）之下一个量级。

use erg_protocol::StrokeSample;
use parking_lot::{Condvar, Mutex};
use std::time::Duration;

/// 单槽交接原语
///
/// 严格的「请求-等待-消费」循环，绝不流水线化：调用方必须先取走上一个
/// 结果再发起下一次查询。
#[derive(Default)]
pub struct StrokeSlot {
    sample: Mutex<Option<StrokeSample>>,
    ready: Condvar,
}

impl StrokeSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// 生产侧：写入快照并唤醒消费者
    ///
    /// 每个接收帧恰好调用一次。槽被占用时直接覆盖。
    pub fn publish(&self, sample: StrokeSample) {
        *self.sample.lock() = Some(sample);
        self.ready.notify_one();
    }

    /// 消费侧：阻塞等待就绪，取走快照并复位
    ///
    /// `timeout` 为 `None` 时无限等待：设备失联会挂起调用线程，
    /// 仅用于协议保真测试。限时等待超时返回 `None`。
    pub fn wait_and_take(&self, timeout: Option<Duration>) -> Option<StrokeSample> {
        let mut guard = self.sample.lock();

        match timeout {
            None => {
                while guard.is_none() {
                    self.ready.wait(&mut guard);
                }
            },
            Some(limit) => {
                let deadline = std::time::Instant::now() + limit;
                while guard.is_none() {
                    if self.ready.wait_until(&mut guard, deadline).timed_out() {
                        return None;
                    }
                }
            },
        }

        guard.take()
    }

    /// 丢弃残留的快照（新一轮查询序列开始前调用）
    pub fn reset(&self) {
        *self.sample.lock() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use erg_protocol::{StrokeSample, StrokeStatus};
    use std::sync::Arc;
    use std::thread;

    fn sample_with_distance(d: f32) -> StrokeSample {
        StrokeSample {
            status: StrokeStatus::EndOfStroke,
            distance_m: d,
            ..StrokeSample::empty()
        }
    }

    /// 先等待后生产：消费者阻塞直到被唤醒，恰好消费一次
    #[test]
    fn test_consumer_blocks_until_signaled() {
        let slot = Arc::new(StrokeSlot::new());
        let slot2 = Arc::clone(&slot);

        let consumer = thread::spawn(move || slot2.wait_and_take(Some(Duration::from_secs(2))));
        thread::sleep(Duration::from_millis(30));
        slot.publish(sample_with_distance(125.0));

        let taken = consumer.join().unwrap().expect("consumer timed out");
        assert_eq!(taken.distance_m, 125.0);
    }

    /// 两次生产-消费循环之间不泄漏旧快照
    #[test]
    fn test_no_stale_sample_across_cycles() {
        let slot = StrokeSlot::new();

        slot.publish(sample_with_distance(100.0));
        let first = slot.wait_and_take(Some(Duration::from_millis(50))).unwrap();
        assert_eq!(first.distance_m, 100.0);

        // 第二轮必须重新等待，不能拿到第一轮的残留
        assert!(slot.wait_and_take(Some(Duration::from_millis(20))).is_none());

        slot.publish(sample_with_distance(200.0));
        let second = slot.wait_and_take(Some(Duration::from_millis(50))).unwrap();
        assert_eq!(second.distance_m, 200.0);
    }

    /// 覆盖写入：消费者只看到最后一帧
    #[test]
    fn test_overwrite_keeps_latest() {
        let slot = StrokeSlot::new();
        slot.publish(sample_with_distance(1.0));
        slot.publish(sample_with_distance(2.0));

        let taken = slot.wait_and_take(Some(Duration::from_millis(20))).unwrap();
        assert_eq!(taken.distance_m, 2.0);
    }

    /// reset 丢弃未消费的快照
    #[test]
    fn test_reset_clears_pending() {
        let slot = StrokeSlot::new();
        slot.publish(sample_with_distance(9.0));
        slot.reset();
        assert!(slot.wait_and_take(Some(Duration::from_millis(20))).is_none());
    }
}
