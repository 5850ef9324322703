// 单槽位交接单元
//
// 热键线程产出的预截图、覆盖层产出的保存路径都通过它移交：
// 写入覆盖旧值，读取一次性取走并清空。只保留最新值，
// 过期数据被静默丢弃，因此不需要队列。

use parking_lot::Mutex;

/// 写覆盖、读清空的单槽位共享单元
#[derive(Debug)]
pub struct HandoffSlot<T> {
    slot: Mutex<Option<T>>,
}

impl<T> HandoffSlot<T> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// 写入新值，覆盖任何未被消费的旧值
    pub fn store(&self, value: T) {
        *self.slot.lock() = Some(value);
    }

    /// 取走当前值并清空槽位；槽位为空时返回 None
    pub fn take(&self) -> Option<T> {
        self.slot.lock().take()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.lock().is_none()
    }
}

impl<T> Default for HandoffSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_then_take_returns_value_and_empties() {
        let slot = HandoffSlot::new();
        slot.store(7);
        assert_eq!(slot.take(), Some(7));
        assert!(slot.is_empty());
    }

    #[test]
    fn take_on_empty_is_none_and_stays_empty() {
        let slot: HandoffSlot<i32> = HandoffSlot::new();
        assert_eq!(slot.take(), None);
        assert_eq!(slot.take(), None);
        assert!(slot.is_empty());
    }

    #[test]
    fn second_store_overwrites_stale_value() {
        let slot = HandoffSlot::new();
        slot.store("stale");
        slot.store("fresh");
        assert_eq!(slot.take(), Some("fresh"));
        assert_eq!(slot.take(), None);
    }

    #[test]
    fn works_across_threads() {
        use std::sync::Arc;

        let slot = Arc::new(HandoffSlot::new());
        let producer = Arc::clone(&slot);
        let handle = std::thread::spawn(move || {
            producer.store(42u32);
        });
        handle.join().unwrap();
        assert_eq!(slot.take(), Some(42));
    }
}
