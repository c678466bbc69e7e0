use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// A channel that holds at most one unread value.
///
/// The channel is meant to be shared, e.g. through an [`std::sync::Arc`], between exactly one
/// producer and one consumer. Its behaviour on [`SlotChannel::send`] depends on the mode it
/// was created with:
///
/// * synchronous: the producer blocks until the consumer took the previous value, so every
///   value is delivered exactly once and in order.
/// * overwrite: the producer never blocks and replaces any unread value, which is dropped
///   without being delivered. The consumer always sees the most recent value.
///
/// There is no built-in cancellation; callers arrange their own stop signal, e.g. by sending
/// an `Option<T>` with `None` as sentinel.
///
/// # Example
///
/// ```
/// use darkhelp_sync::SlotChannel;
/// use std::sync::Arc;
///
/// let channel = Arc::new(SlotChannel::synchronous());
///
/// let producer = {
///     let channel = channel.clone();
///     std::thread::spawn(move || {
///         for i in 0..3 {
///             channel.send(i);
///         }
///     })
/// };
///
/// let received: Vec<i32> = (0..3).map(|_| channel.receive()).collect();
/// producer.join().unwrap();
///
/// assert_eq!(received, vec![0, 1, 2]);
/// ```
pub struct SlotChannel<T> {
    slot: Mutex<Option<T>>,
    changed: Condvar,
    sync: bool,
}

impl<T> SlotChannel<T> {
    /// Create an empty channel.
    ///
    /// # Arguments
    ///
    /// * `sync` - `true` to make [`SlotChannel::send`] wait for the slot to be empty,
    ///   `false` to overwrite any pending value.
    pub fn new(sync: bool) -> Self {
        Self {
            slot: Mutex::new(None),
            changed: Condvar::new(),
            sync,
        }
    }

    /// Create an empty channel where `send` blocks until the previous value was received.
    pub fn synchronous() -> Self {
        Self::new(true)
    }

    /// Create an empty channel where `send` replaces any pending value.
    pub fn overwrite() -> Self {
        Self::new(false)
    }

    /// Returns true if `send` waits for the slot to be empty.
    pub fn is_sync(&self) -> bool {
        self.sync
    }

    // the slot is always left in a consistent state, so a panicking peer is not fatal
    fn lock(&self) -> MutexGuard<'_, Option<T>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Move a value into the slot.
    ///
    /// In synchronous mode this blocks until the slot is empty. In overwrite mode it returns
    /// immediately and any pending value is dropped.
    pub fn send(&self, value: T) {
        let mut slot = if self.sync {
            self.changed
                .wait_while(self.lock(), |slot| slot.is_some())
                .unwrap_or_else(PoisonError::into_inner)
        } else {
            self.lock()
        };
        let previous = slot.replace(value);
        drop(slot);
        self.changed.notify_all();

        if previous.is_some() {
            log::trace!("slot channel: dropping an unread value");
        }
        // the overwritten value is dropped here, outside of the lock
        drop(previous);
    }

    /// Block until a value is present, then take it and leave the slot empty.
    pub fn receive(&self) -> T {
        let mut slot = self.lock();
        let value = loop {
            let pending = slot.take();
            if let Some(value) = pending {
                break value;
            }
            slot = self
                .changed
                .wait(slot)
                .unwrap_or_else(PoisonError::into_inner);
        };
        drop(slot);
        self.changed.notify_all();
        value
    }

    /// Take the pending value if there is one, without blocking.
    pub fn try_receive(&self) -> Option<T> {
        let value = self.lock().take();
        if value.is_some() {
            self.changed.notify_all();
        }
        value
    }

    /// Like [`SlotChannel::receive`] but gives up after `timeout`.
    ///
    /// Returns `None` if no value arrived in time.
    pub fn receive_timeout(&self, timeout: Duration) -> Option<T> {
        let (mut slot, _) = self
            .changed
            .wait_timeout_while(self.lock(), timeout, |slot| slot.is_none())
            .unwrap_or_else(PoisonError::into_inner);

        let value = slot.take();
        drop(slot);
        if value.is_some() {
            self.changed.notify_all();
        }
        value
    }

    /// Returns true if a value is pending right now.
    ///
    /// The answer is advisory: the other side may change it right after the call returns.
    pub fn is_present(&self) -> bool {
        self.lock().is_some()
    }
}

impl<T> std::fmt::Debug for SlotChannel<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotChannel")
            .field("sync", &self.sync)
            .field("present", &self.is_present())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::SlotChannel;
    use std::time::Duration;

    #[test]
    fn empty_after_construction() {
        let sync = SlotChannel::<u8>::synchronous();
        let overwrite = SlotChannel::<u8>::overwrite();
        assert!(sync.is_sync());
        assert!(!overwrite.is_sync());
        assert!(!sync.is_present());
        assert!(!overwrite.is_present());
    }

    #[test]
    fn overwrite_keeps_latest() {
        let channel = SlotChannel::overwrite();
        channel.send("A");
        channel.send("B");
        assert!(channel.is_present());
        assert_eq!(channel.receive(), "B");
        assert!(!channel.is_present());
    }

    #[test]
    fn overwrite_three_values() {
        let channel = SlotChannel::new(false);
        channel.send(1);
        channel.send(2);
        channel.send(3);
        assert_eq!(channel.receive(), 3);
        assert!(!channel.is_present());
    }

    #[test]
    fn overwrite_drops_unread_value() {
        use std::sync::Arc;

        let first = Arc::new(());
        let channel = SlotChannel::overwrite();
        channel.send(first.clone());
        assert_eq!(Arc::strong_count(&first), 2);
        channel.send(Arc::new(()));
        assert_eq!(Arc::strong_count(&first), 1);
    }

    #[test]
    fn try_receive_and_timeout() {
        let channel = SlotChannel::synchronous();
        assert_eq!(channel.try_receive(), None);
        assert_eq!(channel.receive_timeout(Duration::from_millis(10)), None);

        channel.send(7u32);
        assert_eq!(channel.try_receive(), Some(7));
        assert!(!channel.is_present());

        channel.send(8u32);
        assert_eq!(channel.receive_timeout(Duration::from_millis(10)), Some(8));
    }

    #[test]
    fn drop_pending_value_with_channel() {
        use std::sync::Arc;

        let value = Arc::new(());
        {
            let channel = SlotChannel::overwrite();
            channel.send(value.clone());
            assert_eq!(Arc::strong_count(&value), 2);
        }
        assert_eq!(Arc::strong_count(&value), 1);
    }

    #[test]
    fn debug_format() {
        let channel = SlotChannel::synchronous();
        channel.send(1);
        assert_eq!(
            format!("{channel:?}"),
            "SlotChannel { sync: true, present: true }"
        );
    }
}
