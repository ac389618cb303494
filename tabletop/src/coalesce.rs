//! Frame-rate write coalescing.
//!
//! Pointer moves can arrive many times per display frame. [`FrameBatch`]
//! keeps only the most recent value and tells the caller when a frame tick
//! needs to be requested, so the authoritative store is written at most once
//! per frame. It knows nothing about any rendering runtime.

#[derive(Debug)]
pub struct FrameBatch<T> {
    pending: Option<T>,
    tick_requested: bool,
}

impl<T> Default for FrameBatch<T> {
    fn default() -> Self {
        Self {
            pending: None,
            tick_requested: false,
        }
    }
}

impl<T> FrameBatch<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value`, replacing any unflushed one. Returns `true` when the
    /// caller must request a tick; at most one request is outstanding.
    pub fn write(&mut self, value: T) -> bool {
        self.pending = Some(value);
        self.request_tick()
    }

    /// Ask for a tick with nothing to apply, e.g. to poll a timer. Returns
    /// `true` only when no request is already outstanding.
    pub fn request_tick(&mut self) -> bool {
        if self.tick_requested {
            false
        } else {
            self.tick_requested = true;
            true
        }
    }

    /// Called on a frame tick: hands back the latest value, if any, and
    /// clears the outstanding request.
    pub fn flush(&mut self) -> Option<T> {
        self.tick_requested = false;
        self.pending.take()
    }

    /// Drop any unflushed value without applying it. A tick already
    /// requested stays outstanding until the next flush.
    pub fn discard(&mut self) {
        self.pending = None;
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_write_wins_within_a_tick() {
        let mut batch = FrameBatch::new();
        assert!(batch.write(1));
        assert!(!batch.write(2));
        assert!(!batch.write(3));
        assert_eq!(batch.flush(), Some(3));
        assert_eq!(batch.flush(), None);
    }

    #[test]
    fn test_new_request_after_flush() {
        let mut batch = FrameBatch::new();
        assert!(batch.write("a"));
        batch.flush();
        assert!(batch.write("b"));
    }

    #[test]
    fn test_discard_keeps_outstanding_request() {
        let mut batch = FrameBatch::new();
        assert!(batch.write(5));
        batch.discard();
        assert!(!batch.is_pending());
        assert!(!batch.write(6));
        assert_eq!(batch.flush(), Some(6));
        assert!(batch.write(7));
    }

    #[test]
    fn test_bare_tick_request_shares_the_slot() {
        let mut batch: FrameBatch<u8> = FrameBatch::new();
        assert!(batch.request_tick());
        assert!(!batch.write(1));
        assert!(!batch.request_tick());
        assert_eq!(batch.flush(), Some(1));
        assert!(batch.request_tick());
    }
}
