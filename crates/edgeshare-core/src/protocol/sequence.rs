//! Enter sequence numbers.
//!
//! Every `enter` the orchestrator issues carries a fresh number from a
//! [`SequenceCounter`].  Receivers keep a [`SequenceGate`] and drop any `enter`
//! that is not newer than the last one they accepted, so a delayed or
//! duplicated `enter` can never undo a later handoff.
//!
//! # Wrap-around
//!
//! Numbers are `u32` and wrap.  Comparison uses serial-number arithmetic: `a`
//! is newer than `b` when `a - b` (wrapping) is a positive `i32`.  This keeps
//! ordering correct across the wrap as long as fewer than 2^31 enters separate
//! the two values.

/// Returns `true` if `candidate` is strictly newer than `reference`.
pub fn is_newer(candidate: u32, reference: u32) -> bool {
    (candidate.wrapping_sub(reference) as i32) > 0
}

/// Monotonic counter owned by the orchestrator.
///
/// Not shared across threads: it is only touched on the serialized control
/// path, so a plain field is enough.
#[derive(Debug, Clone, Default)]
pub struct SequenceCounter {
    current: u32,
}

impl SequenceCounter {
    /// Creates a counter whose first [`next`](Self::next) returns 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the counter and returns the new value.  Wraps at `u32::MAX`.
    pub fn next(&mut self) -> u32 {
        self.current = self.current.wrapping_add(1);
        self.current
    }

    /// Returns the most recently issued value (0 before the first call).
    pub fn current(&self) -> u32 {
        self.current
    }
}

/// Receiver-side filter that accepts only strictly newer sequence numbers.
#[derive(Debug, Clone, Default)]
pub struct SequenceGate {
    last: Option<u32>,
}

impl SequenceGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `seq` and returns `true` if it is newer than everything seen
    /// so far; returns `false` (and records nothing) for stale or duplicate
    /// values.
    pub fn accept(&mut self, seq: u32) -> bool {
        match self.last {
            Some(last) if !is_newer(seq, last) => false,
            _ => {
                self.last = Some(seq);
                true
            }
        }
    }

    /// The last accepted value.
    pub fn last(&self) -> Option<u32> {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_starts_at_one() {
        let mut counter = SequenceCounter::new();
        assert_eq!(counter.current(), 0);
        assert_eq!(counter.next(), 1);
        assert_eq!(counter.current(), 1);
    }

    #[test]
    fn test_counter_wraps_at_u32_max() {
        let mut counter = SequenceCounter { current: u32::MAX };
        assert_eq!(counter.next(), 0);
        assert_eq!(counter.next(), 1);
    }

    #[test]
    fn test_gate_accepts_first_value() {
        let mut gate = SequenceGate::new();
        assert!(gate.accept(7));
        assert_eq!(gate.last(), Some(7));
    }

    #[test]
    fn test_gate_rejects_older_value() {
        let mut gate = SequenceGate::new();
        assert!(gate.accept(5));
        assert!(!gate.accept(4));
        assert_eq!(gate.last(), Some(5), "stale value must not be recorded");
    }

    #[test]
    fn test_gate_rejects_duplicate_value() {
        let mut gate = SequenceGate::new();
        assert!(gate.accept(5));
        assert!(!gate.accept(5));
    }

    #[test]
    fn test_gate_accepts_across_wrap() {
        let mut gate = SequenceGate::new();
        assert!(gate.accept(u32::MAX));
        assert!(gate.accept(0), "0 follows u32::MAX");
        assert!(!gate.accept(u32::MAX));
    }

    #[test]
    fn test_is_newer_is_antisymmetric() {
        assert!(is_newer(10, 9));
        assert!(!is_newer(9, 10));
        assert!(!is_newer(9, 9));
    }
}
