//! Per-endpoint clipboard bookkeeping.
//!
//! Each endpoint owns one [`ClipboardTracker`].  For every buffer it records
//! whether the endpoint's copy is stale (`dirty`), whether the endpoint
//! currently owns the buffer, and the last contents known to be on that
//! endpoint.
//!
//! A fresh tracker starts dirty for every buffer, so the first `enter` after a
//! connect always delivers whatever clipboard the server already knows.

use edgeshare_core::{ClipboardData, ClipboardId};

#[derive(Debug, Clone)]
struct BufferState {
    dirty: bool,
    owned: bool,
    contents: Option<ClipboardData>,
}

impl Default for BufferState {
    fn default() -> Self {
        Self {
            dirty: true,
            owned: false,
            contents: None,
        }
    }
}

/// Dirty flag, ownership and cached contents for each [`ClipboardId`].
#[derive(Debug, Clone, Default)]
pub struct ClipboardTracker {
    buffers: [BufferState; ClipboardId::COUNT],
}

impl ClipboardTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` when the endpoint's copy of `id` must be refreshed before use.
    pub fn is_dirty(&self, id: ClipboardId) -> bool {
        self.buffers[id.index()].dirty
    }

    pub fn set_dirty(&mut self, id: ClipboardId, dirty: bool) {
        self.buffers[id.index()].dirty = dirty;
    }

    pub fn is_owner(&self, id: ClipboardId) -> bool {
        self.buffers[id.index()].owned
    }

    /// Records that this endpoint took ownership of `id`.  The owner's own
    /// copy is by definition current.
    pub fn mark_owned(&mut self, id: ClipboardId) {
        let buffer = &mut self.buffers[id.index()];
        buffer.owned = true;
        buffer.dirty = false;
    }

    /// Records that another endpoint took ownership of `id`.
    pub fn mark_grabbed_elsewhere(&mut self, id: ClipboardId) {
        let buffer = &mut self.buffers[id.index()];
        buffer.owned = false;
        buffer.dirty = true;
    }

    /// Last contents known to be on the endpoint.
    pub fn contents(&self, id: ClipboardId) -> Option<&ClipboardData> {
        self.buffers[id.index()].contents.as_ref()
    }

    pub fn store(&mut self, id: ClipboardId, data: ClipboardData) {
        self.buffers[id.index()].contents = Some(data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tracker_is_dirty_for_every_buffer() {
        let tracker = ClipboardTracker::new();
        for id in ClipboardId::ALL {
            assert!(tracker.is_dirty(id));
            assert!(!tracker.is_owner(id));
            assert!(tracker.contents(id).is_none());
        }
    }

    #[test]
    fn test_mark_owned_clears_dirty() {
        let mut tracker = ClipboardTracker::new();
        tracker.mark_owned(ClipboardId::Clipboard);
        assert!(tracker.is_owner(ClipboardId::Clipboard));
        assert!(!tracker.is_dirty(ClipboardId::Clipboard));
        // Selection untouched
        assert!(tracker.is_dirty(ClipboardId::Selection));
    }

    #[test]
    fn test_mark_grabbed_elsewhere_drops_ownership_and_dirties() {
        let mut tracker = ClipboardTracker::new();
        tracker.mark_owned(ClipboardId::Selection);
        tracker.mark_grabbed_elsewhere(ClipboardId::Selection);
        assert!(!tracker.is_owner(ClipboardId::Selection));
        assert!(tracker.is_dirty(ClipboardId::Selection));
    }

    #[test]
    fn test_store_keeps_contents_per_buffer() {
        let mut tracker = ClipboardTracker::new();
        tracker.store(ClipboardId::Clipboard, ClipboardData::from_text("hello"));
        assert_eq!(
            tracker.contents(ClipboardId::Clipboard),
            Some(&ClipboardData::from_text("hello"))
        );
        assert!(tracker.contents(ClipboardId::Selection).is_none());
    }
}
