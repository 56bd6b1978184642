//! Clipboard buffer identifiers and contents.

use serde::{Deserialize, Serialize};

/// One of the fixed set of clipboard buffers shared between screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClipboardId {
    /// The system clipboard (Ctrl+C / Ctrl+V).
    Clipboard,
    /// The X11 primary selection.
    Selection,
}

impl ClipboardId {
    /// Number of distinct buffers.
    pub const COUNT: usize = 2;

    /// Every buffer, in index order.
    pub const ALL: [ClipboardId; Self::COUNT] = [ClipboardId::Clipboard, ClipboardId::Selection];

    /// Dense index for per-buffer arrays.
    pub fn index(self) -> usize {
        match self {
            ClipboardId::Clipboard => 0,
            ClipboardId::Selection => 1,
        }
    }
}

impl std::fmt::Display for ClipboardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClipboardId::Clipboard => f.write_str("clipboard"),
            ClipboardId::Selection => f.write_str("selection"),
        }
    }
}

/// Opaque, already-marshalled clipboard contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipboardData(Vec<u8>);

impl ClipboardData {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn from_text(text: &str) -> Self {
        Self(text.as_bytes().to_vec())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_are_dense_and_unique() {
        let indices: Vec<usize> = ClipboardId::ALL.iter().map(|id| id.index()).collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn test_from_text_keeps_utf8_bytes() {
        let data = ClipboardData::from_text("héllo");
        assert_eq!(data.as_bytes(), "héllo".as_bytes());
        assert_eq!(data.len(), 6);
        assert!(ClipboardData::default().is_empty());
    }
}
