//! Logical messages exchanged with secondary screens.
//!
//! [`ProxyMessage`] is the serializable form of every call the orchestrator
//! makes on a remote endpoint; [`ClientReport`] is everything a secondary sends
//! back.  How these are framed on the wire is the transport's business.

use serde::{Deserialize, Serialize};

use crate::domain::clipboard::{ClipboardData, ClipboardId};
use crate::domain::geometry::ScreenShape;
use crate::domain::input::{ButtonId, KeyButton, KeyId, ModifierMask, OptionsList};

/// Server → secondary.  One variant per endpoint call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProxyMessage {
    /// Focus arrives: place the cursor and adopt the toggle state.
    Enter {
        x: i32,
        y: i32,
        seq: u32,
        mask: ModifierMask,
        for_screensaver: bool,
    },
    /// Focus departs.
    Leave,
    /// Full clipboard contents for buffer `id`.
    SetClipboard {
        id: ClipboardId,
        seq: u32,
        data: ClipboardData,
    },
    /// Another screen took ownership of buffer `id`.
    GrabClipboard { id: ClipboardId, seq: u32 },
    KeyDown {
        key: KeyId,
        mask: ModifierMask,
        button: KeyButton,
    },
    KeyRepeat {
        key: KeyId,
        mask: ModifierMask,
        count: u32,
        button: KeyButton,
    },
    KeyUp {
        key: KeyId,
        mask: ModifierMask,
        button: KeyButton,
    },
    MouseDown { button: ButtonId },
    MouseUp { button: ButtonId },
    /// Absolute position in the secondary's own coordinates.
    MouseMove { x: i32, y: i32 },
    MouseWheel { x_delta: i32, y_delta: i32 },
    Screensaver { activate: bool },
    ResetOptions,
    SetOptions { options: OptionsList },
}

/// Screen geometry and cursor position reported by a secondary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenInfo {
    pub shape: ScreenShape,
    pub cursor: (i32, i32),
}

/// Secondary → server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientReport {
    /// The secondary applied the `Enter` tagged `seq`.
    EnterAck { seq: u32 },
    /// Shape or cursor changed.
    Info(ScreenInfo),
    /// The local user copied something; `seq` is the enter sequence number
    /// the secondary was last entered with.
    GrabClipboard { id: ClipboardId, seq: u32 },
    /// Contents of a buffer this secondary owns.
    ClipboardData {
        id: ClipboardId,
        seq: u32,
        data: ClipboardData,
    },
    /// The secondary wants the current contents of a buffer it does not own.
    ClipboardRequest { id: ClipboardId },
}
