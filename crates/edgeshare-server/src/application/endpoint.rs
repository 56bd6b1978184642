//! Endpoint capabilities.
//!
//! The orchestrator talks to every screen, local or remote, through the same
//! two capabilities:
//!
//! - [`ScreenEndpoint`] – read-only view of one display: shape, cursor, jump
//!   zone and clipboard contents.
//! - [`ClientEndpoint`] – everything the orchestrator can *send* to a screen:
//!   focus changes, input, clipboard and option updates.
//!
//! There are exactly two implementations, [`PrimaryClientAdapter`] and
//! [`RemoteClientProxy`].  The orchestrator addresses them through the closed
//! [`Endpoint`] enum so that dispatch is an exhaustive `match` with no trait
//! objects on the hot path.

use edgeshare_core::{
    ButtonId, ClipboardData, ClipboardId, KeyButton, KeyId, ModifierMask, ScreenOption,
    ScreenShape,
};
use thiserror::Error;

use super::primary_client::PrimaryClientAdapter;
use super::remote_client::RemoteClientProxy;

/// Errors an endpoint reports back to the orchestrator.
///
/// None of these are fatal: the orchestrator treats every variant as "no new
/// data" and carries on.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EndpointError {
    /// The platform clipboard could not be opened or read.
    #[error("clipboard {0} is unavailable")]
    ClipboardUnavailable(ClipboardId),

    /// The endpoint has never reported contents for this buffer.
    #[error("no contents known for clipboard {0}")]
    NoClipboardData(ClipboardId),
}

/// Read access to one display.
pub trait ScreenEndpoint {
    fn shape(&self) -> ScreenShape;

    /// Cursor position in the screen's own coordinates.  On a remote that is
    /// not focused this is the last reported value and may be stale.
    fn cursor_pos(&self) -> (i32, i32);

    /// Width of the band along each edge that triggers a handoff.
    fn jump_zone_size(&self) -> u32;

    /// Current contents of buffer `id`.
    ///
    /// # Errors
    ///
    /// Returns an [`EndpointError`] when the contents cannot be obtained; the
    /// caller treats that as "no change".
    fn clipboard(&self, id: ClipboardId) -> Result<ClipboardData, EndpointError>;
}

/// Everything the orchestrator can push to a screen.
pub trait ClientEndpoint: ScreenEndpoint {
    fn name(&self) -> &str;

    /// Focus arrives at `(x_abs, y_abs)`.  `seq` tags the transition; a value
    /// not newer than the last accepted one is ignored.  With
    /// `for_screensaver` the cursor is not moved.
    fn enter(&mut self, x_abs: i32, y_abs: i32, seq: u32, mask: ModifierMask, for_screensaver: bool);

    /// Focus is about to depart.  Returns `false` to refuse, in which case the
    /// endpoint keeps focus and nothing else changes.
    fn leave(&mut self) -> bool;

    /// Delivers `data` for buffer `id` if this endpoint's copy is dirty.
    fn set_clipboard(&mut self, id: ClipboardId, data: &ClipboardData);

    /// Another endpoint took ownership of `id`.  Marks this copy dirty.
    fn grab_clipboard(&mut self, id: ClipboardId);

    fn set_clipboard_dirty(&mut self, id: ClipboardId, dirty: bool);

    fn is_clipboard_dirty(&self, id: ClipboardId) -> bool;

    fn key_down(&mut self, key: KeyId, mask: ModifierMask, button: KeyButton);

    fn key_repeat(&mut self, key: KeyId, mask: ModifierMask, count: u32, button: KeyButton);

    fn key_up(&mut self, key: KeyId, mask: ModifierMask, button: KeyButton);

    fn mouse_down(&mut self, button: ButtonId);

    fn mouse_up(&mut self, button: ButtonId);

    /// Absolute position in the receiving screen's coordinates.
    fn mouse_move(&mut self, x_abs: i32, y_abs: i32);

    fn mouse_wheel(&mut self, x_delta: i32, y_delta: i32);

    fn screensaver(&mut self, activate: bool);

    fn reset_options(&mut self);

    fn set_options(&mut self, options: &[ScreenOption]);
}

/// A mutable handle on one screen known to the orchestrator.
///
/// The orchestrator owns the primary adapter and the remote proxies in
/// separate fields; this enum lets it address either by name and dispatch
/// through one exhaustive `match`.
#[derive(Debug)]
pub enum Endpoint<'a> {
    Primary(&'a mut PrimaryClientAdapter),
    Remote(&'a mut RemoteClientProxy),
}

impl Endpoint<'_> {
    pub fn is_primary(&self) -> bool {
        matches!(self, Endpoint::Primary(_))
    }

    /// Records that this endpoint won ownership of buffer `id`.
    pub fn mark_clipboard_owned(&mut self, id: ClipboardId) {
        match self {
            Endpoint::Primary(e) => e.mark_clipboard_owned(id),
            Endpoint::Remote(e) => e.mark_clipboard_owned(id),
        }
    }
}

impl ScreenEndpoint for Endpoint<'_> {
    fn shape(&self) -> ScreenShape {
        match self {
            Endpoint::Primary(e) => e.shape(),
            Endpoint::Remote(e) => e.shape(),
        }
    }

    fn cursor_pos(&self) -> (i32, i32) {
        match self {
            Endpoint::Primary(e) => e.cursor_pos(),
            Endpoint::Remote(e) => e.cursor_pos(),
        }
    }

    fn jump_zone_size(&self) -> u32 {
        match self {
            Endpoint::Primary(e) => e.jump_zone_size(),
            Endpoint::Remote(e) => e.jump_zone_size(),
        }
    }

    fn clipboard(&self, id: ClipboardId) -> Result<ClipboardData, EndpointError> {
        match self {
            Endpoint::Primary(e) => e.clipboard(id),
            Endpoint::Remote(e) => e.clipboard(id),
        }
    }
}

impl ClientEndpoint for Endpoint<'_> {
    fn name(&self) -> &str {
        match self {
            Endpoint::Primary(e) => e.name(),
            Endpoint::Remote(e) => e.name(),
        }
    }

    fn enter(&mut self, x_abs: i32, y_abs: i32, seq: u32, mask: ModifierMask, for_screensaver: bool) {
        match self {
            Endpoint::Primary(e) => e.enter(x_abs, y_abs, seq, mask, for_screensaver),
            Endpoint::Remote(e) => e.enter(x_abs, y_abs, seq, mask, for_screensaver),
        }
    }

    fn leave(&mut self) -> bool {
        match self {
            Endpoint::Primary(e) => e.leave(),
            Endpoint::Remote(e) => e.leave(),
        }
    }

    fn set_clipboard(&mut self, id: ClipboardId, data: &ClipboardData) {
        match self {
            Endpoint::Primary(e) => e.set_clipboard(id, data),
            Endpoint::Remote(e) => e.set_clipboard(id, data),
        }
    }

    fn grab_clipboard(&mut self, id: ClipboardId) {
        match self {
            Endpoint::Primary(e) => e.grab_clipboard(id),
            Endpoint::Remote(e) => e.grab_clipboard(id),
        }
    }

    fn set_clipboard_dirty(&mut self, id: ClipboardId, dirty: bool) {
        match self {
            Endpoint::Primary(e) => e.set_clipboard_dirty(id, dirty),
            Endpoint::Remote(e) => e.set_clipboard_dirty(id, dirty),
        }
    }

    fn is_clipboard_dirty(&self, id: ClipboardId) -> bool {
        match self {
            Endpoint::Primary(e) => e.is_clipboard_dirty(id),
            Endpoint::Remote(e) => e.is_clipboard_dirty(id),
        }
    }

    fn key_down(&mut self, key: KeyId, mask: ModifierMask, button: KeyButton) {
        match self {
            Endpoint::Primary(e) => e.key_down(key, mask, button),
            Endpoint::Remote(e) => e.key_down(key, mask, button),
        }
    }

    fn key_repeat(&mut self, key: KeyId, mask: ModifierMask, count: u32, button: KeyButton) {
        match self {
            Endpoint::Primary(e) => e.key_repeat(key, mask, count, button),
            Endpoint::Remote(e) => e.key_repeat(key, mask, count, button),
        }
    }

    fn key_up(&mut self, key: KeyId, mask: ModifierMask, button: KeyButton) {
        match self {
            Endpoint::Primary(e) => e.key_up(key, mask, button),
            Endpoint::Remote(e) => e.key_up(key, mask, button),
        }
    }

    fn mouse_down(&mut self, button: ButtonId) {
        match self {
            Endpoint::Primary(e) => e.mouse_down(button),
            Endpoint::Remote(e) => e.mouse_down(button),
        }
    }

    fn mouse_up(&mut self, button: ButtonId) {
        match self {
            Endpoint::Primary(e) => e.mouse_up(button),
            Endpoint::Remote(e) => e.mouse_up(button),
        }
    }

    fn mouse_move(&mut self, x_abs: i32, y_abs: i32) {
        match self {
            Endpoint::Primary(e) => e.mouse_move(x_abs, y_abs),
            Endpoint::Remote(e) => e.mouse_move(x_abs, y_abs),
        }
    }

    fn mouse_wheel(&mut self, x_delta: i32, y_delta: i32) {
        match self {
            Endpoint::Primary(e) => e.mouse_wheel(x_delta, y_delta),
            Endpoint::Remote(e) => e.mouse_wheel(x_delta, y_delta),
        }
    }

    fn screensaver(&mut self, activate: bool) {
        match self {
            Endpoint::Primary(e) => e.screensaver(activate),
            Endpoint::Remote(e) => e.screensaver(activate),
        }
    }

    fn reset_options(&mut self) {
        match self {
            Endpoint::Primary(e) => e.reset_options(),
            Endpoint::Remote(e) => e.reset_options(),
        }
    }

    fn set_options(&mut self, options: &[ScreenOption]) {
        match self {
            Endpoint::Primary(e) => e.set_options(options),
            Endpoint::Remote(e) => e.set_options(options),
        }
    }
}
