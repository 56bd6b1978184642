//! RemoteClientProxy: a secondary screen seen as an endpoint.
//!
//! Every [`ClientEndpoint`] call becomes one [`ProxyMessage`] handed to the
//! connection's [`ClientTransport`].  The proxy also mirrors the secondary's
//! screen (shape, jump zone, last known cursor) so the orchestrator can do
//! edge detection without a network round trip.
//!
//! # Failure handling
//!
//! Sends are fire-and-forget.  When the transport reports an error the proxy
//! logs it once and latches [`RemoteClientProxy::has_failed`]; the
//! orchestrator checks that flag after routing and disconnects the endpoint.

use std::sync::Arc;

use edgeshare_core::{
    ButtonId, ClipboardData, ClipboardId, KeyButton, KeyId, ModifierMask, ProxyMessage, Screen,
    ScreenError, ScreenInfo, ScreenOption, ScreenShape, SequenceGate,
};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use super::clipboard::ClipboardTracker;
use super::endpoint::{ClientEndpoint, EndpointError, ScreenEndpoint};

/// Errors reported by a [`ClientTransport`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The connection's outbound queue no longer has a reader.
    #[error("transport closed")]
    Closed,
}

/// Ordered, non-blocking outbound queue for one secondary connection.
///
/// Infrastructure implementations feed a socket writer task; test
/// implementations record every message.
pub trait ClientTransport: Send + Sync {
    /// Queues `message` for delivery.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Closed`] once the connection is gone.
    fn send(&self, message: ProxyMessage) -> Result<(), TransportError>;
}

/// Endpoint for one connected secondary.
pub struct RemoteClientProxy {
    connection_id: Uuid,
    screen: Screen,
    transport: Arc<dyn ClientTransport>,
    clipboard: ClipboardTracker,
    enter_gate: SequenceGate,
    failed: bool,
}

impl std::fmt::Debug for RemoteClientProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteClientProxy")
            .field("connection_id", &self.connection_id)
            .field("screen", &self.screen)
            .field("failed", &self.failed)
            .finish_non_exhaustive()
    }
}

impl RemoteClientProxy {
    /// Creates the proxy from the screen info the secondary sent on connect.
    ///
    /// `jump_zone` is normally 0: a secondary is driven by relative motion, so
    /// it only hands off once the cursor is pushed past the edge.
    ///
    /// # Errors
    ///
    /// Returns a [`ScreenError`] if the reported shape is degenerate, leaves
    /// the `i32` coordinate space or is too small for `jump_zone`.
    pub fn new(
        name: impl Into<String>,
        connection_id: Uuid,
        info: ScreenInfo,
        jump_zone: u32,
        transport: Arc<dyn ClientTransport>,
    ) -> Result<Self, ScreenError> {
        let mut screen = Screen::new(name, info.shape, jump_zone)?;
        screen.set_cursor(info.cursor.0, info.cursor.1);
        Ok(Self {
            connection_id,
            screen,
            transport,
            clipboard: ClipboardTracker::new(),
            enter_gate: SequenceGate::new(),
            failed: false,
        })
    }

    /// Identifies the connection this proxy was created for.  A reconnect
    /// under the same name gets a new id, so late reports from the old
    /// connection can be told apart.
    pub fn connection_id(&self) -> Uuid {
        self.connection_id
    }

    /// Applies a shape / cursor report from the secondary.
    ///
    /// # Errors
    ///
    /// Leaves the mirror untouched and returns the validation error if the new
    /// shape is unusable.
    pub fn update_info(&mut self, info: ScreenInfo) -> Result<(), ScreenError> {
        self.screen.set_shape(info.shape)?;
        self.screen.set_cursor(info.cursor.0, info.cursor.1);
        debug!(screen = %self.screen.name(), ?info, "screen info updated");
        Ok(())
    }

    /// Stores contents the secondary reported for a buffer it owns.
    pub fn store_clipboard(&mut self, id: ClipboardId, data: ClipboardData) {
        self.clipboard.store(id, data);
    }

    pub fn owns_clipboard(&self, id: ClipboardId) -> bool {
        self.clipboard.is_owner(id)
    }

    pub fn mark_clipboard_owned(&mut self, id: ClipboardId) {
        self.clipboard.mark_owned(id);
    }

    /// Sequence number of the last `enter` this proxy forwarded.
    pub fn last_enter_seq(&self) -> Option<u32> {
        self.enter_gate.last()
    }

    /// `true` once a send has failed.  Never resets.
    pub fn has_failed(&self) -> bool {
        self.failed
    }

    fn send(&mut self, message: ProxyMessage) {
        if self.failed {
            return;
        }
        if let Err(e) = self.transport.send(message) {
            warn!(screen = %self.screen.name(), error = %e, "send failed");
            self.failed = true;
        }
    }
}

impl ScreenEndpoint for RemoteClientProxy {
    fn shape(&self) -> ScreenShape {
        self.screen.shape()
    }

    fn cursor_pos(&self) -> (i32, i32) {
        self.screen.cursor()
    }

    fn jump_zone_size(&self) -> u32 {
        self.screen.jump_zone()
    }

    fn clipboard(&self, id: ClipboardId) -> Result<ClipboardData, EndpointError> {
        self.clipboard
            .contents(id)
            .cloned()
            .ok_or(EndpointError::NoClipboardData(id))
    }
}

impl ClientEndpoint for RemoteClientProxy {
    fn name(&self) -> &str {
        self.screen.name()
    }

    fn enter(&mut self, x_abs: i32, y_abs: i32, seq: u32, mask: ModifierMask, for_screensaver: bool) {
        if !self.enter_gate.accept(seq) {
            debug!(screen = %self.screen.name(), seq, "ignoring stale enter");
            return;
        }
        self.screen.set_cursor(x_abs, y_abs);
        self.screen.set_toggle_mask(mask);
        let (x, y) = self.screen.cursor();
        self.send(ProxyMessage::Enter {
            x,
            y,
            seq,
            mask: self.screen.toggle_mask(),
            for_screensaver,
        });
    }

    fn leave(&mut self) -> bool {
        self.send(ProxyMessage::Leave);
        true
    }

    fn set_clipboard(&mut self, id: ClipboardId, data: &ClipboardData) {
        if !self.clipboard.is_dirty(id) {
            return;
        }
        self.send(ProxyMessage::SetClipboard {
            id,
            seq: self.last_enter_seq().unwrap_or(0),
            data: data.clone(),
        });
        self.clipboard.store(id, data.clone());
        self.clipboard.set_dirty(id, false);
    }

    fn grab_clipboard(&mut self, id: ClipboardId) {
        self.send(ProxyMessage::GrabClipboard {
            id,
            seq: self.last_enter_seq().unwrap_or(0),
        });
        self.clipboard.mark_grabbed_elsewhere(id);
    }

    fn set_clipboard_dirty(&mut self, id: ClipboardId, dirty: bool) {
        self.clipboard.set_dirty(id, dirty);
    }

    fn is_clipboard_dirty(&self, id: ClipboardId) -> bool {
        self.clipboard.is_dirty(id)
    }

    fn key_down(&mut self, key: KeyId, mask: ModifierMask, button: KeyButton) {
        self.send(ProxyMessage::KeyDown { key, mask, button });
    }

    fn key_repeat(&mut self, key: KeyId, mask: ModifierMask, count: u32, button: KeyButton) {
        self.send(ProxyMessage::KeyRepeat {
            key,
            mask,
            count,
            button,
        });
    }

    fn key_up(&mut self, key: KeyId, mask: ModifierMask, button: KeyButton) {
        self.send(ProxyMessage::KeyUp { key, mask, button });
    }

    fn mouse_down(&mut self, button: ButtonId) {
        self.send(ProxyMessage::MouseDown { button });
    }

    fn mouse_up(&mut self, button: ButtonId) {
        self.send(ProxyMessage::MouseUp { button });
    }

    fn mouse_move(&mut self, x_abs: i32, y_abs: i32) {
        self.screen.set_cursor(x_abs, y_abs);
        let (x, y) = self.screen.cursor();
        self.send(ProxyMessage::MouseMove { x, y });
    }

    fn mouse_wheel(&mut self, x_delta: i32, y_delta: i32) {
        self.send(ProxyMessage::MouseWheel { x_delta, y_delta });
    }

    fn screensaver(&mut self, activate: bool) {
        self.send(ProxyMessage::Screensaver { activate });
    }

    fn reset_options(&mut self) {
        self.send(ProxyMessage::ResetOptions);
    }

    fn set_options(&mut self, options: &[ScreenOption]) {
        self.send(ProxyMessage::SetOptions {
            options: options.to_vec(),
        });
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
