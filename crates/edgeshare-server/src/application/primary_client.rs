//! PrimaryClientAdapter: the local display seen as an endpoint.
//!
//! The orchestrator treats the primary screen exactly like a secondary, but
//! the primary is special in three ways:
//!
//! 1. Input already happened here.  Key and mouse injection calls are no-ops;
//!    forwarding them would type every key twice.
//! 2. It has a platform clipboard.  `set_clipboard` writes it only when the
//!    local copy is dirty, and `grab_clipboard` asserts ownership on the
//!    platform so local applications see the buffer as foreign.
//! 3. It can refuse to give up focus.  While the user has pinned the pointer
//!    (e.g. with Scroll Lock) `leave` returns `false`.
//!
//! All OS interaction goes through the [`PlatformScreen`] trait, which a real
//! backend implements with input hooks and a headless backend implements in
//! memory.

use edgeshare_core::{
    ButtonId, ClipboardData, ClipboardId, KeyButton, KeyId, ModifierMask, ScreenOption,
    ScreenShape, SequenceGate, SideMask,
};
use tracing::{debug, trace};

use super::clipboard::ClipboardTracker;
use super::endpoint::{ClientEndpoint, EndpointError, ScreenEndpoint};

/// OS-facing operations of the primary display.
///
/// Infrastructure implementations install input hooks and talk to the window
/// system; test implementations record calls.
pub trait PlatformScreen: Send {
    fn shape(&self) -> ScreenShape;

    fn cursor_pos(&self) -> (i32, i32);

    /// Parking point for the pointer while a secondary is focused.
    fn cursor_center(&self) -> (i32, i32);

    fn jump_zone_size(&self) -> u32;

    /// Moves the physical pointer to `(x, y)`.
    fn warp_cursor(&mut self, x: i32, y: i32);

    /// Focus returned: show the pointer and apply `mask`'s toggle state.
    fn enter(&mut self, mask: ModifierMask);

    /// Focus departs: hide the pointer and switch to relative capture.
    /// Returns `false` if the platform cannot do so right now.
    fn leave(&mut self) -> bool;

    /// Current Caps/Num/Scroll Lock state.
    fn toggle_mask(&self) -> ModifierMask;

    /// `true` while the user has pinned the pointer to this screen.
    fn is_locked_to_screen(&self) -> bool;

    /// Reads buffer `id`; `None` when the platform clipboard is unavailable.
    fn clipboard(&self, id: ClipboardId) -> Option<ClipboardData>;

    fn set_clipboard(&mut self, id: ClipboardId, data: &ClipboardData);

    /// Takes ownership of buffer `id` away from local applications.
    fn grab_clipboard(&mut self, id: ClipboardId);

    fn screensaver(&mut self, activate: bool);

    fn reset_options(&mut self);

    fn set_options(&mut self, options: &[ScreenOption]);

    /// Tells the platform which edges have a live neighbour.
    fn reconfigure(&mut self, active_sides: SideMask);

    /// Installs the input hooks.
    fn enable(&mut self);

    /// Removes the input hooks.
    fn disable(&mut self);
}

/// Endpoint wrapper around the local [`PlatformScreen`].
pub struct PrimaryClientAdapter {
    name: String,
    platform: Box<dyn PlatformScreen>,
    clipboard: ClipboardTracker,
    enter_gate: SequenceGate,
    enabled: bool,
}

impl std::fmt::Debug for PrimaryClientAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrimaryClientAdapter")
            .field("name", &self.name)
            .field("clipboard", &self.clipboard)
            .field("enter_gate", &self.enter_gate)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

impl PrimaryClientAdapter {
    pub fn new(name: impl Into<String>, platform: Box<dyn PlatformScreen>) -> Self {
        Self {
            name: name.into(),
            platform,
            clipboard: ClipboardTracker::new(),
            enter_gate: SequenceGate::new(),
            enabled: false,
        }
    }

    /// Updates the set of edges that lead to a connected neighbour.
    pub fn reconfigure(&mut self, active_sides: SideMask) {
        debug!(screen = %self.name, sides = active_sides.0, "reconfiguring active sides");
        self.platform.reconfigure(active_sides);
    }

    pub fn cursor_center(&self) -> (i32, i32) {
        self.platform.cursor_center()
    }

    pub fn warp_cursor(&mut self, x: i32, y: i32) {
        self.platform.warp_cursor(x, y);
    }

    pub fn toggle_mask(&self) -> ModifierMask {
        self.platform.toggle_mask()
    }

    pub fn is_locked_to_screen(&self) -> bool {
        self.platform.is_locked_to_screen()
    }

    /// Installs the platform hooks.  Calling it twice is a no-op.
    pub fn enable(&mut self) {
        if !self.enabled {
            self.platform.enable();
            self.enabled = true;
        }
    }

    /// Removes the platform hooks.  Calling it twice is a no-op.
    pub fn disable(&mut self) {
        if self.enabled {
            self.platform.disable();
            self.enabled = false;
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// `true` if the primary currently owns buffer `id`.
    pub fn owns_clipboard(&self, id: ClipboardId) -> bool {
        self.clipboard.is_owner(id)
    }

    /// Records that the local user copied something into buffer `id`.
    pub fn mark_clipboard_owned(&mut self, id: ClipboardId) {
        self.clipboard.mark_owned(id);
    }
}

impl ScreenEndpoint for PrimaryClientAdapter {
    fn shape(&self) -> ScreenShape {
        self.platform.shape()
    }

    fn cursor_pos(&self) -> (i32, i32) {
        self.platform.cursor_pos()
    }

    fn jump_zone_size(&self) -> u32 {
        self.platform.jump_zone_size()
    }

    fn clipboard(&self, id: ClipboardId) -> Result<ClipboardData, EndpointError> {
        self.platform
            .clipboard(id)
            .ok_or(EndpointError::ClipboardUnavailable(id))
    }
}

impl ClientEndpoint for PrimaryClientAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn enter(&mut self, x_abs: i32, y_abs: i32, seq: u32, mask: ModifierMask, for_screensaver: bool) {
        if !self.enter_gate.accept(seq) {
            debug!(screen = %self.name, seq, "ignoring stale enter");
            return;
        }
        if !for_screensaver {
            self.platform.warp_cursor(x_abs, y_abs);
        }
        self.platform.enter(mask);
    }

    fn leave(&mut self) -> bool {
        if self.platform.is_locked_to_screen() {
            debug!(screen = %self.name, "locked to screen, refusing to leave");
            return false;
        }
        self.platform.leave()
    }

    fn set_clipboard(&mut self, id: ClipboardId, data: &ClipboardData) {
        if self.clipboard.is_dirty(id) {
            self.platform.set_clipboard(id, data);
            self.clipboard.set_dirty(id, false);
        }
    }

    fn grab_clipboard(&mut self, id: ClipboardId) {
        self.platform.grab_clipboard(id);
        self.clipboard.mark_grabbed_elsewhere(id);
    }

    fn set_clipboard_dirty(&mut self, id: ClipboardId, dirty: bool) {
        self.clipboard.set_dirty(id, dirty);
    }

    fn is_clipboard_dirty(&self, id: ClipboardId) -> bool {
        self.clipboard.is_dirty(id)
    }

    // Local input is delivered by the OS; nothing to inject.

    fn key_down(&mut self, key: KeyId, _mask: ModifierMask, _button: KeyButton) {
        trace!(screen = %self.name, key = key.0, "key down stays local");
    }

    fn key_repeat(&mut self, key: KeyId, _mask: ModifierMask, _count: u32, _button: KeyButton) {
        trace!(screen = %self.name, key = key.0, "key repeat stays local");
    }

    fn key_up(&mut self, key: KeyId, _mask: ModifierMask, _button: KeyButton) {
        trace!(screen = %self.name, key = key.0, "key up stays local");
    }

    fn mouse_down(&mut self, _button: ButtonId) {}

    fn mouse_up(&mut self, _button: ButtonId) {}

    fn mouse_move(&mut self, _x_abs: i32, _y_abs: i32) {}

    fn mouse_wheel(&mut self, _x_delta: i32, _y_delta: i32) {}

    fn screensaver(&mut self, activate: bool) {
        self.platform.screensaver(activate);
    }

    fn reset_options(&mut self) {
        self.platform.reset_options();
    }

    fn set_options(&mut self, options: &[ScreenOption]) {
        self.platform.set_options(options);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
