//! In-memory platform screen.
//!
//! [`HeadlessScreen`] implements [`PlatformScreen`] without touching the OS.
//! The pointer, toggle keys, scroll-lock pin and clipboard buffers are plain
//! fields behind an `Arc<Mutex<_>>`, and [`HeadlessScreen::handle`] returns a
//! second view onto the same state so the host (or a test) can play the part
//! of the user after the screen has been boxed into the primary adapter.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use edgeshare_core::{
    ClipboardData, ClipboardId, ModifierMask, Screen, ScreenError, ScreenOption, ScreenShape,
    SideMask,
};
use tracing::debug;

use crate::application::primary_client::PlatformScreen;

#[derive(Debug)]
struct HeadlessState {
    screen: Screen,
    /// `true` while the pointer is shown and absolute (this screen has focus).
    pointer_visible: bool,
    clipboards: [Option<ClipboardData>; ClipboardId::COUNT],
    /// Buffers the server has grabbed away from local applications.
    grabbed: [bool; ClipboardId::COUNT],
    screensaver_active: bool,
    options: Vec<ScreenOption>,
    active_sides: SideMask,
    enabled: bool,
}

/// A display that exists only in memory.
///
/// Cloning yields another handle onto the same display.
#[derive(Debug, Clone)]
pub struct HeadlessScreen {
    state: Arc<Mutex<HeadlessState>>,
}

impl HeadlessScreen {
    /// Creates a display of `shape` with the pointer at its center.
    ///
    /// # Errors
    ///
    /// Returns a [`ScreenError`] for a degenerate shape or oversized jump zone.
    pub fn new(
        name: impl Into<String>,
        shape: ScreenShape,
        jump_zone: u32,
    ) -> Result<Self, ScreenError> {
        let screen = Screen::new(name, shape, jump_zone)?;
        Ok(Self {
            state: Arc::new(Mutex::new(HeadlessState {
                screen,
                pointer_visible: false,
                clipboards: [Some(ClipboardData::default()), Some(ClipboardData::default())],
                grabbed: [false; ClipboardId::COUNT],
                screensaver_active: false,
                options: Vec::new(),
                active_sides: SideMask::NONE,
                enabled: false,
            })),
        })
    }

    /// Another handle onto this display.
    pub fn handle(&self) -> Self {
        self.clone()
    }

    // ── User actions ──

    /// Pins (or unpins) the pointer to this screen, as Scroll Lock would.
    pub fn set_locked(&self, locked: bool) {
        self.lock().screen.set_locked(locked);
    }

    /// Sets the Caps/Num/Scroll Lock state; non-toggle bits are dropped.
    pub fn set_toggle_mask(&self, mask: ModifierMask) {
        self.lock().screen.set_toggle_mask(mask);
    }

    /// A local application copied `data` into buffer `id`.
    pub fn copy_local(&self, id: ClipboardId, data: ClipboardData) {
        let mut state = self.lock();
        state.clipboards[id.index()] = Some(data);
        state.grabbed[id.index()] = false;
    }

    /// Makes buffer `id` unreadable, as a busy clipboard owner would.
    pub fn make_clipboard_unavailable(&self, id: ClipboardId) {
        self.lock().clipboards[id.index()] = None;
    }

    // ── Observations ──

    pub fn cursor(&self) -> (i32, i32) {
        self.lock().screen.cursor()
    }

    pub fn is_pointer_visible(&self) -> bool {
        self.lock().pointer_visible
    }

    pub fn clipboard_contents(&self, id: ClipboardId) -> Option<ClipboardData> {
        self.lock().clipboards[id.index()].clone()
    }

    /// `true` once the server has taken buffer `id` away from local apps.
    pub fn is_grabbed(&self, id: ClipboardId) -> bool {
        self.lock().grabbed[id.index()]
    }

    pub fn is_screensaver_active(&self) -> bool {
        self.lock().screensaver_active
    }

    pub fn options(&self) -> Vec<ScreenOption> {
        self.lock().options.clone()
    }

    pub fn active_sides(&self) -> SideMask {
        self.lock().active_sides
    }

    pub fn is_enabled(&self) -> bool {
        self.lock().enabled
    }

    fn lock(&self) -> MutexGuard<'_, HeadlessState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PlatformScreen for HeadlessScreen {
    fn shape(&self) -> ScreenShape {
        self.lock().screen.shape()
    }

    fn cursor_pos(&self) -> (i32, i32) {
        self.cursor()
    }

    fn cursor_center(&self) -> (i32, i32) {
        self.lock().screen.cursor_center()
    }

    fn jump_zone_size(&self) -> u32 {
        self.lock().screen.jump_zone()
    }

    fn warp_cursor(&mut self, x: i32, y: i32) {
        self.lock().screen.set_cursor(x, y);
    }

    fn enter(&mut self, mask: ModifierMask) {
        let mut state = self.lock();
        state.pointer_visible = true;
        state.screen.set_toggle_mask(mask);
    }

    fn leave(&mut self) -> bool {
        self.lock().pointer_visible = false;
        true
    }

    fn toggle_mask(&self) -> ModifierMask {
        self.lock().screen.toggle_mask()
    }

    fn is_locked_to_screen(&self) -> bool {
        self.lock().screen.is_locked()
    }

    fn clipboard(&self, id: ClipboardId) -> Option<ClipboardData> {
        self.lock().clipboards[id.index()].clone()
    }

    fn set_clipboard(&mut self, id: ClipboardId, data: &ClipboardData) {
        self.lock().clipboards[id.index()] = Some(data.clone());
    }

    fn grab_clipboard(&mut self, id: ClipboardId) {
        self.lock().grabbed[id.index()] = true;
    }

    fn screensaver(&mut self, activate: bool) {
        self.lock().screensaver_active = activate;
    }

    fn reset_options(&mut self) {
        self.lock().options.clear();
    }

    fn set_options(&mut self, options: &[ScreenOption]) {
        let mut state = self.lock();
        for option in options {
            match state.options.iter_mut().find(|o| o.id == option.id) {
                Some(existing) => existing.value = option.value,
                None => state.options.push(*option),
            }
        }
    }

    fn reconfigure(&mut self, active_sides: SideMask) {
        debug!(sides = ?active_sides, "headless screen reconfigured");
        self.lock().active_sides = active_sides;
    }

    fn enable(&mut self) {
        self.lock().enabled = true;
    }

    fn disable(&mut self) {
        self.lock().enabled = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgeshare_core::{Edge, OptionId};

    fn make_screen() -> HeadlessScreen {
        HeadlessScreen::new("desk", ScreenShape::new(0, 0, 1920, 1080), 1).unwrap()
    }

    #[test]
    fn test_new_rejects_degenerate_shape() {
        let result = HeadlessScreen::new("desk", ScreenShape::new(0, 0, 0, 1080), 1);

        assert!(matches!(result, Err(ScreenError::DegenerateShape { .. })));
    }

    #[test]
    fn test_handle_observes_changes_made_through_trait() {
        // Arrange
        let mut screen = make_screen();
        let handle = screen.handle();

        // Act
        screen.warp_cursor(5000, -3);
        screen.enter(ModifierMask::CAPS_LOCK);

        // Assert
        assert_eq!(handle.cursor(), (1919, 0), "warp clamps to the screen");
        assert!(handle.is_pointer_visible());
        assert_eq!(screen.toggle_mask(), ModifierMask::CAPS_LOCK);
    }

    #[test]
    fn test_leave_hides_pointer() {
        let mut screen = make_screen();
        screen.enter(ModifierMask::NONE);

        assert!(screen.leave());

        assert!(!screen.is_pointer_visible());
    }

    #[test]
    fn test_lock_is_visible_to_adapter() {
        let screen = make_screen();

        screen.handle().set_locked(true);

        assert!(screen.is_locked_to_screen());
    }

    #[test]
    fn test_local_copy_releases_grab() {
        // Arrange
        let mut screen = make_screen();
        screen.grab_clipboard(ClipboardId::Clipboard);
        assert!(screen.is_grabbed(ClipboardId::Clipboard));

        // Act
        screen.copy_local(ClipboardId::Clipboard, ClipboardData::from_text("local"));

        // Assert
        assert!(!screen.is_grabbed(ClipboardId::Clipboard));
        assert_eq!(
            screen.clipboard(ClipboardId::Clipboard),
            Some(ClipboardData::from_text("local"))
        );
    }

    #[test]
    fn test_unavailable_clipboard_reads_none() {
        let screen = make_screen();

        screen.make_clipboard_unavailable(ClipboardId::Selection);

        assert_eq!(screen.clipboard(ClipboardId::Selection), None);
        assert!(screen.clipboard(ClipboardId::Clipboard).is_some());
    }

    #[test]
    fn test_set_options_overrides_matching_ids() {
        // Arrange
        let mut screen = make_screen();
        let first = ScreenOption {
            id: OptionId(1),
            value: 10,
        };
        let second = ScreenOption {
            id: OptionId(2),
            value: 20,
        };

        // Act
        screen.set_options(&[first, second]);
        screen.set_options(&[ScreenOption {
            id: OptionId(1),
            value: 11,
        }]);

        // Assert
        assert_eq!(
            screen.options(),
            vec![
                ScreenOption {
                    id: OptionId(1),
                    value: 11
                },
                second
            ]
        );

        screen.reset_options();
        assert!(screen.options().is_empty());
    }

    #[test]
    fn test_reconfigure_and_enable_are_recorded() {
        let mut screen = make_screen();

        screen.enable();
        screen.reconfigure(SideMask::from_edge(Edge::Right));
        screen.screensaver(true);

        assert!(screen.is_enabled());
        assert_eq!(screen.active_sides(), SideMask::RIGHT);
        assert!(screen.is_screensaver_active());
    }
}
