//! Recording test doubles shared by the application-layer unit tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use edgeshare_core::{
    ClipboardData, ClipboardId, ModifierMask, ProxyMessage, Screen, ScreenInfo, ScreenOption,
    ScreenShape, SideMask,
};
use uuid::Uuid;

use super::primary_client::PlatformScreen;
use super::remote_client::{ClientTransport, RemoteClientProxy, TransportError};

// ── RecordingScreen ───────────────────────────────────────────────────────────

/// One observable call on a [`RecordingScreen`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenCall {
    Warp(i32, i32),
    Enter(ModifierMask),
    Leave,
    SetClipboard(ClipboardId, ClipboardData),
    GrabClipboard(ClipboardId),
    Screensaver(bool),
    ResetOptions,
    SetOptions(Vec<ScreenOption>),
    Reconfigure(SideMask),
    Enable,
    Disable,
}

struct ScreenState {
    screen: Screen,
    calls: Vec<ScreenCall>,
    clipboards: [Option<ClipboardData>; ClipboardId::COUNT],
    refuse_leave: bool,
}

/// In-memory [`PlatformScreen`] that records every call.
///
/// Clones share state, so a test keeps a [`observer`](Self::observer) after boxing
/// the screen into an adapter.
#[derive(Clone)]
pub struct RecordingScreen {
    state: Arc<Mutex<ScreenState>>,
}

impl RecordingScreen {
    pub fn new(shape: ScreenShape, jump_zone: u32) -> Self {
        Self {
            state: Arc::new(Mutex::new(ScreenState {
                screen: Screen::new("recording", shape, jump_zone).expect("valid test screen"),
                calls: Vec::new(),
                clipboards: [
                    Some(ClipboardData::default()),
                    Some(ClipboardData::default()),
                ],
                refuse_leave: false,
            })),
        }
    }

    pub fn observer(&self) -> Self {
        self.clone()
    }

    pub fn calls(&self) -> Vec<ScreenCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn set_locked(&self, locked: bool) {
        self.state.lock().unwrap().screen.set_locked(locked);
    }

    /// Makes the platform refuse `leave` without being locked.
    pub fn set_refuse_leave(&self, refuse: bool) {
        self.state.lock().unwrap().refuse_leave = refuse;
    }

    pub fn set_toggle_mask(&self, mask: ModifierMask) {
        self.state.lock().unwrap().screen.set_toggle_mask(mask);
    }

    pub fn set_platform_clipboard(&self, id: ClipboardId, data: Option<ClipboardData>) {
        self.state.lock().unwrap().clipboards[id.index()] = data;
    }

    pub fn cursor(&self) -> (i32, i32) {
        self.state.lock().unwrap().screen.cursor()
    }

    fn record(&self, call: ScreenCall) {
        self.state.lock().unwrap().calls.push(call);
    }
}

impl PlatformScreen for RecordingScreen {
    fn shape(&self) -> ScreenShape {
        self.state.lock().unwrap().screen.shape()
    }

    fn cursor_pos(&self) -> (i32, i32) {
        self.cursor()
    }

    fn cursor_center(&self) -> (i32, i32) {
        self.state.lock().unwrap().screen.cursor_center()
    }

    fn jump_zone_size(&self) -> u32 {
        self.state.lock().unwrap().screen.jump_zone()
    }

    fn warp_cursor(&mut self, x: i32, y: i32) {
        self.state.lock().unwrap().screen.set_cursor(x, y);
        self.record(ScreenCall::Warp(x, y));
    }

    fn enter(&mut self, mask: ModifierMask) {
        self.record(ScreenCall::Enter(mask));
    }

    fn leave(&mut self) -> bool {
        self.record(ScreenCall::Leave);
        !self.state.lock().unwrap().refuse_leave
    }

    fn toggle_mask(&self) -> ModifierMask {
        self.state.lock().unwrap().screen.toggle_mask()
    }

    fn is_locked_to_screen(&self) -> bool {
        self.state.lock().unwrap().screen.is_locked()
    }

    fn clipboard(&self, id: ClipboardId) -> Option<ClipboardData> {
        self.state.lock().unwrap().clipboards[id.index()].clone()
    }

    fn set_clipboard(&mut self, id: ClipboardId, data: &ClipboardData) {
        self.state.lock().unwrap().clipboards[id.index()] = Some(data.clone());
        self.record(ScreenCall::SetClipboard(id, data.clone()));
    }

    fn grab_clipboard(&mut self, id: ClipboardId) {
        self.record(ScreenCall::GrabClipboard(id));
    }

    fn screensaver(&mut self, activate: bool) {
        self.record(ScreenCall::Screensaver(activate));
    }

    fn reset_options(&mut self) {
        self.record(ScreenCall::ResetOptions);
    }

    fn set_options(&mut self, options: &[ScreenOption]) {
        self.record(ScreenCall::SetOptions(options.to_vec()));
    }

    fn reconfigure(&mut self, active_sides: SideMask) {
        self.record(ScreenCall::Reconfigure(active_sides));
    }

    fn enable(&mut self) {
        self.record(ScreenCall::Enable);
    }

    fn disable(&mut self) {
        self.record(ScreenCall::Disable);
    }
}

// ── RecordingTransport ────────────────────────────────────────────────────────

/// [`ClientTransport`] that stores every message, or fails on demand.
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<ProxyMessage>>,
    failing: AtomicBool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<ProxyMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl ClientTransport for RecordingTransport {
    fn send(&self, message: ProxyMessage) -> Result<(), TransportError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(TransportError::Closed);
        }
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}

/// Builds a zone-0 remote whose cursor starts at the center of `shape`.
pub fn make_remote(
    name: &str,
    shape: ScreenShape,
    transport: &Arc<RecordingTransport>,
) -> RemoteClientProxy {
    let info = ScreenInfo {
        shape,
        cursor: shape.center(),
    };
    let transport: Arc<dyn ClientTransport> = transport.clone();
    RemoteClientProxy::new(name, Uuid::new_v4(), info, 0, transport).expect("valid test remote")
}
