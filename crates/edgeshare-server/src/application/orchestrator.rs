//! ScreenOrchestrator: decides which screen owns the keyboard and mouse.
//!
//! The orchestrator owns the primary adapter, every connected remote proxy and
//! the screen topology.  It is the only place that changes focus, and every
//! event the primary captures passes through it exactly once.
//!
//! # Focus state machine
//!
//! ```text
//!   new() ──► Focused(primary) ──crossing──► Focused(remote) ──crossing──► ...
//!                  ▲                               │
//!                  └──── enter timeout / disconnect┘
//!   shutdown() ──► Idle
//! ```
//!
//! # Edge crossing
//!
//! While the primary is focused, cursor samples are absolute primary
//! coordinates and are tested against the primary's jump zones directly.
//! While a remote is focused, the primary pointer is parked on its cursor
//! center; each sample is turned into a delta from the center, the primary is
//! warped back, and the remote's mirrored cursor advances by the delta.  A
//! remote's jump zone is normally 0, so it hands off only once the cursor is
//! pushed past its edge.
//!
//! A handoff is suppressed while the primary is locked to its screen or while
//! any key or mouse button is held, so a key-up always reaches the screen that
//! saw the key-down.
//!
//! # Enter acknowledgements
//!
//! `enter` on a remote never blocks.  The orchestrator records a
//! [`PendingEnter`] per remote with a deadline; the control loop calls
//! [`ScreenOrchestrator::poll_enter_timeout`] when the earliest deadline passes
//! and every unresponsive remote is disconnected.  Moving focus on does not
//! forgive a missing acknowledgement: a re-entered remote keeps its first
//! deadline.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::time::Duration;

use edgeshare_core::domain::screen::validate_geometry;
use edgeshare_core::protocol::is_newer;
use edgeshare_core::{
    crossing_edge, ButtonId, ClientReport, ClipboardData, ClipboardId, Edge, KeyButton, KeyId,
    ModifierMask, OptionsList, ScreenError, ScreenInfo, ScreenLayout, ScreenOption,
    SequenceCounter, SideMask,
};
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

use super::endpoint::{ClientEndpoint, Endpoint, ScreenEndpoint};
use super::manage_clients::ClientRegistry;
use super::primary_client::PrimaryClientAdapter;
use super::remote_client::RemoteClientProxy;

/// How long a remote may take to acknowledge an `enter`.
pub const DEFAULT_ENTER_ACK_TIMEOUT: Duration = Duration::from_millis(1000);

/// Errors returned to the host.  Routing itself never fails; only setup and
/// connection admission do.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrchestratorError {
    #[error("primary screen is misconfigured: {0}")]
    PrimaryScreen(#[from] ScreenError),

    #[error("primary screen {0:?} is not part of the layout")]
    PrimaryNotInLayout(String),

    /// A screen with this name is already connected (or is the primary).
    #[error("screen {0:?} is already connected")]
    DuplicateName(String),

    /// The connecting screen does not appear in the layout.
    #[error("screen {0:?} is not part of the layout")]
    UnknownScreen(String),
}

/// Tunables for the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub enter_ack_timeout: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            enter_ack_timeout: DEFAULT_ENTER_ACK_TIMEOUT,
        }
    }
}

/// Which screen currently receives input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusState {
    /// After [`ScreenOrchestrator::shutdown`]; every event is dropped.
    Idle,
    Focused(String),
}

/// An `enter` sent to a remote that has not been acknowledged yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEnter {
    pub screen: String,
    pub seq: u32,
    pub deadline: Instant,
}

/// Server-side record of one clipboard buffer.
#[derive(Debug, Clone, Default)]
struct ClipboardState {
    owner: Option<String>,
    seq: u32,
    data: Option<ClipboardData>,
}

/// Where a held key or button was delivered.
enum HeldTarget {
    Screen(String),
    /// The receiving screen disconnected while the input was held.
    Gone,
    /// No matching press was seen.
    Unknown,
}

/// Keys or buttons currently held down, with the screen that saw the press.
#[derive(Debug)]
struct HeldInput<K> {
    targets: HashMap<K, String>,
    orphaned: HashSet<K>,
}

impl<K> Default for HeldInput<K> {
    fn default() -> Self {
        Self {
            targets: HashMap::new(),
            orphaned: HashSet::new(),
        }
    }
}

impl<K: Copy + Eq + Hash> HeldInput<K> {
    fn press(&mut self, input: K, screen: String) {
        self.orphaned.remove(&input);
        self.targets.insert(input, screen);
    }

    fn target(&self, input: K) -> HeldTarget {
        match self.targets.get(&input) {
            Some(screen) => HeldTarget::Screen(screen.clone()),
            None if self.orphaned.contains(&input) => HeldTarget::Gone,
            None => HeldTarget::Unknown,
        }
    }

    fn release(&mut self, input: K) -> HeldTarget {
        if let Some(screen) = self.targets.remove(&input) {
            HeldTarget::Screen(screen)
        } else if self.orphaned.remove(&input) {
            HeldTarget::Gone
        } else {
            HeldTarget::Unknown
        }
    }

    /// Forgets every press delivered to `screen`; the matching releases are
    /// dropped instead of going elsewhere.
    fn orphan(&mut self, screen: &str) {
        let gone: Vec<K> = self
            .targets
            .iter()
            .filter(|(_, s)| s.as_str() == screen)
            .map(|(k, _)| *k)
            .collect();
        for input in gone {
            self.targets.remove(&input);
            self.orphaned.insert(input);
        }
    }

    fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    fn clear(&mut self) {
        self.targets.clear();
        self.orphaned.clear();
    }
}

/// The active-focus state machine.
pub struct ScreenOrchestrator {
    primary_name: String,
    primary: PrimaryClientAdapter,
    remotes: HashMap<String, RemoteClientProxy>,
    layout: ScreenLayout,
    registry: ClientRegistry,
    focus: FocusState,
    seq: SequenceCounter,
    /// Unacknowledged enters, keyed by remote name.
    pending_enters: HashMap<String, PendingEnter>,
    /// Previous absolute primary sample, for the motion delta.
    last_sample: Option<(i32, i32)>,
    /// Where the pointer left the primary; focus returns here on a revert.
    primary_return: Option<(i32, i32)>,
    held_keys: HeldInput<KeyButton>,
    held_buttons: HeldInput<ButtonId>,
    clipboards: [ClipboardState; ClipboardId::COUNT],
    options: OptionsList,
    /// Screen and cursor to restore when the screensaver deactivates.
    screensaver_return: Option<(String, (i32, i32))>,
    config: OrchestratorConfig,
}

impl ScreenOrchestrator {
    /// Validates the primary, enables its hooks and gives it focus.
    ///
    /// # Errors
    ///
    /// - [`OrchestratorError::PrimaryScreen`] if the primary's geometry is
    ///   inconsistent with its jump zone.
    /// - [`OrchestratorError::PrimaryNotInLayout`] if `layout` is rooted
    ///   elsewhere.
    pub fn new(
        mut primary: PrimaryClientAdapter,
        layout: ScreenLayout,
        config: OrchestratorConfig,
    ) -> Result<Self, OrchestratorError> {
        let primary_name = primary.name().to_string();
        validate_geometry(&primary_name, &primary.shape(), primary.jump_zone_size())?;
        if !layout.contains(&primary_name) {
            return Err(OrchestratorError::PrimaryNotInLayout(primary_name));
        }

        primary.enable();
        let mut seq = SequenceCounter::new();
        let (cx, cy) = primary.cursor_center();
        let mask = primary.toggle_mask();
        primary.enter(cx, cy, seq.next(), mask, false);

        let mut orchestrator = Self {
            focus: FocusState::Focused(primary_name.clone()),
            primary_name,
            primary,
            remotes: HashMap::new(),
            layout,
            registry: ClientRegistry::new(),
            seq,
            pending_enters: HashMap::new(),
            last_sample: None,
            primary_return: None,
            held_keys: HeldInput::default(),
            held_buttons: HeldInput::default(),
            clipboards: Default::default(),
            options: OptionsList::new(),
            screensaver_return: None,
            config,
        };
        orchestrator.reconfigure_primary();
        info!(screen = %orchestrator.primary_name, "orchestrator started");
        Ok(orchestrator)
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    pub fn focus(&self) -> &FocusState {
        &self.focus
    }

    /// Name of the focused screen, `None` once idle.
    pub fn focused_name(&self) -> Option<&str> {
        match &self.focus {
            FocusState::Focused(name) => Some(name),
            FocusState::Idle => None,
        }
    }

    pub fn primary_name(&self) -> &str {
        &self.primary_name
    }

    pub fn primary(&self) -> &PrimaryClientAdapter {
        &self.primary
    }

    pub fn remote(&self, name: &str) -> Option<&RemoteClientProxy> {
        self.remotes.get(name)
    }

    /// Read access to any connected screen, primary included.
    pub fn endpoint(&self, name: &str) -> Option<&dyn ClientEndpoint> {
        if name == self.primary_name {
            Some(&self.primary as &dyn ClientEndpoint)
        } else {
            self.remotes.get(name).map(|r| r as &dyn ClientEndpoint)
        }
    }

    pub fn layout(&self) -> &ScreenLayout {
        &self.layout
    }

    pub fn registry(&self) -> &ClientRegistry {
        &self.registry
    }

    /// The unacknowledged `enter` sent to `name`, if any.
    pub fn pending_enter(&self, name: &str) -> Option<&PendingEnter> {
        self.pending_enters.get(name)
    }

    /// When the earliest outstanding `enter` times out, if there is one.
    pub fn enter_deadline(&self) -> Option<Instant> {
        self.pending_enters.values().map(|p| p.deadline).min()
    }

    /// The most recently issued enter sequence number.
    pub fn current_seq(&self) -> u32 {
        self.seq.current()
    }

    pub fn options(&self) -> &[ScreenOption] {
        &self.options
    }

    pub fn clipboard_owner(&self, id: ClipboardId) -> Option<&str> {
        self.clipboards[id.index()].owner.as_deref()
    }

    /// `true` while focus may not move by crossing an edge.
    pub fn is_locked_to_screen(&self) -> bool {
        self.primary.is_locked_to_screen()
            || !self.held_keys.is_empty()
            || !self.held_buttons.is_empty()
    }

    // ── Connections ───────────────────────────────────────────────────────────

    /// Admits a newly connected secondary.  Its edges become live jump zones
    /// and the current option list is replayed to it.
    ///
    /// # Errors
    ///
    /// - [`OrchestratorError::DuplicateName`] if the name is already connected.
    /// - [`OrchestratorError::UnknownScreen`] if the layout does not mention it.
    pub fn add_client(&mut self, mut proxy: RemoteClientProxy) -> Result<(), OrchestratorError> {
        let name = proxy.name().to_string();
        if name == self.primary_name || self.remotes.contains_key(&name) {
            return Err(OrchestratorError::DuplicateName(name));
        }
        if !self.layout.contains(&name) {
            return Err(OrchestratorError::UnknownScreen(name));
        }

        proxy.reset_options();
        if !self.options.is_empty() {
            proxy.set_options(&self.options);
        }
        self.registry.connect(&name, proxy.connection_id());
        info!(screen = %name, connection_id = %proxy.connection_id(), "secondary connected");
        self.remotes.insert(name, proxy);
        self.reconfigure_primary();
        self.reap_failed();
        Ok(())
    }

    /// Removes a secondary.  If it held focus (or an `enter` to it was still
    /// pending) focus reverts to the primary.  Returns `false` if no such
    /// secondary was connected.
    pub fn remove_client(&mut self, name: &str, reason: &str) -> bool {
        if self.remotes.remove(name).is_none() {
            return false;
        }
        info!(screen = %name, reason, "secondary disconnected");
        self.registry.disconnect(name, reason);

        self.pending_enters.remove(name);
        self.held_keys.orphan(name);
        self.held_buttons.orphan(name);
        if self
            .screensaver_return
            .as_ref()
            .is_some_and(|(screen, _)| screen == name)
        {
            self.screensaver_return = None;
        }
        if self.focused_name() == Some(name) {
            self.revert_to_primary();
        }
        self.reconfigure_primary();
        true
    }

    /// Transport-level close.  Ignored unless `connection_id` matches the live
    /// connection for `name`, so a late close from a replaced connection
    /// cannot remove its successor.
    pub fn on_client_disconnected(&mut self, name: &str, connection_id: Uuid) {
        if self.is_live_connection(name, connection_id) {
            self.remove_client(name, "connection closed");
        } else {
            debug!(screen = %name, %connection_id, "ignoring close of stale connection");
        }
    }

    /// Dispatches one report from a secondary.
    pub fn handle_report(&mut self, name: &str, connection_id: Uuid, report: ClientReport) {
        if !self.is_live_connection(name, connection_id) {
            debug!(screen = %name, %connection_id, "ignoring report from stale connection");
            return;
        }
        match report {
            ClientReport::EnterAck { seq } => self.on_enter_acknowledged(name, seq),
            ClientReport::Info(info) => self.on_screen_info(name, info),
            ClientReport::GrabClipboard { id, seq } => self.on_clipboard_grabbed(name, id, seq),
            ClientReport::ClipboardData { id, seq, data } => {
                self.on_clipboard_changed(name, id, seq, data)
            }
            ClientReport::ClipboardRequest { id } => self.on_clipboard_requested(name, id),
        }
    }

    // ── Enter acknowledgements ────────────────────────────────────────────────

    /// Clears the pending enter for `name` if `seq` matches its latest enter.
    /// Anything else is a late acknowledgement of an older enter and is
    /// ignored.
    pub fn on_enter_acknowledged(&mut self, name: &str, seq: u32) {
        if self.pending_enters.get(name).is_some_and(|p| p.seq == seq) {
            debug!(screen = %name, seq, "enter acknowledged");
            self.pending_enters.remove(name);
        } else {
            debug!(screen = %name, seq, "ignoring stale enter acknowledgement");
        }
    }

    /// Disconnects every remote whose pending enter has a deadline at or
    /// before `now`, focused or not.  Returns `true` if any timeout fired.
    pub fn poll_enter_timeout(&mut self, now: Instant) -> bool {
        let mut expired: Vec<PendingEnter> = self
            .pending_enters
            .values()
            .filter(|p| p.deadline <= now)
            .cloned()
            .collect();
        if expired.is_empty() {
            return false;
        }
        expired.sort_by_key(|p| p.deadline);
        for pending in expired {
            warn!(screen = %pending.screen, seq = pending.seq, "enter not acknowledged in time");
            self.remove_client(&pending.screen, "enter timeout");
        }
        true
    }

    // ── Primary input ─────────────────────────────────────────────────────────

    /// An absolute pointer sample from the primary's input hook.
    pub fn on_cursor_sample(&mut self, x: i32, y: i32) {
        let Some(focused) = self.focused_name().map(str::to_owned) else {
            return;
        };
        if focused == self.primary_name {
            self.on_primary_motion(x, y);
        } else {
            self.on_remote_motion(&focused, x, y);
        }
        self.reap_failed();
    }

    pub fn on_key_down(&mut self, key: KeyId, mask: ModifierMask, button: KeyButton) {
        let Some(target) = self.focused_name().map(str::to_owned) else {
            return;
        };
        if let Some(mut endpoint) = self.endpoint_mut(&target) {
            endpoint.key_down(key, mask, button);
        }
        self.held_keys.press(button, target);
        self.reap_failed();
    }

    pub fn on_key_repeat(&mut self, key: KeyId, mask: ModifierMask, count: u32, button: KeyButton) {
        let held = self.held_keys.target(button);
        let Some(target) = self.held_target(held) else {
            trace!(key = key.0, "dropping repeat for key held on a departed screen");
            return;
        };
        if let Some(mut endpoint) = self.endpoint_mut(&target) {
            endpoint.key_repeat(key, mask, count, button);
        }
        self.reap_failed();
    }

    pub fn on_key_up(&mut self, key: KeyId, mask: ModifierMask, button: KeyButton) {
        let held = self.held_keys.release(button);
        let Some(target) = self.held_target(held) else {
            trace!(key = key.0, "dropping release for key held on a departed screen");
            return;
        };
        if let Some(mut endpoint) = self.endpoint_mut(&target) {
            endpoint.key_up(key, mask, button);
        }
        self.reap_failed();
    }

    pub fn on_mouse_down(&mut self, button: ButtonId) {
        let Some(target) = self.focused_name().map(str::to_owned) else {
            return;
        };
        if let Some(mut endpoint) = self.endpoint_mut(&target) {
            endpoint.mouse_down(button);
        }
        self.held_buttons.press(button, target);
        self.reap_failed();
    }

    pub fn on_mouse_up(&mut self, button: ButtonId) {
        let held = self.held_buttons.release(button);
        let Some(target) = self.held_target(held) else {
            trace!(?button, "dropping release for button held on a departed screen");
            return;
        };
        if let Some(mut endpoint) = self.endpoint_mut(&target) {
            endpoint.mouse_up(button);
        }
        self.reap_failed();
    }

    pub fn on_mouse_wheel(&mut self, x_delta: i32, y_delta: i32) {
        let Some(target) = self.focused_name().map(str::to_owned) else {
            return;
        };
        if let Some(mut endpoint) = self.endpoint_mut(&target) {
            endpoint.mouse_wheel(x_delta, y_delta);
        }
        self.reap_failed();
    }

    // ── Clipboard ─────────────────────────────────────────────────────────────

    /// Screen `name` took ownership of buffer `id`.
    ///
    /// The primary may always grab.  A remote that is not focused may only
    /// grab with a sequence number at least as new as the current enter;
    /// anything older was sent before focus moved away and is ignored.
    pub fn on_clipboard_grabbed(&mut self, name: &str, id: ClipboardId, seq: u32) {
        if self.endpoint(name).is_none() {
            debug!(screen = %name, %id, "ignoring grab from unknown screen");
            return;
        }
        let is_primary = name == self.primary_name;
        let is_focused = self.focused_name() == Some(name);
        if !is_primary && !is_focused && is_newer(self.seq.current(), seq) {
            debug!(screen = %name, %id, seq, "ignoring stale clipboard grab");
            return;
        }

        info!(screen = %name, %id, seq, "clipboard grabbed");
        self.clipboards[id.index()] = ClipboardState {
            owner: Some(name.to_string()),
            seq,
            data: None,
        };
        self.for_each_endpoint(|mut endpoint| {
            if endpoint.name() == name {
                endpoint.mark_clipboard_owned(id);
            } else {
                endpoint.grab_clipboard(id);
            }
        });
        self.reap_failed();
    }

    /// The local user copied something on the primary.
    pub fn on_primary_clipboard_grabbed(&mut self, id: ClipboardId) {
        let name = self.primary_name.clone();
        let seq = self.seq.current();
        self.on_clipboard_grabbed(&name, id, seq);
    }

    /// New contents from the owner of buffer `id`.
    ///
    /// Every other screen is marked dirty; only the focused screen receives
    /// the data now.  The rest get it on their next `enter` or on request.
    pub fn on_clipboard_changed(&mut self, name: &str, id: ClipboardId, seq: u32, data: ClipboardData) {
        let state = &self.clipboards[id.index()];
        if state.owner.as_deref() != Some(name) || state.seq != seq {
            debug!(screen = %name, %id, seq, "ignoring clipboard from non-owner");
            return;
        }
        if state.data.as_ref() == Some(&data) {
            trace!(screen = %name, %id, "clipboard unchanged");
            return;
        }

        debug!(screen = %name, %id, bytes = data.len(), "clipboard changed");
        self.clipboards[id.index()].data = Some(data.clone());
        if let Some(remote) = self.remotes.get_mut(name) {
            remote.store_clipboard(id, data.clone());
        }
        self.for_each_endpoint(|mut endpoint| {
            if endpoint.name() != name {
                endpoint.set_clipboard_dirty(id, true);
            }
        });
        let focused = self.focused_name().filter(|f| *f != name).map(str::to_owned);
        if let Some(mut endpoint) = focused.as_deref().and_then(|f| self.endpoint_mut(f)) {
            endpoint.set_clipboard(id, &data);
        }
        self.reap_failed();
    }

    /// Re-reads buffer `id` from the primary and propagates it.  A read failure
    /// skips the refresh.
    pub fn on_primary_clipboard_changed(&mut self, id: ClipboardId) {
        if self.clipboard_owner(id) != Some(self.primary_name.as_str()) {
            return;
        }
        match self.primary.clipboard(id) {
            Ok(data) => {
                let name = self.primary_name.clone();
                let seq = self.clipboards[id.index()].seq;
                self.on_clipboard_changed(&name, id, seq, data);
            }
            Err(e) => debug!(%id, error = %e, "skipping primary clipboard refresh"),
        }
    }

    /// Screen `name` asked for the current contents of buffer `id`.
    pub fn on_clipboard_requested(&mut self, name: &str, id: ClipboardId) {
        let state = &self.clipboards[id.index()];
        if state.owner.as_deref() == Some(name) {
            return;
        }
        let Some(data) = state.data.clone() else {
            debug!(screen = %name, %id, "clipboard requested but no contents known");
            return;
        };
        if let Some(mut endpoint) = self.endpoint_mut(name) {
            endpoint.set_clipboard_dirty(id, true);
            endpoint.set_clipboard(id, &data);
        }
        self.reap_failed();
    }

    // ── Screensaver / options ─────────────────────────────────────────────────

    /// The primary's screensaver started or stopped.
    ///
    /// Activation pulls focus back to the primary without moving its pointer
    /// and remembers where the user was; deactivation returns there if that
    /// screen is still connected.  Every remote is told either way.
    pub fn on_screensaver(&mut self, activate: bool) {
        if activate {
            if let Some(focused) = self
                .focused_name()
                .filter(|f| *f != self.primary_name)
                .map(str::to_owned)
            {
                let position = self
                    .remotes
                    .get(&focused)
                    .map_or((0, 0), |r| r.cursor_pos());
                let (x, y) = self.primary.cursor_pos();
                let primary = self.primary_name.clone();
                if self.switch_to(&primary, x, y, true) {
                    self.screensaver_return = Some((focused, position));
                }
            }
        }

        for remote in self.remotes.values_mut() {
            remote.screensaver(activate);
        }

        if !activate {
            if let Some((screen, (x, y))) = self.screensaver_return.take() {
                let on_primary = self.focused_name() == Some(self.primary_name.as_str());
                if on_primary && self.remotes.contains_key(&screen) {
                    debug!(screen = %screen, "returning from screensaver");
                    self.switch_to(&screen, x, y, false);
                }
            }
        }
        self.reap_failed();
    }

    /// Stores `options` and sends them to every screen.  Newly connected
    /// screens receive the stored list on admission.
    pub fn set_options(&mut self, options: OptionsList) {
        self.options = options;
        let options = self.options.clone();
        self.for_each_endpoint(|mut endpoint| endpoint.set_options(&options));
        self.reap_failed();
    }

    /// Clears the stored options and resets every screen to its defaults.
    pub fn reset_options(&mut self) {
        self.options.clear();
        self.for_each_endpoint(|mut endpoint| endpoint.reset_options());
        self.reap_failed();
    }

    /// Returns focus to the primary, removes its hooks and goes idle.
    pub fn shutdown(&mut self) {
        if self.focus == FocusState::Idle {
            return;
        }
        if self.focused_name() != Some(self.primary_name.as_str()) {
            let primary = self.primary_name.clone();
            let (x, y) = self.return_point();
            self.switch_to(&primary, x, y, false);
        }
        self.primary.disable();
        self.pending_enters.clear();
        self.held_keys.clear();
        self.held_buttons.clear();
        self.focus = FocusState::Idle;
        info!(screen = %self.primary_name, "orchestrator shut down");
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    fn on_primary_motion(&mut self, x: i32, y: i32) {
        let motion = self
            .last_sample
            .map_or((0, 0), |(px, py)| (x.saturating_sub(px), y.saturating_sub(py)));
        self.last_sample = Some((x, y));

        let shape = self.primary.shape();
        let zone = self.primary.jump_zone_size();
        let sides = self.live_sides(&self.primary_name);
        if let Some(edge) = crossing_edge(&shape, zone, x, y, sides, motion) {
            self.switch_across(edge, x, y);
        }
    }

    fn on_remote_motion(&mut self, name: &str, x: i32, y: i32) {
        let (cx, cy) = self.primary.cursor_center();
        let (dx, dy) = (x.saturating_sub(cx), y.saturating_sub(cy));
        if dx == 0 && dy == 0 {
            // Echo of our own warp.
            return;
        }
        self.primary.warp_cursor(cx, cy);

        let sides = self.live_sides(name);
        let Some(remote) = self.remotes.get(name) else {
            return;
        };
        let (rx, ry) = remote.cursor_pos();
        let (nx, ny) = (rx.saturating_add(dx), ry.saturating_add(dy));
        let shape = remote.shape();
        let zone = remote.jump_zone_size();

        if let Some(edge) = crossing_edge(&shape, zone, nx, ny, sides, (dx, dy)) {
            if self.switch_across(edge, nx, ny) {
                return;
            }
        }

        let (mx, my) = shape.clamp(nx, ny);
        if let Some(remote) = self.remotes.get_mut(name) {
            remote.mouse_move(mx, my);
        }
    }

    /// Hands focus to the neighbour beyond `edge` of the focused screen.
    fn switch_across(&mut self, edge: Edge, x: i32, y: i32) -> bool {
        let Some(from) = self.focused_name().map(str::to_owned) else {
            return false;
        };
        if self.is_locked_to_screen() {
            debug!(screen = %from, %edge, "locked to screen, not switching");
            return false;
        }
        let Some(to) = self.layout.neighbor(&from, edge).map(str::to_owned) else {
            return false;
        };
        let (Some(source), Some(target)) = (self.endpoint(&from), self.endpoint(&to)) else {
            return false;
        };
        let (ex, ey) = source
            .shape()
            .entry_point(edge, x, y, &target.shape(), target.jump_zone_size());

        info!(from = %from, to = %to, %edge, "switching screens");
        self.switch_to(&to, ex, ey, false)
    }

    /// Leaves the focused screen and enters `to` at `(x, y)`.  Returns `false`
    /// if the focused screen refused to leave.
    fn switch_to(&mut self, to: &str, x: i32, y: i32, for_screensaver: bool) -> bool {
        let Some(from) = self.focused_name().map(str::to_owned) else {
            return false;
        };
        if from == to {
            return true;
        }
        let left = self
            .endpoint_mut(&from)
            .map_or(true, |mut endpoint| endpoint.leave());
        if !left {
            debug!(screen = %from, "leave refused, keeping focus");
            if from == self.primary_name {
                self.hold_primary_back();
            }
            return false;
        }

        let leaving_primary = from == self.primary_name;
        if leaving_primary {
            self.primary_return = Some(self.last_sample.unwrap_or_else(|| self.primary.cursor_pos()));
            self.refresh_primary_clipboards();
        }

        self.enter_endpoint(to, x, y, for_screensaver);

        if leaving_primary {
            let (cx, cy) = self.primary.cursor_center();
            self.primary.warp_cursor(cx, cy);
        }
        true
    }

    fn enter_endpoint(&mut self, name: &str, x: i32, y: i32, for_screensaver: bool) {
        let seq = self.seq.next();
        let mask = self.primary.toggle_mask();
        let known: Vec<(ClipboardId, ClipboardData)> = ClipboardId::ALL
            .into_iter()
            .filter_map(|id| self.clipboards[id.index()].data.clone().map(|d| (id, d)))
            .collect();

        let Some(mut endpoint) = self.endpoint_mut(name) else {
            warn!(screen = %name, "cannot enter unknown screen");
            return;
        };
        endpoint.enter(x, y, seq, mask, for_screensaver);
        for (id, data) in &known {
            endpoint.set_clipboard(*id, data);
        }
        let is_primary = endpoint.is_primary();

        self.focus = FocusState::Focused(name.to_string());
        self.last_sample = None;
        if !is_primary {
            let deadline = Instant::now() + self.config.enter_ack_timeout;
            self.pending_enters
                .entry(name.to_string())
                .and_modify(|pending| pending.seq = seq)
                .or_insert_with(|| PendingEnter {
                    screen: name.to_string(),
                    seq,
                    deadline,
                });
        }
        debug!(screen = %name, seq, for_screensaver, "entered screen");
    }

    /// Reads every buffer the primary owns so the screen being entered gets
    /// current contents.
    fn refresh_primary_clipboards(&mut self) {
        for id in ClipboardId::ALL {
            self.on_primary_clipboard_changed(id);
        }
    }

    /// Focus falls back to the primary without a crossing.
    fn revert_to_primary(&mut self) {
        let (x, y) = self.return_point();
        let primary = self.primary_name.clone();
        info!(screen = %primary, "focus reverted to primary");
        self.enter_endpoint(&primary, x, y, false);
    }

    /// Warps the primary pointer out of its jump zones after a refused leave,
    /// so the next sample does not retry the same crossing.  Remotes need no
    /// equivalent: their motion path clamps the mirrored cursor.
    fn hold_primary_back(&mut self) {
        let (x, y) = self
            .last_sample
            .unwrap_or_else(|| self.primary.cursor_pos());
        let held = self
            .primary
            .shape()
            .outside_jump_zones(x, y, self.primary.jump_zone_size());
        if held != (x, y) {
            self.primary.warp_cursor(held.0, held.1);
            self.last_sample = Some(held);
        }
    }

    /// Where the pointer left the primary, pushed out of every jump zone.
    fn return_point(&self) -> (i32, i32) {
        let (x, y) = self
            .primary_return
            .unwrap_or_else(|| self.primary.cursor_center());
        self.primary
            .shape()
            .outside_jump_zones(x, y, self.primary.jump_zone_size())
    }

    fn held_target(&self, held: HeldTarget) -> Option<String> {
        match held {
            HeldTarget::Screen(screen) => Some(screen),
            HeldTarget::Gone => None,
            HeldTarget::Unknown => self.focused_name().map(str::to_owned),
        }
    }

    fn is_live_connection(&self, name: &str, connection_id: Uuid) -> bool {
        self.remotes
            .get(name)
            .is_some_and(|r| r.connection_id() == connection_id)
    }

    /// Edges of `name` that lead to a connected screen.
    fn live_sides(&self, name: &str) -> SideMask {
        self.layout.active_sides(name, |neighbor| {
            neighbor == self.primary_name || self.remotes.contains_key(neighbor)
        })
    }

    fn reconfigure_primary(&mut self) {
        let sides = self.live_sides(&self.primary_name);
        self.primary.reconfigure(sides);
    }

    fn endpoint_mut(&mut self, name: &str) -> Option<Endpoint<'_>> {
        if name == self.primary_name {
            Some(Endpoint::Primary(&mut self.primary))
        } else {
            self.remotes.get_mut(name).map(Endpoint::Remote)
        }
    }

    fn for_each_endpoint(&mut self, mut f: impl FnMut(Endpoint<'_>)) {
        f(Endpoint::Primary(&mut self.primary));
        for remote in self.remotes.values_mut() {
            f(Endpoint::Remote(remote));
        }
    }

    /// Disconnects every remote whose transport has failed.
    fn reap_failed(&mut self) {
        let failed: Vec<String> = self
            .remotes
            .iter()
            .filter(|(_, remote)| remote.has_failed())
            .map(|(name, _)| name.clone())
            .collect();
        for name in failed {
            self.remove_client(&name, "transport closed");
        }
    }

    fn on_screen_info(&mut self, name: &str, info: ScreenInfo) {
        let Some(remote) = self.remotes.get_mut(name) else {
            return;
        };
        if let Err(e) = remote.update_info(info) {
            warn!(screen = %name, error = %e, "rejecting screen info");
            self.remove_client(name, "invalid screen info");
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
