//! The serialized control path.
//!
//! One tokio task owns the [`ScreenOrchestrator`] and is the only code that
//! ever touches it.  Everything else (the primary's input hook, each
//! connection's reader task, the host's signal handler) talks to it by
//! sending a [`ServerEvent`] through an [`OrchestratorHandle`].  Because a
//! single task drains a single channel, focus transitions are totally ordered
//! and every input event is routed exactly once, in capture order.
//!
//! The loop also sleeps until the earliest unacknowledged `enter` deadline, if
//! any, so an unresponsive secondary is disconnected without a periodic timer,
//! even after focus has moved on.
//!
//! ```text
//! input hook ─┐
//! reader(s)  ─┼─► mpsc<ServerEvent> ─► run() ─► ScreenOrchestrator
//! ctrl-c     ─┘                          ▲
//!                       sleep_until(enter deadline)
//! ```

use edgeshare_core::{
    ButtonId, ClientReport, ClipboardId, KeyButton, KeyId, ModifierMask, OptionsList,
};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::orchestrator::ScreenOrchestrator;
use super::remote_client::RemoteClientProxy;

/// Everything the orchestrator reacts to.
#[derive(Debug)]
pub enum ServerEvent {
    // ── Primary input hook ──
    /// Absolute pointer position on the primary.
    CursorSample { x: i32, y: i32 },
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
    MouseWheel { x_delta: i32, y_delta: i32 },
    /// A local application took ownership of a primary clipboard buffer.
    PrimaryClipboardGrabbed { id: ClipboardId },
    /// The contents of a primary-owned buffer changed.
    PrimaryClipboardChanged { id: ClipboardId },
    Screensaver { activate: bool },

    // ── Connections ──
    ClientConnected(RemoteClientProxy),
    Report {
        name: String,
        connection_id: Uuid,
        report: ClientReport,
    },
    ClientDisconnected { name: String, connection_id: Uuid },

    // ── Host ──
    SetOptions(OptionsList),
    ResetOptions,
    Shutdown,
}

/// Errors returned by [`OrchestratorHandle`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ControlError {
    /// The control loop has exited.
    #[error("control loop has stopped")]
    Stopped,

    /// The event queue is full (only from [`OrchestratorHandle::try_send`]).
    #[error("control loop queue is full")]
    Full,
}

/// Cloneable sender side of the control loop.
#[derive(Debug, Clone)]
pub struct OrchestratorHandle {
    tx: mpsc::Sender<ServerEvent>,
}

impl OrchestratorHandle {
    /// Queues `event`, waiting for space if the queue is full.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::Stopped`] once the loop has exited.
    pub async fn send(&self, event: ServerEvent) -> Result<(), ControlError> {
        self.tx.send(event).await.map_err(|_| ControlError::Stopped)
    }

    /// Queues `event` without waiting.  For callers that cannot await, such
    /// as a platform hook thread.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::Full`] or [`ControlError::Stopped`].
    pub fn try_send(&self, event: ServerEvent) -> Result<(), ControlError> {
        self.tx.try_send(event).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => ControlError::Full,
            mpsc::error::TrySendError::Closed(_) => ControlError::Stopped,
        })
    }
}

/// Creates the event channel.  Pass the receiver to [`run`].
pub fn channel(capacity: usize) -> (OrchestratorHandle, mpsc::Receiver<ServerEvent>) {
    let (tx, rx) = mpsc::channel(capacity);
    (OrchestratorHandle { tx }, rx)
}

/// Drives `orchestrator` until [`ServerEvent::Shutdown`] arrives or every
/// handle is dropped, then shuts it down and hands it back.
pub async fn run(
    mut orchestrator: ScreenOrchestrator,
    mut events: mpsc::Receiver<ServerEvent>,
) -> ScreenOrchestrator {
    info!(screen = %orchestrator.primary_name(), "control loop started");
    loop {
        let deadline = orchestrator.enter_deadline();
        tokio::select! {
            // Drain queued events first so an acknowledgement that is already
            // waiting beats its own deadline.
            biased;

            event = events.recv() => match event {
                Some(ServerEvent::Shutdown) | None => break,
                Some(event) => dispatch(&mut orchestrator, event),
            },
            _ = wait_until(deadline) => {
                orchestrator.poll_enter_timeout(Instant::now());
            }
        }
    }
    orchestrator.shutdown();
    info!("control loop stopped");
    orchestrator
}

/// Applies one event to the orchestrator.
pub fn dispatch(orchestrator: &mut ScreenOrchestrator, event: ServerEvent) {
    match event {
        ServerEvent::CursorSample { x, y } => orchestrator.on_cursor_sample(x, y),
        ServerEvent::KeyDown { key, mask, button } => orchestrator.on_key_down(key, mask, button),
        ServerEvent::KeyRepeat {
            key,
            mask,
            count,
            button,
        } => orchestrator.on_key_repeat(key, mask, count, button),
        ServerEvent::KeyUp { key, mask, button } => orchestrator.on_key_up(key, mask, button),
        ServerEvent::MouseDown { button } => orchestrator.on_mouse_down(button),
        ServerEvent::MouseUp { button } => orchestrator.on_mouse_up(button),
        ServerEvent::MouseWheel { x_delta, y_delta } => orchestrator.on_mouse_wheel(x_delta, y_delta),
        ServerEvent::PrimaryClipboardGrabbed { id } => orchestrator.on_primary_clipboard_grabbed(id),
        ServerEvent::PrimaryClipboardChanged { id } => orchestrator.on_primary_clipboard_changed(id),
        ServerEvent::Screensaver { activate } => orchestrator.on_screensaver(activate),
        ServerEvent::ClientConnected(proxy) => {
            if let Err(e) = orchestrator.add_client(proxy) {
                warn!(error = %e, "rejecting secondary");
            }
        }
        ServerEvent::Report {
            name,
            connection_id,
            report,
        } => orchestrator.handle_report(&name, connection_id, report),
        ServerEvent::ClientDisconnected {
            name,
            connection_id,
        } => orchestrator.on_client_disconnected(&name, connection_id),
        ServerEvent::SetOptions(options) => orchestrator.set_options(options),
        ServerEvent::ResetOptions => orchestrator.reset_options(),
        ServerEvent::Shutdown => {
            debug!("shutdown is handled by the loop, ignoring");
        }
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
