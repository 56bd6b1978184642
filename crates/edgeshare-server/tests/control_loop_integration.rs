//! Integration tests for the serialized control loop.
//!
//! The orchestrator runs inside `control_loop::run` exactly as in the host
//! binary; the tests play the input hook and the connection tasks by sending
//! `ServerEvent`s.  Tokio time is paused, so enter timeouts fire
//! deterministically.

use std::time::Duration;

use edgeshare_core::{
    ClientReport, ClipboardData, ClipboardId, Edge, Link, ProxyMessage, ScreenInfo, ScreenShape,
    SideMask,
};
use edgeshare_server::application::control_loop::{self, OrchestratorHandle, ServerEvent};
use edgeshare_server::application::orchestrator::{OrchestratorConfig, ScreenOrchestrator};
use edgeshare_server::application::primary_client::PrimaryClientAdapter;
use edgeshare_server::application::update_layout::build_layout;
use edgeshare_server::infrastructure::platform::headless::HeadlessScreen;
use edgeshare_server::infrastructure::transport::channel::ChannelTransport;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use uuid::Uuid;

const ACK_TIMEOUT: Duration = Duration::from_millis(500);

// ── Fixtures ──────────────────────────────────────────────────────────────────

struct Server {
    handle: OrchestratorHandle,
    task: JoinHandle<ScreenOrchestrator>,
    screen: HeadlessScreen,
}

impl Server {
    fn start() -> Self {
        let layout = build_layout(
            "desk",
            vec!["laptop".to_string()],
            vec![
                Link {
                    from: "desk".to_string(),
                    edge: Edge::Right,
                    to: "laptop".to_string(),
                },
                Link {
                    from: "laptop".to_string(),
                    edge: Edge::Left,
                    to: "desk".to_string(),
                },
            ],
        )
        .expect("valid layout");
        let screen =
            HeadlessScreen::new("desk", ScreenShape::new(0, 0, 1920, 1080), 1).expect("screen");
        let primary = PrimaryClientAdapter::new("desk", Box::new(screen.handle()));
        let config = OrchestratorConfig {
            enter_ack_timeout: ACK_TIMEOUT,
        };
        let orchestrator = ScreenOrchestrator::new(primary, layout, config).expect("starts");

        let (handle, events) = control_loop::channel(64);
        let task = tokio::spawn(control_loop::run(orchestrator, events));
        Self {
            handle,
            task,
            screen,
        }
    }

    async fn send(&self, event: ServerEvent) {
        self.handle.send(event).await.expect("loop running");
    }

    async fn connect_laptop(&self) -> (Uuid, UnboundedReceiver<ProxyMessage>) {
        let info = ScreenInfo {
            shape: ScreenShape::new(0, 0, 1280, 800),
            cursor: (640, 400),
        };
        let (proxy, rx) = ChannelTransport::connect("laptop", info, 0).expect("valid laptop");
        let connection_id = proxy.connection_id();
        self.send(ServerEvent::ClientConnected(proxy)).await;
        (connection_id, rx)
    }

    async fn stop(self) -> ScreenOrchestrator {
        self.send(ServerEvent::Shutdown).await;
        self.task.await.expect("loop does not panic")
    }
}

fn drain(rx: &mut UnboundedReceiver<ProxyMessage>) -> Vec<ProxyMessage> {
    let mut messages = Vec::new();
    while let Ok(message) = rx.try_recv() {
        messages.push(message);
    }
    messages
}

fn enter_seqs(messages: &[ProxyMessage]) -> Vec<u32> {
    messages
        .iter()
        .filter_map(|m| match m {
            ProxyMessage::Enter { seq, .. } => Some(*seq),
            _ => None,
        })
        .collect()
}

// ── Enter timeout ─────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_unacknowledged_enter_reverts_and_disables_edge_until_reconnect() {
    // Arrange
    let server = Server::start();
    let (_, mut first) = server.connect_laptop().await;

    // Act: hand off, never acknowledge, then keep pushing at the edge
    server.send(ServerEvent::CursorSample { x: 1919, y: 540 }).await;
    tokio::time::sleep(ACK_TIMEOUT + Duration::from_millis(10)).await;
    server.send(ServerEvent::CursorSample { x: 1919, y: 540 }).await;
    tokio::time::sleep(Duration::from_millis(1)).await;

    // Assert: one enter only, focus home, right edge no longer live
    assert_eq!(enter_seqs(&drain(&mut first)), vec![2]);
    assert_eq!(server.screen.active_sides(), SideMask::NONE);
    assert_eq!(server.screen.cursor(), (1918, 540));
    assert!(server.screen.is_pointer_visible());

    // Act: the laptop reconnects and the edge works again
    let (_, mut second) = server.connect_laptop().await;
    server.send(ServerEvent::CursorSample { x: 1919, y: 540 }).await;
    let orchestrator = server.stop().await;

    // Assert
    assert_eq!(enter_seqs(&drain(&mut second)), vec![4]);
    assert!(orchestrator.registry().is_connected("laptop"));
}

#[tokio::test(start_paused = true)]
async fn test_unacknowledged_enter_times_out_after_focus_returns() {
    // Arrange
    let server = Server::start();
    let (_, mut rx) = server.connect_laptop().await;

    // Act: hand off, come straight back, never acknowledge
    server.send(ServerEvent::CursorSample { x: 1919, y: 540 }).await;
    server.send(ServerEvent::CursorSample { x: 950, y: 540 }).await;
    tokio::time::sleep(ACK_TIMEOUT + Duration::from_millis(10)).await;
    server.send(ServerEvent::CursorSample { x: 1919, y: 540 }).await;
    tokio::time::sleep(Duration::from_millis(1)).await;

    // Assert: the laptop was dropped and its edge is no longer live
    assert_eq!(server.screen.active_sides(), SideMask::NONE);
    let orchestrator = server.stop().await;
    assert_eq!(enter_seqs(&drain(&mut rx)), vec![2]);
    assert!(!orchestrator.registry().is_connected("laptop"));
}

#[tokio::test(start_paused = true)]
async fn test_acknowledged_enter_survives_past_deadline() {
    // Arrange
    let server = Server::start();
    let (connection_id, mut rx) = server.connect_laptop().await;

    // Act
    server.send(ServerEvent::CursorSample { x: 1919, y: 540 }).await;
    server
        .send(ServerEvent::Report {
            name: "laptop".to_string(),
            connection_id,
            report: ClientReport::EnterAck { seq: 2 },
        })
        .await;
    tokio::time::sleep(ACK_TIMEOUT * 4).await;
    server.send(ServerEvent::CursorSample { x: 980, y: 540 }).await;
    let orchestrator = server.stop().await;

    // Assert
    let sent = drain(&mut rx);
    assert!(sent.contains(&ProxyMessage::MouseMove { x: 20, y: 400 }));
    assert!(orchestrator.registry().is_connected("laptop"));
}

#[tokio::test(start_paused = true)]
async fn test_stale_acknowledgement_does_not_cancel_timeout() {
    let server = Server::start();
    let (connection_id, _rx) = server.connect_laptop().await;

    server.send(ServerEvent::CursorSample { x: 1919, y: 540 }).await;
    server
        .send(ServerEvent::Report {
            name: "laptop".to_string(),
            connection_id,
            report: ClientReport::EnterAck { seq: 1 },
        })
        .await;
    tokio::time::sleep(ACK_TIMEOUT + Duration::from_millis(10)).await;
    let orchestrator = server.stop().await;

    assert!(!orchestrator.registry().is_connected("laptop"));
}

// ── Connections ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_late_close_of_replaced_connection_is_ignored() {
    // Arrange
    let server = Server::start();
    let (old_id, old_rx) = server.connect_laptop().await;
    server
        .send(ServerEvent::ClientDisconnected {
            name: "laptop".to_string(),
            connection_id: old_id,
        })
        .await;
    drop(old_rx);
    let (new_id, _new_rx) = server.connect_laptop().await;

    // Act: the old connection's reader reports its close a second time
    server
        .send(ServerEvent::ClientDisconnected {
            name: "laptop".to_string(),
            connection_id: old_id,
        })
        .await;
    let orchestrator = server.stop().await;

    // Assert
    let state = orchestrator.registry().get("laptop").expect("registered");
    assert_eq!(state.connection_id, new_id);
    assert!(orchestrator.registry().is_connected("laptop"));
}

#[tokio::test]
async fn test_clipboard_reports_flow_through_the_loop() {
    // Arrange
    let server = Server::start();
    let (connection_id, _rx) = server.connect_laptop().await;
    server.send(ServerEvent::CursorSample { x: 1919, y: 540 }).await;
    let text = ClipboardData::from_text("copied remotely");

    // Act
    for report in [
        ClientReport::EnterAck { seq: 2 },
        ClientReport::GrabClipboard {
            id: ClipboardId::Clipboard,
            seq: 2,
        },
        ClientReport::ClipboardData {
            id: ClipboardId::Clipboard,
            seq: 2,
            data: text.clone(),
        },
    ] {
        server
            .send(ServerEvent::Report {
                name: "laptop".to_string(),
                connection_id,
                report,
            })
            .await;
    }
    server.send(ServerEvent::CursorSample { x: 900, y: 540 }).await;
    let screen = server.screen.handle();
    let orchestrator = server.stop().await;

    // Assert: focus came home and the desk received the laptop's copy
    assert_eq!(orchestrator.clipboard_owner(ClipboardId::Clipboard), Some("laptop"));
    assert_eq!(screen.clipboard_contents(ClipboardId::Clipboard), Some(text));
}

#[tokio::test]
async fn test_shutdown_restores_primary_and_stops_loop() {
    let server = Server::start();
    let (_, mut rx) = server.connect_laptop().await;
    server.send(ServerEvent::CursorSample { x: 1919, y: 540 }).await;
    let screen = server.screen.handle();

    let orchestrator = server.stop().await;

    assert_eq!(orchestrator.focused_name(), None);
    assert!(drain(&mut rx).contains(&ProxyMessage::Leave));
    assert!(screen.is_pointer_visible());
    assert!(!screen.is_enabled());
}
