//! [`ClientTransport`] over an unbounded tokio channel.
//!
//! The connection task that owns the socket holds the receiving half and
//! writes each [`ProxyMessage`] out in order.  Sending never blocks the control
//! loop; once the connection task has gone away every send fails with
//! [`TransportError::Closed`], which the proxy treats as a disconnect.

use std::sync::Arc;

use edgeshare_core::{ProxyMessage, ScreenError, ScreenInfo};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::application::remote_client::{ClientTransport, RemoteClientProxy, TransportError};

/// Sending half of a secondary's outbound queue.
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<ProxyMessage>,
}

impl ChannelTransport {
    pub fn new(tx: mpsc::UnboundedSender<ProxyMessage>) -> Self {
        Self { tx }
    }

    /// Creates a transport together with the receiver the connection task
    /// drains.
    pub fn pair() -> (Self, mpsc::UnboundedReceiver<ProxyMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    /// Builds a proxy for a secondary that has just introduced itself,
    /// returning it with the receiving end of its outbound queue and a fresh
    /// connection id.
    ///
    /// # Errors
    ///
    /// Returns a [`ScreenError`] if the reported geometry is unusable.
    pub fn connect(
        name: impl Into<String>,
        info: ScreenInfo,
        jump_zone: u32,
    ) -> Result<(RemoteClientProxy, mpsc::UnboundedReceiver<ProxyMessage>), ScreenError> {
        let (transport, rx) = Self::pair();
        let proxy =
            RemoteClientProxy::new(name, Uuid::new_v4(), info, jump_zone, Arc::new(transport))?;
        Ok((proxy, rx))
    }
}

impl ClientTransport for ChannelTransport {
    fn send(&self, message: ProxyMessage) -> Result<(), TransportError> {
        self.tx.send(message).map_err(|_| TransportError::Closed)
    }
}
