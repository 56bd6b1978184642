//! Transports carrying [`ProxyMessage`](edgeshare_core::ProxyMessage)s to
//! secondaries.
//!
//! Framing and the network handshake live outside this crate.  The
//! [`channel::ChannelTransport`] adapter hands messages to whatever task owns
//! the connection through an unbounded tokio channel, preserving order.

pub mod channel;
