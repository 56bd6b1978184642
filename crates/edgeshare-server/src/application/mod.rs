//! Application layer of the edgeshare server.
//!
//! Everything here depends only on traits ([`PlatformScreen`],
//! [`ClientTransport`]) and `edgeshare_core` domain types.  Concrete backends
//! live in `infrastructure` and are injected at construction time, which keeps
//! every use case unit-testable with recording doubles.
//!
//! # Sub-modules
//!
//! - **`endpoint`** – The `ScreenEndpoint` / `ClientEndpoint` capabilities and
//!   the tagged [`Endpoint`] enum the orchestrator stores.
//!
//! - **`clipboard`** – Per-endpoint dirty / ownership bookkeeping.
//!
//! - **`primary_client`** – Adapter that makes the local display look like any
//!   other endpoint.
//!
//! - **`remote_client`** – Proxy that turns endpoint calls into
//!   [`ProxyMessage`]s for a secondary.
//!
//! - **`manage_clients`** – Connected / disconnected state per screen name.
//!
//! - **`update_layout`** – Builds and validates the screen topology.
//!
//! - **`orchestrator`** – The active-focus state machine.  Runs on every cursor
//!   sample and keystroke.
//!
//! - **`control_loop`** – The single tokio task that owns the orchestrator and
//!   serializes every event that reaches it.
//!
//! [`PlatformScreen`]: primary_client::PlatformScreen
//! [`ClientTransport`]: remote_client::ClientTransport
//! [`Endpoint`]: endpoint::Endpoint
//! [`ProxyMessage`]: edgeshare_core::ProxyMessage

pub mod clipboard;
pub mod control_loop;
pub mod endpoint;
pub mod manage_clients;
pub mod orchestrator;
pub mod primary_client;
pub mod remote_client;
pub mod update_layout;

#[cfg(test)]
pub(crate) mod test_support;
