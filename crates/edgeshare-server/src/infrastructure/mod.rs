//! Infrastructure layer for the edgeshare server.
//!
//! Contains the adapters that sit between the orchestrator and the outside
//! world: TOML configuration storage, the in-memory platform screen used by
//! the host binary, and the channel-backed transport for secondaries.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `edgeshare_core`, but MUST NOT be imported by the `application` layer.

pub mod platform;
pub mod storage;
pub mod transport;
