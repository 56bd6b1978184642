//! Domain entities for edgeshare.
//!
//! Everything here is pure business logic: no OS calls, no sockets, no
//! runtime.  Outer layers (the server's application and infrastructure
//! modules) depend on these types, never the other way round, so every rule
//! can be unit-tested in isolation.

/// Clipboard buffer identifiers and opaque clipboard contents.
pub mod clipboard;

/// Rectangles, edges, and the active-sides bitmask.
pub mod geometry;

/// Platform-independent key, button, modifier and option identifiers.
pub mod input;

/// Named screen topology and the edge-crossing decision.
pub mod layout;

/// The validated per-display screen model.
pub mod screen;
