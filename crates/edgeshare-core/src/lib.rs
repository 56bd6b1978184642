//! # edgeshare-core
//!
//! Shared domain library for edgeshare: screen geometry, the screen model,
//! the named screen topology, platform-independent input identifiers, and the
//! logical messages exchanged with remote endpoints.
//!
//! This crate has zero dependencies on OS APIs, network sockets, or async
//! runtimes.
//!
//! # Architecture overview
//!
//! edgeshare lets one keyboard and mouse (attached to the *primary* machine)
//! drive several *secondary* machines.  When the cursor reaches an edge of the
//! primary screen that has a neighbour, keyboard and mouse focus moves to the
//! neighbouring machine.
//!
//! - **`domain`** – Pure rules with no I/O.  [`ScreenShape`] and [`Edge`]
//!   describe geometry, [`Screen`] is the validated per-display model, and
//!   [`ScreenLayout`] records which screen lies beyond which edge.
//!
//! - **`protocol`** – The *logical* forms of every endpoint call
//!   ([`ProxyMessage`]) and every report a secondary sends back
//!   ([`ClientReport`]), plus the enter sequence numbers that make reordered
//!   acknowledgements harmless.  Byte-level framing belongs to the transport.

pub mod domain;
pub mod protocol;

pub use domain::clipboard::{ClipboardData, ClipboardId};
pub use domain::geometry::{map_edge_position, Edge, ScreenShape, SideMask};
pub use domain::input::{ButtonId, KeyButton, KeyId, ModifierMask, OptionId, OptionsList, ScreenOption};
pub use domain::layout::{crossing_edge, LayoutError, Link, ScreenLayout};
pub use domain::screen::{Screen, ScreenError};
pub use protocol::messages::{ClientReport, ProxyMessage, ScreenInfo};
pub use protocol::sequence::{SequenceCounter, SequenceGate};
