//! Logical endpoint messages and enter sequence numbers.

pub mod messages;
pub mod sequence;

pub use messages::{ClientReport, ProxyMessage, ScreenInfo};
pub use sequence::{is_newer, SequenceCounter, SequenceGate};
