//! Platform screen backends.
//!
//! A real backend installs OS input hooks and talks to the window system.
//! [`headless::HeadlessScreen`] keeps the whole display model in memory, which
//! is enough for the host binary to run without a desktop session and for the
//! integration tests to drive the primary deterministically.

pub mod headless;
