//! Storage infrastructure: configuration file persistence.
//!
//! The `config` sub-module reads the TOML file that describes the primary
//! screen, the secondaries it may hand focus to, the links between their
//! edges and the options pushed to every screen.  It also turns that file
//! into a validated [`ScreenLayout`](edgeshare_core::ScreenLayout) before the
//! orchestrator is built.

pub mod config;
