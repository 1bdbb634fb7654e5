//! Common test utilities for crossing-monitor
//!
//! Shared fixtures and assertions for the scenario, concurrency and
//! property tests.

#![allow(dead_code)]

mod assertions;
mod fixtures;

pub use assertions::*;
pub use fixtures::*;
