//! Core functionality for host-probe.
//!
//! This module contains the main components:
//! - [`registry`]: Check registration and invocation
//! - [`runner`]: Checklist execution
//! - [`verdict`]: Check outcomes
//! - [`error`]: Error types and result handling
//! - [`executor`]: External process execution

pub mod error;
pub mod executor;
pub mod registry;
pub mod runner;
pub mod verdict;
