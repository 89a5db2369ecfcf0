//! Reference host editor model.
//!
//! This module provides the in-process editor that the terminal application
//! drives and that the bookmark core talks to through the
//! [`host`](crate::host) traits.

pub mod buffer;
pub mod workspace;
