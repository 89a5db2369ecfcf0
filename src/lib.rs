//! MarkQuill keeps labeled line bookmarks that follow the text they point at.
//!
//! The core ([`bookmark`], [`session`], [`storage`], [`panel`]) talks to its
//! host editor only through the traits in [`host`]. The remaining modules are
//! a terminal host built on ratatui that drives the core.

pub mod app;
pub mod bookmark;
pub mod config;
pub mod document;
pub mod host;
pub mod input;
pub mod panel;
pub mod session;
pub mod storage;
pub mod theme;
pub mod ui;
