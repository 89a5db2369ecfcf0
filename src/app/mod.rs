//! Terminal application state.
//!
//! # Modules
//!
//! - `mode`: input modes (Normal, Panel, Prompt)
//! - `state`: `AppState`, the bookmark session plus everything the UI shows

pub mod mode;
pub mod state;
