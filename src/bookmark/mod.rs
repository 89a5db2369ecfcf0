//! Bookmark core: the record model, the registry that owns every record, and
//! the synchronizer that keeps records aligned with the live buffer.
//!
//! # Modules
//!
//! - `record`: `BookmarkRecord`, `DocumentId`, `AnchorHandle`
//! - `registry`: `BookmarkRegistry` with toggle, removal, labeling and navigation
//! - `sync`: buffer-change and document-activation passes
//!
//! # Example
//!
//! ```
//! use markquill::bookmark::record::DocumentId;
//! use markquill::bookmark::registry::{BookmarkRegistry, ToggleOutcome};
//!
//! let doc = DocumentId::new("A", "A");
//! let mut registry = BookmarkRegistry::new();
//!
//! assert!(matches!(registry.toggle(&doc, 7, "fn main() {"), ToggleOutcome::Added));
//! assert!(matches!(registry.toggle(&doc, 3, "use std::io;"), ToggleOutcome::Added));
//! assert_eq!(registry.next("A", 3), Some(7));
//! assert_eq!(registry.next("A", 7), Some(3));
//! ```

pub mod record;
pub mod registry;
pub mod sync;

pub use record::{AnchorHandle, BookmarkRecord, DocumentId, DEFAULT_LABEL};
pub use registry::{BookmarkRegistry, ToggleOutcome};
