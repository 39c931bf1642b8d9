//! Namespaced scene-graph nodes and their owning documents.
//!
//! The scene graph is a small DOM-like tree. Every [`Node`] is a shared,
//! single-threaded handle and records the [`Document`] that owns it, so
//! insertion across documents can be detected (see [`crate::append`]).
//!
//! # Example
//!
//! ```
//! # use overdraw_core::scene::{Document, NodeType};
//! let document = Document::new();
//! let group = document.create_element("g");
//! let label = document.create_text("Script");
//!
//! group.append_child(&label).unwrap();
//!
//! assert_eq!(group.node_type(), NodeType::Element);
//! assert_eq!(group.text_content(), "Script");
//! assert_eq!(label.parent().map(|p| p.ptr_eq(&group)), Some(true));
//! ```

mod document;
mod node;

pub use document::{Document, DocumentId};
pub use node::{Attribute, Node, NodeType};
