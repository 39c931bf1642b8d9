//! Overdraw Core Scene Graph
//!
//! This crate provides the low-level scene-graph construction utilities that
//! every Overdraw renderer uses to produce output. It includes:
//!
//! - **Scene**: Namespaced graphical nodes and their owning documents ([`scene`] module)
//! - **Attributes**: Presentation-aware attribute access ([`attr`] module)
//! - **Markup**: Parsing of markup fragments into nodes ([`markup`] module)
//! - **Builder**: Node creation from a tag name or inline markup ([`builder`] module)
//! - **Append**: Cross-document safe insertion ([`append`] module)
//!
//! # Example
//!
//! ```
//! use overdraw_core::{attrs, builder, scene::Document};
//!
//! let document = Document::new();
//! let group = document.create_element("g");
//! let rect = builder::create(&document, "rect", &attrs! { "x" => 5, "stroke-width" => 2 })
//!     .expect("valid tag name");
//!
//! overdraw_core::append::append(&group, &rect).expect("group accepts children");
//!
//! assert_eq!(group.child_count(), 1);
//! assert!(group.to_markup().contains("stroke-width: 2px"));
//! ```

pub mod append;
pub mod attr;
pub mod builder;
pub mod error;
pub mod markup;
pub mod namespace;
pub mod scene;

mod serialize;

pub use error::{ParseError, SceneError};
