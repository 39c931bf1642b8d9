//! Attribute access with presentation-property routing.
//!
//! A closed allow-list of presentation properties (`fill`, `stroke`,
//! `font-*`, `opacity`, ...) is written to a node's style rather than to a
//! plain attribute. Names given in camel case (`strokeWidth`) are hyphenated
//! first. Length-valued properties receive a `px` unit when set from a bare
//! number.
//!
//! # Example
//!
//! ```
//! # use overdraw_core::{attr, scene::Document};
//! let document = Document::new();
//! let path = document.create_element("path");
//!
//! attr::set_attribute(&path, "strokeWidth", 2);
//! attr::set_attribute(&path, "d", "M0,0L10,10");
//!
//! assert_eq!(attr::get_attribute(&path, "stroke-width").as_deref(), Some("2px"));
//! assert_eq!(path.attribute(None, "d").as_deref(), Some("M0,0L10,10"));
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::{
    builder::{AttrValue, Attrs},
    scene::Node,
};

/// How a presentation property is written to the style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// Written verbatim.
    Plain,
    /// Bare numbers receive a `px` unit.
    Length,
}

static CAMEL_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("([a-z])([A-Z])").expect("camel boundary pattern is valid"));

/// Looks up a hyphenated name in the presentation-property allow-list.
pub fn presentation_property(name: &str) -> Option<PropertyKind> {
    let kind = match name {
        "font-size" | "stroke-width" => PropertyKind::Length,
        "alignment-baseline"
        | "baseline-shift"
        | "clip"
        | "clip-path"
        | "clip-rule"
        | "color"
        | "color-interpolation"
        | "color-interpolation-filters"
        | "color-profile"
        | "color-rendering"
        | "cursor"
        | "direction"
        | "display"
        | "dominant-baseline"
        | "enable-background"
        | "fill"
        | "fill-opacity"
        | "fill-rule"
        | "filter"
        | "flood-color"
        | "flood-opacity"
        | "font"
        | "font-family"
        | "font-size-adjust"
        | "font-stretch"
        | "font-style"
        | "font-variant"
        | "font-weight"
        | "glyph-orientation-horizontal"
        | "glyph-orientation-vertical"
        | "image-rendering"
        | "kerning"
        | "letter-spacing"
        | "lighting-color"
        | "marker"
        | "marker-end"
        | "marker-mid"
        | "marker-start"
        | "mask"
        | "opacity"
        | "overflow"
        | "pointer-events"
        | "shape-rendering"
        | "stop-color"
        | "stop-opacity"
        | "stroke"
        | "stroke-dasharray"
        | "stroke-dashoffset"
        | "stroke-linecap"
        | "stroke-linejoin"
        | "stroke-miterlimit"
        | "stroke-opacity"
        | "text-anchor"
        | "text-decoration"
        | "text-rendering"
        | "unicode-bidi"
        | "visibility"
        | "word-spacing"
        | "writing-mode" => PropertyKind::Plain,
        _ => return None,
    };
    Some(kind)
}

/// Converts `strokeWidth` into `stroke-width`; already hyphenated names are
/// only lowercased.
pub fn hyphenate(name: &str) -> String {
    CAMEL_BOUNDARY
        .replace_all(name, "$1-$2")
        .to_lowercase()
}

/// Reads an attribute, consulting the style for presentation properties.
///
/// The name is matched as given; camel-case names are not hyphenated on read.
pub fn get_attribute(node: &Node, name: &str) -> Option<String> {
    if presentation_property(name).is_some() {
        node.style_property(name)
    } else {
        node.attribute(None, name)
    }
}

/// Writes an attribute, routing presentation properties to the style.
pub fn set_attribute(node: &Node, name: &str, value: impl Into<AttrValue>) {
    let value = value.into();
    let hyphenated = hyphenate(name);

    match presentation_property(&hyphenated) {
        Some(PropertyKind::Length) if value.is_number() => {
            node.set_style_property(&hyphenated, format!("{value}px"));
        }
        Some(_) => node.set_style_property(&hyphenated, value.to_string()),
        None => node.set_attribute(None, name, value.to_string()),
    }
}

/// Writes every entry of `attrs` in order.
pub fn set_attributes(node: &Node, attrs: &Attrs) {
    for (name, value) in attrs {
        set_attribute(node, name, value.clone());
    }
}
