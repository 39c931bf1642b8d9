//! Markup parsing into scene nodes.
//!
//! Input that starts with `<svg` is parsed as a full document, gaining the
//! SVG namespace declaration if it lacks one. Anything else is treated as a
//! fragment: it is wrapped in a namespaced `<svg>` root, parsed, and the
//! root's children are moved into a [`NodeType::Fragment`] node.
//!
//! A `style` attribute is split into style declarations so that
//! presentation properties read back through [`crate::attr::get_attribute`].
//! Whitespace-only text between elements is dropped.

use log::trace;

use crate::{
    error::{ParseError, SceneError},
    namespace,
    scene::{Document, Node, NodeType},
};

/// Parses markup into a document node (for `<svg` input) or a fragment.
///
/// Every returned node is owned by a fresh [`Document`]; use
/// [`Document::import_node`] or [`crate::append::append`] to move it into
/// another document.
///
/// # Errors
///
/// Returns [`SceneError::Parse`] when the markup is not well-formed XML.
pub fn parse(markup: &str) -> Result<Node, SceneError> {
    let (source, unwrap) = if let Some(rest) = markup.strip_prefix("<svg") {
        if markup.contains(namespace::SVG) {
            (markup.to_string(), false)
        } else {
            (format!(r#"<svg xmlns="{}"{rest}"#, namespace::SVG), false)
        }
    } else {
        (
            format!(r#"<svg xmlns="{}">{markup}</svg>"#, namespace::SVG),
            true,
        )
    };

    let parsed = parse_document(&source)?;
    if !unwrap {
        return Ok(parsed);
    }

    let document = Document::from_id(parsed.owner_document());
    let fragment = document.create_fragment();
    if let Some(root) = parsed.first_child() {
        for child in root.children() {
            fragment.append_child(&child)?;
        }
    }

    trace!(children = fragment.child_count(); "Parsed markup fragment");

    Ok(fragment)
}

/// Parses a complete XML document into a [`NodeType::Document`] node.
///
/// # Errors
///
/// Returns [`SceneError::Parse`] when `source` is not well-formed XML.
pub fn parse_document(source: &str) -> Result<Node, SceneError> {
    let xml = roxmltree::Document::parse(source).map_err(ParseError::from)?;

    let document = Document::new();
    let root = document.create_document_node();
    for child in xml.root().children() {
        if let Some(node) = convert(&document, child) {
            root.append_child(&node)?;
        }
    }

    Ok(root)
}

fn convert(document: &Document, xml: roxmltree::Node<'_, '_>) -> Option<Node> {
    if xml.is_text() {
        return xml
            .text()
            .filter(|text| !text.trim().is_empty())
            .map(|text| document.create_text(text));
    }

    if xml.is_comment() {
        return xml.text().map(|text| document.create_comment(text));
    }

    if !xml.is_element() {
        return None;
    }

    let tag = xml.tag_name();
    let node = document.create_element_ns(tag.namespace(), tag.name());

    for attribute in xml.attributes() {
        if attribute.namespace().is_none() && attribute.name() == "style" {
            for (name, value) in style_declarations(attribute.value()) {
                node.set_style_property(name, value);
            }
        } else {
            node.set_attribute(attribute.namespace(), attribute.name(), attribute.value());
        }
    }

    for child in xml.children() {
        if let Some(converted) = convert(document, child) {
            // Freshly created element nodes always accept children.
            if node.append_child(&converted).is_err() {
                return None;
            }
        }
    }

    Some(node)
}

fn style_declarations(style: &str) -> impl Iterator<Item = (&str, &str)> {
    style.split(';').filter_map(|declaration| {
        let (name, value) = declaration.split_once(':')?;
        let name = name.trim();
        (!name.is_empty()).then(|| (name, value.trim()))
    })
}

/// Returns `true` if `node` is the result of parsing a full document.
pub fn is_document(node: &Node) -> bool {
    node.node_type() == NodeType::Document
}
