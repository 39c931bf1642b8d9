//! Cross-document safe insertion.
//!
//! Nodes produced by [`crate::markup::parse`] belong to their own document.
//! Before insertion they are imported into the container's document. When
//! the import fails the original node is appended as-is; this fallback is
//! best effort and only logged.

use log::warn;

use crate::{
    error::SceneError,
    scene::{Document, Node},
};

/// Appends `node` to `container` and returns the container.
///
/// # Errors
///
/// Returns [`SceneError::HierarchyRequest`] if the container cannot hold the
/// node. Import failures are not errors.
pub fn append(container: &Node, node: &Node) -> Result<Node, SceneError> {
    append_to(node, container)?;
    Ok(container.clone())
}

/// Appends `node` to `target` and returns the node that was actually
/// inserted, which is an imported copy when the documents differ.
///
/// # Errors
///
/// Returns [`SceneError::HierarchyRequest`] if `target` cannot hold the node.
pub fn append_to(node: &Node, target: &Node) -> Result<Node, SceneError> {
    let inserted = ensure_imported(node, target);
    target.append_child(&inserted)?;
    Ok(inserted)
}

fn ensure_imported(node: &Node, target: &Node) -> Node {
    if node.owner_document() == target.owner_document() {
        return node.clone();
    }

    let document = Document::from_id(target.owner_document());
    match document.import_node(node) {
        Ok(imported) => imported,
        Err(err) => {
            warn!(err:%; "Import into target document failed, appending original node");
            node.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{markup, scene::NodeType};

    #[test]
    fn test_append_same_document_inserts_node_itself() {
        let document = Document::new();
        let group = document.create_element("g");
        let rect = document.create_element("rect");

        let returned = append(&group, &rect).unwrap();

        assert!(returned.ptr_eq(&group));
        assert!(group.children()[0].ptr_eq(&rect));
    }

    #[test]
    fn test_append_imports_foreign_node() {
        let document = Document::new();
        let group = document.create_element("g");
        let foreign = Document::new().create_element("image");

        let inserted = append_to(&foreign, &group).unwrap();

        assert!(!inserted.ptr_eq(&foreign));
        assert_eq!(inserted.owner_document(), document.id());
        assert!(group.children()[0].ptr_eq(&inserted));
        assert!(foreign.parent().is_none());
    }

    #[test]
    fn test_append_parsed_fragment() {
        let document = Document::new();
        let group = document.create_element("g");
        let fragment = markup::parse(r#"<rect/><circle/>"#).unwrap();

        append(&group, &fragment).unwrap();

        assert_eq!(group.child_count(), 2);
        assert!(
            group
                .children()
                .iter()
                .all(|child| child.owner_document() == document.id())
        );
    }

    #[test]
    fn test_append_falls_back_when_import_fails() {
        let document = Document::new();
        let group = document.create_element("g");
        let parsed = markup::parse(r#"<svg><rect/></svg>"#).unwrap();
        assert_eq!(parsed.node_type(), NodeType::Document);

        let inserted = append_to(&parsed, &group).unwrap();

        assert!(inserted.ptr_eq(&parsed));
        assert_eq!(group.child_count(), 1);
        assert_ne!(inserted.owner_document(), document.id());
    }

    #[test]
    fn test_append_into_text_node_fails() {
        let document = Document::new();
        let text = document.create_text("label");
        let rect = document.create_element("rect");

        assert!(matches!(
            append(&text, &rect),
            Err(SceneError::HierarchyRequest(_))
        ));
    }
}
