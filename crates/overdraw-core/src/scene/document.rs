//! Documents own nodes and create new ones.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::{
    error::SceneError,
    namespace,
    scene::{Node, NodeType},
};

static NEXT_DOCUMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(u64);

impl DocumentId {
    fn next() -> Self {
        Self(NEXT_DOCUMENT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A node factory with a distinct identity.
///
/// Documents are cheap handles: cloning one yields a handle to the same
/// document, and nodes created through either handle share an owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    id: DocumentId,
}

impl Document {
    /// Creates a new, empty document with a fresh identity.
    pub fn new() -> Self {
        Self {
            id: DocumentId::next(),
        }
    }

    pub(crate) fn from_id(id: DocumentId) -> Self {
        Self { id }
    }

    /// Returns the document identity.
    pub fn id(&self) -> DocumentId {
        self.id
    }

    /// Creates an empty element in the SVG namespace.
    pub fn create_element(&self, name: &str) -> Node {
        self.create_element_ns(Some(namespace::SVG), name)
    }

    /// Creates an empty element in the given namespace.
    pub fn create_element_ns(&self, namespace: Option<&str>, name: &str) -> Node {
        Node::new_element(self.id, namespace, name)
    }

    /// Creates a text node.
    pub fn create_text(&self, text: &str) -> Node {
        Node::new_text(self.id, text)
    }

    /// Creates a comment node.
    pub fn create_comment(&self, text: &str) -> Node {
        Node::new_comment(self.id, text)
    }

    /// Creates an empty fragment. Appending a fragment moves its children.
    pub fn create_fragment(&self) -> Node {
        Node::new_fragment(self.id)
    }

    pub(crate) fn create_document_node(&self) -> Node {
        Node::new_document(self.id)
    }

    /// Deep-clones `node` so that the copy and all its descendants are owned
    /// by this document. The source node is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::NotSupported`] when `node` is a document node;
    /// documents cannot be imported into one another.
    pub fn import_node(&self, node: &Node) -> Result<Node, SceneError> {
        if node.node_type() == NodeType::Document {
            return Err(SceneError::NotSupported(
                "document nodes cannot be imported".to_string(),
            ));
        }

        Ok(node.deep_clone_into(self.id))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
