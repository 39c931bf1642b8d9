//! Shared node handles and the DOM-style tree operations on them.

use std::{
    cell::RefCell,
    fmt,
    rc::{Rc, Weak},
};

use indexmap::IndexMap;

use crate::{
    error::SceneError,
    scene::{Document, DocumentId},
    serialize,
};

/// The kind of a [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Element,
    Text,
    Comment,
    Fragment,
    Document,
}

impl NodeType {
    /// Returns a human-readable name for this node type.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Element => "element",
            Self::Text => "text",
            Self::Comment => "comment",
            Self::Fragment => "fragment",
            Self::Document => "document",
        }
    }

    fn accepts_children(&self) -> bool {
        matches!(self, Self::Element | Self::Fragment | Self::Document)
    }
}

/// A single namespaced attribute of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    namespace: Option<String>,
    name: String,
    value: String,
}

impl Attribute {
    /// Returns the attribute namespace, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Returns the local attribute name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the attribute value.
    pub fn value(&self) -> &str {
        &self.value
    }

    fn matches(&self, namespace: Option<&str>, name: &str) -> bool {
        self.namespace.as_deref() == namespace && self.name == name
    }
}

#[derive(Debug)]
struct ElementData {
    namespace: Option<String>,
    name: String,
    attributes: Vec<Attribute>,
    /// Presentation properties, keyed by hyphenated property name.
    style: IndexMap<String, String>,
}

#[derive(Debug)]
enum Content {
    Element(ElementData),
    Text(String),
    Comment(String),
    Fragment,
    Document,
}

#[derive(Debug)]
struct NodeData {
    owner: DocumentId,
    content: Content,
    children: Vec<Node>,
    parent: Weak<RefCell<NodeData>>,
}

/// A handle to a scene-graph node.
///
/// Cloning a `Node` clones the handle, not the node: both handles observe
/// the same attributes and children. Use [`crate::scene::Document::import_node`]
/// for a deep copy.
#[derive(Clone)]
pub struct Node(Rc<RefCell<NodeData>>);

impl Node {
    fn from_content(owner: DocumentId, content: Content) -> Self {
        Self(Rc::new(RefCell::new(NodeData {
            owner,
            content,
            children: Vec::new(),
            parent: Weak::new(),
        })))
    }

    pub(crate) fn new_element(owner: DocumentId, namespace: Option<&str>, name: &str) -> Self {
        Self::from_content(
            owner,
            Content::Element(ElementData {
                namespace: namespace.map(str::to_string),
                name: name.to_string(),
                attributes: Vec::new(),
                style: IndexMap::new(),
            }),
        )
    }

    pub(crate) fn new_text(owner: DocumentId, text: &str) -> Self {
        Self::from_content(owner, Content::Text(text.to_string()))
    }

    pub(crate) fn new_comment(owner: DocumentId, text: &str) -> Self {
        Self::from_content(owner, Content::Comment(text.to_string()))
    }

    pub(crate) fn new_fragment(owner: DocumentId) -> Self {
        Self::from_content(owner, Content::Fragment)
    }

    pub(crate) fn new_document(owner: DocumentId) -> Self {
        Self::from_content(owner, Content::Document)
    }

    /// Returns the kind of node.
    pub fn node_type(&self) -> NodeType {
        match self.0.borrow().content {
            Content::Element(_) => NodeType::Element,
            Content::Text(_) => NodeType::Text,
            Content::Comment(_) => NodeType::Comment,
            Content::Fragment => NodeType::Fragment,
            Content::Document => NodeType::Document,
        }
    }

    /// Local name of an element, `None` for every other node type.
    pub fn tag_name(&self) -> Option<String> {
        match &self.0.borrow().content {
            Content::Element(element) => Some(element.name.clone()),
            _ => None,
        }
    }

    /// Returns the element namespace, or `None` for non-elements.
    pub fn namespace_uri(&self) -> Option<String> {
        match &self.0.borrow().content {
            Content::Element(element) => element.namespace.clone(),
            _ => None,
        }
    }

    /// Returns the identity of the owning document.
    pub fn owner_document(&self) -> DocumentId {
        self.0.borrow().owner
    }

    /// A handle to the document that owns this node, for creating siblings
    /// that need no import on insertion.
    pub fn document(&self) -> Document {
        Document::from_id(self.owner_document())
    }

    /// Returns the parent node, if attached.
    pub fn parent(&self) -> Option<Node> {
        self.0.borrow().parent.upgrade().map(Node)
    }

    /// Returns the child nodes in document order.
    pub fn children(&self) -> Vec<Node> {
        self.0.borrow().children.clone()
    }

    /// Returns the number of child nodes.
    pub fn child_count(&self) -> usize {
        self.0.borrow().children.len()
    }

    /// Returns the first child node, if any.
    pub fn first_child(&self) -> Option<Node> {
        self.0.borrow().children.first().cloned()
    }

    /// Returns `true` if both handles refer to the same node.
    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Concatenated text of this node and all its descendants.
    pub fn text_content(&self) -> String {
        let data = self.0.borrow();
        match &data.content {
            Content::Text(text) => text.clone(),
            Content::Comment(_) => String::new(),
            _ => data
                .children
                .iter()
                .map(|child| child.text_content())
                .collect(),
        }
    }

    /// Reads an attribute by namespace and local name.
    pub fn attribute(&self, namespace: Option<&str>, name: &str) -> Option<String> {
        match &self.0.borrow().content {
            Content::Element(element) => element
                .attributes
                .iter()
                .find(|attr| attr.matches(namespace, name))
                .map(|attr| attr.value.clone()),
            _ => None,
        }
    }

    /// Sets an attribute, replacing any existing value with the same
    /// namespace and local name. Has no effect on non-element nodes.
    pub fn set_attribute(&self, namespace: Option<&str>, name: &str, value: impl Into<String>) {
        if let Content::Element(element) = &mut self.0.borrow_mut().content {
            let value = value.into();
            match element
                .attributes
                .iter_mut()
                .find(|attr| attr.matches(namespace, name))
            {
                Some(existing) => existing.value = value,
                None => element.attributes.push(Attribute {
                    namespace: namespace.map(str::to_string),
                    name: name.to_string(),
                    value,
                }),
            }
        }
    }

    /// Removes an attribute, returning its previous value.
    pub fn remove_attribute(&self, namespace: Option<&str>, name: &str) -> Option<String> {
        match &mut self.0.borrow_mut().content {
            Content::Element(element) => {
                let index = element
                    .attributes
                    .iter()
                    .position(|attr| attr.matches(namespace, name))?;
                Some(element.attributes.remove(index).value)
            }
            _ => None,
        }
    }

    /// All attributes of an element in insertion order.
    pub fn attributes(&self) -> Vec<Attribute> {
        match &self.0.borrow().content {
            Content::Element(element) => element.attributes.clone(),
            _ => Vec::new(),
        }
    }

    /// Reads a presentation property from the node's style.
    pub fn style_property(&self, name: &str) -> Option<String> {
        match &self.0.borrow().content {
            Content::Element(element) => element.style.get(name).cloned(),
            _ => None,
        }
    }

    /// Sets a presentation property on the node's style. Has no effect on
    /// non-element nodes.
    pub fn set_style_property(&self, name: &str, value: impl Into<String>) {
        if let Content::Element(element) = &mut self.0.borrow_mut().content {
            element.style.insert(name.to_string(), value.into());
        }
    }

    /// All style declarations in insertion order.
    pub fn style_declarations(&self) -> Vec<(String, String)> {
        match &self.0.borrow().content {
            Content::Element(element) => element
                .style
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Text carried by a text or comment node.
    pub(crate) fn character_data(&self) -> Option<String> {
        match &self.0.borrow().content {
            Content::Text(text) | Content::Comment(text) => Some(text.clone()),
            _ => None,
        }
    }

    /// Appends `child` as the last child of this node.
    ///
    /// A child that is already attached elsewhere is moved. Appending a
    /// fragment moves all of its children, leaving the fragment empty.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::HierarchyRequest`] when this node cannot hold
    /// children, or when the insertion would create a cycle.
    pub fn append_child(&self, child: &Node) -> Result<(), SceneError> {
        let parent_type = self.node_type();
        if !parent_type.accepts_children() {
            return Err(SceneError::HierarchyRequest(format!(
                "{} nodes cannot have children",
                parent_type.name()
            )));
        }

        if child.node_type() == NodeType::Fragment {
            let moved = child.children();
            for node in &moved {
                self.ensure_not_ancestor(node)?;
            }
            for node in &moved {
                self.attach(node);
            }
            return Ok(());
        }

        self.ensure_not_ancestor(child)?;
        self.attach(child);
        Ok(())
    }

    /// Detaches this node from its parent, if any.
    pub fn detach(&self) {
        let parent = self.0.borrow().parent.upgrade();
        if let Some(parent) = parent {
            parent
                .borrow_mut()
                .children
                .retain(|sibling| !Rc::ptr_eq(&sibling.0, &self.0));
        }
        self.0.borrow_mut().parent = Weak::new();
    }

    /// Serializes this node and its subtree to markup.
    ///
    /// Fragments and documents serialize as the concatenation of their
    /// children.
    pub fn to_markup(&self) -> String {
        serialize::to_markup(self)
    }

    fn attach(&self, child: &Node) {
        child.detach();
        child.0.borrow_mut().parent = Rc::downgrade(&self.0);
        self.0.borrow_mut().children.push(child.clone());
    }

    fn ensure_not_ancestor(&self, child: &Node) -> Result<(), SceneError> {
        let mut current = Some(self.clone());
        while let Some(node) = current {
            if node.ptr_eq(child) {
                return Err(SceneError::HierarchyRequest(
                    "a node cannot be appended to itself or its descendant".to_string(),
                ));
            }
            current = node.parent();
        }
        Ok(())
    }

    pub(crate) fn deep_clone_into(&self, owner: DocumentId) -> Node {
        let data = self.0.borrow();
        let content = match &data.content {
            Content::Element(element) => Content::Element(ElementData {
                namespace: element.namespace.clone(),
                name: element.name.clone(),
                attributes: element.attributes.clone(),
                style: element.style.clone(),
            }),
            Content::Text(text) => Content::Text(text.clone()),
            Content::Comment(text) => Content::Comment(text.clone()),
            Content::Fragment => Content::Fragment,
            Content::Document => Content::Document,
        };

        let copy = Node::from_content(owner, content);
        for child in &data.children {
            copy.attach(&child.deep_clone_into(owner));
        }
        copy
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("type", &self.node_type())
            .field("tag_name", &self.tag_name())
            .field("children", &self.child_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_handle_matches_owner() {
        let document = Document::new();
        let node = document.create_element("g");

        assert_eq!(node.document(), document);
        assert_eq!(node.document().create_element("rect").owner_document(), document.id());
    }

    #[test]
    fn test_set_attribute_replaces_existing_value() {
        let document = Document::new();
        let node = document.create_element("rect");

        node.set_attribute(None, "x", "1");
        node.set_attribute(None, "x", "2");

        assert_eq!(node.attribute(None, "x").as_deref(), Some("2"));
        assert_eq!(node.attributes().len(), 1);
    }

    #[test]
    fn test_attributes_are_keyed_by_namespace() {
        let document = Document::new();
        let node = document.create_element("image");

        node.set_attribute(None, "href", "plain");
        node.set_attribute(Some(crate::namespace::XLINK), "href", "linked");

        assert_eq!(node.attribute(None, "href").as_deref(), Some("plain"));
        assert_eq!(
            node.attribute(Some(crate::namespace::XLINK), "href").as_deref(),
            Some("linked")
        );
        assert_eq!(node.remove_attribute(None, "href").as_deref(), Some("plain"));
        assert_eq!(node.attribute(None, "href"), None);
    }

    #[test]
    fn test_text_nodes_ignore_attributes() {
        let document = Document::new();
        let text = document.create_text("hello");

        text.set_attribute(None, "x", "1");
        text.set_style_property("fill", "red");

        assert!(text.attributes().is_empty());
        assert_eq!(text.style_property("fill"), None);
    }

    #[test]
    fn test_append_child_moves_attached_node() {
        let document = Document::new();
        let first = document.create_element("g");
        let second = document.create_element("g");
        let rect = document.create_element("rect");

        first.append_child(&rect).unwrap();
        second.append_child(&rect).unwrap();

        assert_eq!(first.child_count(), 0);
        assert_eq!(second.child_count(), 1);
        assert!(rect.parent().unwrap().ptr_eq(&second));
    }

    #[test]
    fn test_append_fragment_moves_children() {
        let document = Document::new();
        let fragment = document.create_fragment();
        fragment.append_child(&document.create_element("rect")).unwrap();
        fragment.append_child(&document.create_element("circle")).unwrap();

        let group = document.create_element("g");
        group.append_child(&fragment).unwrap();

        assert_eq!(fragment.child_count(), 0);
        let names: Vec<_> = group.children().iter().filter_map(Node::tag_name).collect();
        assert_eq!(names, vec!["rect", "circle"]);
    }

    #[test]
    fn test_append_rejects_cycles() {
        let document = Document::new();
        let outer = document.create_element("g");
        let inner = document.create_element("g");
        outer.append_child(&inner).unwrap();

        assert!(matches!(
            inner.append_child(&outer),
            Err(SceneError::HierarchyRequest(_))
        ));
        assert!(matches!(
            outer.append_child(&outer),
            Err(SceneError::HierarchyRequest(_))
        ));
        assert_eq!(outer.child_count(), 1);
    }

    #[test]
    fn test_append_into_text_is_rejected() {
        let document = Document::new();
        let text = document.create_text("label");
        let rect = document.create_element("rect");

        assert!(matches!(
            text.append_child(&rect),
            Err(SceneError::HierarchyRequest(_))
        ));
    }

    #[test]
    fn test_text_content_concatenates_descendants() {
        let document = Document::new();
        let text = document.create_element("text");
        let tspan = document.create_element("tspan");
        tspan.append_child(&document.create_text("py")).unwrap();
        text.append_child(&tspan).unwrap();
        text.append_child(&document.create_comment("ignored")).unwrap();
        text.append_child(&document.create_text("thon")).unwrap();

        assert_eq!(text.text_content(), "python");
    }
}
