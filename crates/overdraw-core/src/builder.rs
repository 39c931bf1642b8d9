//! Node creation from a tag name or inline markup.
//!
//! [`create`] is the single entry point renderers use to produce scene
//! nodes. Input starting with `<` is parsed as markup; anything else is
//! taken as a tag name in the SVG namespace. Tag names are not validated
//! against a vocabulary.
//!
//! # Example
//!
//! ```
//! # use overdraw_core::{attrs, builder, scene::Document};
//! let document = Document::new();
//!
//! let image = builder::create(&document, "image", &attrs! { "x" => 5, "width" => 20 }).unwrap();
//! assert_eq!(image.tag_name().as_deref(), Some("image"));
//!
//! let circle = builder::create(&document, r#"<circle r="4"/>"#, &attrs! { "fill" => "black" }).unwrap();
//! assert_eq!(circle.attribute(None, "r").as_deref(), Some("4"));
//! assert_eq!(circle.owner_document(), document.id());
//! ```

use std::fmt;

use indexmap::IndexMap;

use crate::{
    attr,
    error::{ParseError, SceneError},
    markup,
    scene::{Document, Node},
};

/// An attribute value: either text or a bare number.
///
/// Numbers are formatted in their shortest form, so `5.0` becomes `5`.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Text(String),
    Number(f64),
}

impl AttrValue {
    /// Returns `true` for numeric values.
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(number) => write!(f, "{number}"),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for AttrValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

macro_rules! impl_number_attr_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for AttrValue {
                fn from(value: $ty) -> Self {
                    Self::Number(value as f64)
                }
            }
        )*
    };
}

impl_number_attr_value!(i32, i64, u32, u64, usize, f32, f64);

/// Ordered attribute map applied by [`create`] and [`attr::set_attributes`].
pub type Attrs = IndexMap<String, AttrValue>;

/// Builds an [`Attrs`] map from `name => value` pairs, preserving order.
///
/// # Example
///
/// ```
/// # use overdraw_core::attrs;
/// let attrs = attrs! { "x" => 5, "href" => "icon.svg" };
/// assert_eq!(attrs.len(), 2);
/// ```
#[macro_export]
macro_rules! attrs {
    () => {
        $crate::builder::Attrs::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut attrs = $crate::builder::Attrs::new();
        $(
            attrs.insert(
                ::std::string::String::from($name),
                $crate::builder::AttrValue::from($value),
            );
        )+
        attrs
    }};
}

/// Creates a detached node owned by `document` and applies `attrs`.
///
/// When `name` starts with `<` it is parsed as markup and the first parsed
/// node is imported into `document`; otherwise an empty SVG element named
/// `name` is created. The caller is responsible for appending the result.
///
/// # Errors
///
/// Returns [`SceneError::Parse`] for malformed markup, including markup
/// that yields no node at all.
pub fn create(document: &Document, name: &str, attrs: &Attrs) -> Result<Node, SceneError> {
    let node = if name.starts_with('<') {
        let parsed = markup::parse(name)?;
        let first = parsed
            .first_child()
            .ok_or_else(|| ParseError::new("markup contains no nodes", 1, 1))?;
        document.import_node(&first)?
    } else {
        document.create_element(name)
    };

    attr::set_attributes(&node, attrs);

    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{attrs, namespace, scene::NodeType};

    #[test]
    fn test_number_formatting() {
        assert_eq!(AttrValue::from(5).to_string(), "5");
        assert_eq!(AttrValue::from(2.5).to_string(), "2.5");
        assert_eq!(AttrValue::from(20.0_f32).to_string(), "20");
        assert_eq!(AttrValue::from("5").to_string(), "5");
        assert!(AttrValue::from(1u32).is_number());
        assert!(!AttrValue::from("1").is_number());
    }

    #[test]
    fn test_create_by_name() {
        let document = Document::new();
        let node = create(&document, "rect", &attrs! {}).unwrap();

        assert_eq!(node.node_type(), NodeType::Element);
        assert_eq!(node.namespace_uri().as_deref(), Some(namespace::SVG));
        assert_eq!(node.child_count(), 0);
        assert!(node.parent().is_none());
    }

    #[test]
    fn test_create_unknown_tag_succeeds() {
        let document = Document::new();
        let node = create(&document, "not-a-real-svg-tag", &attrs! { "x" => 1 }).unwrap();

        assert_eq!(node.tag_name().as_deref(), Some("not-a-real-svg-tag"));
    }

    #[test]
    fn test_create_from_markup_imports_into_document() {
        let document = Document::new();
        let node = create(
            &document,
            r#"<g class="overlay"><rect width="10" height="10"/></g>"#,
            &attrs! { "opacity" => 0.5 },
        )
        .unwrap();

        assert_eq!(node.tag_name().as_deref(), Some("g"));
        assert_eq!(node.owner_document(), document.id());
        assert_eq!(node.children()[0].owner_document(), document.id());
        assert_eq!(node.attribute(None, "class").as_deref(), Some("overlay"));
        assert_eq!(node.style_property("opacity").as_deref(), Some("0.5"));
    }

    #[test]
    fn test_create_from_malformed_markup_fails() {
        let document = Document::new();
        let result = create(&document, "<g><rect></g>", &attrs! {});

        assert!(matches!(result, Err(SceneError::Parse(_))));
    }

    #[test]
    fn test_create_applies_presentation_and_plain_attributes() {
        let document = Document::new();
        let node = create(
            &document,
            "path",
            &attrs! { "d" => "M0,0", "strokeWidth" => 2, "stroke" => "black" },
        )
        .unwrap();

        assert_eq!(node.attribute(None, "d").as_deref(), Some("M0,0"));
        assert_eq!(node.style_property("stroke-width").as_deref(), Some("2px"));
        assert_eq!(node.style_property("stroke").as_deref(), Some("black"));
    }
}
