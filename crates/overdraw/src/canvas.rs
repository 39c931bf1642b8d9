//! A minimal host canvas that paints elements through a [`RenderBus`].

use log::debug;

use overdraw_core::{append, attrs, builder, scene::Document, scene::Node};

use crate::{
    element::{Element, Geometry},
    error::{OverdrawError, RenderError},
    render::RenderBus,
};

/// An SVG root with a single drawing layer.
///
/// Every element gets its own visual group. Shapes are drawn in local
/// coordinates, so their group is translated to the shape's position;
/// connections are drawn in absolute coordinates.
#[derive(Debug)]
pub struct Canvas {
    document: Document,
    root: Node,
    layer: Node,
    bus: RenderBus,
}

impl Canvas {
    /// Creates a canvas with an empty base layer, painting through `bus`.
    pub fn new(bus: RenderBus) -> Result<Self, OverdrawError> {
        let document = Document::new();
        let root = builder::create(&document, "svg", &attrs! {})?;
        let layer = builder::create(&document, "g", &attrs! { "class" => "layer-base" })?;
        append::append(&root, &layer)?;

        Ok(Self {
            document,
            root,
            layer,
            bus,
        })
    }

    /// Returns the document that owns every canvas node.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Returns the `<svg>` root node.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Returns the render bus the canvas paints through.
    pub fn bus(&self) -> &RenderBus {
        &self.bus
    }

    /// Draws `element` into a new visual group and adds the group to the
    /// layer.
    ///
    /// The group is attached only after drawing succeeds, so a failed draw
    /// leaves the canvas unchanged.
    ///
    /// # Errors
    ///
    /// Returns the dispatch error, or a scene error while building the group.
    pub fn add(&self, element: &Element) -> Result<Node, OverdrawError> {
        let visual = self.create_visual(element)?;

        match element.geometry() {
            Geometry::Shape(_) => self.bus.draw_shape(&visual, element)?,
            Geometry::Connection(_) => self.bus.draw_connection(&visual, element)?,
        };

        append::append(&self.layer, &visual)?;
        debug!(element_id = element.id(), type_tag = element.type_tag(); "Added element to canvas");
        Ok(visual)
    }

    /// Outline of `element`, answered by the path-query group.
    pub fn path(&self, element: &Element) -> Result<String, RenderError> {
        match element.geometry() {
            Geometry::Shape(_) => self.bus.shape_path(element),
            Geometry::Connection(_) => self.bus.connection_path(element),
        }
    }

    /// Serializes the whole canvas.
    pub fn to_svg(&self) -> String {
        self.root.to_markup()
    }

    fn create_visual(&self, element: &Element) -> Result<Node, OverdrawError> {
        let mut attrs = attrs! {
            "class" => "djs-visual",
            "data-element-id" => element.id(),
        };
        if let Some(bounds) = element.bounds() {
            attrs.insert(
                "transform".to_string(),
                format!("translate({}, {})", bounds.x(), bounds.y()).into(),
            );
        }

        Ok(builder::create(&self.document, "g", &attrs)?)
    }
}
