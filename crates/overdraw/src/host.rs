//! The host editor's intrinsic renderer.
//!
//! [`DefaultRenderer`] stands in for the editor's own drawing engine: a
//! handler table keyed by element type tag. It is registered at
//! [`HOST_RENDER_PRIORITY`], below every plugin renderer, and is also handed
//! to plugin renderers so they can draw the base shape before decorating it.

use std::fmt;

use indexmap::IndexMap;
use log::debug;

use overdraw_core::{attrs, builder, scene::Node};

use crate::{
    element::{Bounds, Element, Point},
    error::RenderError,
    render::{HOST_RENDER_PRIORITY, Operation, Renderer},
};

/// Draws an element into a container and returns the drawn node.
pub type DrawFn = Box<dyn Fn(&Node, &Element) -> Result<Node, RenderError>>;

const TASK_BORDER_RADIUS: f32 = 10.0;

/// Handler-table renderer for the host's built-in element types.
pub struct DefaultRenderer {
    handlers: IndexMap<String, DrawFn>,
}

impl DefaultRenderer {
    pub const NAME: &'static str = "defaultRenderer";

    /// Creates a renderer with handlers for tasks, script tasks, start and
    /// end events, and sequence flows.
    pub fn new() -> Self {
        Self::empty()
            .with_handler("bpmn:Task", draw_task)
            .with_handler("bpmn:ScriptTask", draw_script_task)
            .with_handler("bpmn:StartEvent", |container: &Node, element: &Element| {
                draw_event(container, element, 2.0)
            })
            .with_handler("bpmn:EndEvent", |container: &Node, element: &Element| {
                draw_event(container, element, 4.0)
            })
            .with_handler("bpmn:SequenceFlow", draw_sequence_flow)
    }

    /// Creates a renderer without any handlers.
    pub fn empty() -> Self {
        Self {
            handlers: IndexMap::new(),
        }
    }

    /// Adds or replaces the handler for `type_tag` (builder style).
    pub fn with_handler(
        mut self,
        type_tag: impl Into<String>,
        handler: impl Fn(&Node, &Element) -> Result<Node, RenderError> + 'static,
    ) -> Self {
        self.handlers.insert(type_tag.into(), Box::new(handler));
        self
    }

    /// Looks up the drawing function for a type tag.
    pub fn handler(&self, type_tag: &str) -> Option<&DrawFn> {
        self.handlers.get(type_tag)
    }

    /// Draws `element` with the handler registered for `type_tag`, which
    /// need not be the element's own type.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::MissingHandler`] if no handler is registered
    /// for `type_tag`, or the handler's error.
    pub fn draw_with(
        &self,
        type_tag: &str,
        container: &Node,
        element: &Element,
    ) -> Result<Node, RenderError> {
        let operation = if element.is_connection() {
            Operation::DrawConnection
        } else {
            Operation::DrawShape
        };
        let handler = self
            .handler(type_tag)
            .ok_or_else(|| RenderError::MissingHandler {
                operation,
                type_tag: type_tag.to_string(),
            })?;

        debug!(type_tag, element_id = element.id(); "Drawing with host handler");
        handler(container, element)
    }
}

impl fmt::Debug for DefaultRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultRenderer")
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for DefaultRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for DefaultRenderer {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn priority(&self) -> Option<i32> {
        Some(HOST_RENDER_PRIORITY)
    }

    fn can_render(&self, element: &Element) -> bool {
        self.handlers.contains_key(element.type_tag())
    }

    fn draw_shape(&self, container: &Node, element: &Element) -> Result<Node, RenderError> {
        self.draw_with(element.type_tag(), container, element)
    }

    fn draw_connection(&self, container: &Node, element: &Element) -> Result<Node, RenderError> {
        self.draw_with(element.type_tag(), container, element)
    }

    fn shape_path(&self, element: &Element) -> Result<String, RenderError> {
        element
            .bounds()
            .map(rect_path)
            .ok_or_else(|| geometry_error(Operation::ShapePath, element))
    }

    fn connection_path(&self, element: &Element) -> Result<String, RenderError> {
        polyline_path(element.waypoints())
            .ok_or_else(|| geometry_error(Operation::ConnectionPath, element))
    }
}

/// Outline of a rectangle in absolute coordinates.
pub fn rect_path(bounds: Bounds) -> String {
    format!(
        "M{},{}l{},0l0,{}l{},0z",
        bounds.x(),
        bounds.y(),
        bounds.width(),
        bounds.height(),
        -bounds.width()
    )
}

/// Polyline through `waypoints`, or `None` when there are none.
pub fn polyline_path(waypoints: &[Point]) -> Option<String> {
    let (first, rest) = waypoints.split_first()?;
    let mut path = format!("M{},{}", first.x(), first.y());
    for point in rest {
        path.push_str(&format!("L{},{}", point.x(), point.y()));
    }
    Some(path)
}

fn geometry_error(operation: Operation, element: &Element) -> RenderError {
    RenderError::Geometry {
        operation,
        element_id: element.id().to_string(),
    }
}

fn shape_bounds(element: &Element) -> Result<Bounds, RenderError> {
    element
        .bounds()
        .ok_or_else(|| geometry_error(Operation::DrawShape, element))
}

fn draw_task(container: &Node, element: &Element) -> Result<Node, RenderError> {
    let bounds = shape_bounds(element)?;
    let rect = builder::create(
        &container.document(),
        "rect",
        &attrs! {
            "x" => 0,
            "y" => 0,
            "width" => bounds.width(),
            "height" => bounds.height(),
            "rx" => TASK_BORDER_RADIUS,
            "ry" => TASK_BORDER_RADIUS,
            "fill" => "white",
            "stroke" => "black",
            "stroke-width" => 2,
        },
    )?;
    container.append_child(&rect)?;
    Ok(rect)
}

fn draw_script_task(container: &Node, element: &Element) -> Result<Node, RenderError> {
    let task = draw_task(container, element)?;
    let marker = builder::create(
        &container.document(),
        "path",
        &attrs! {
            "d" => "m 15,20 l 10,0 m -10,4 l 10,0 m -10,4 l 7,0",
            "fill" => "none",
            "stroke" => "black",
            "stroke-width" => 1,
        },
    )?;
    container.append_child(&marker)?;
    Ok(task)
}

fn draw_event(container: &Node, element: &Element, stroke_width: f32) -> Result<Node, RenderError> {
    let bounds = shape_bounds(element)?;
    let radius = bounds.width() / 2.0;
    let circle = builder::create(
        &container.document(),
        "circle",
        &attrs! {
            "cx" => radius,
            "cy" => bounds.height() / 2.0,
            "r" => radius,
            "fill" => "white",
            "stroke" => "black",
            "stroke-width" => stroke_width,
        },
    )?;
    container.append_child(&circle)?;
    Ok(circle)
}

fn draw_sequence_flow(container: &Node, element: &Element) -> Result<Node, RenderError> {
    let d = polyline_path(element.waypoints())
        .ok_or_else(|| geometry_error(Operation::DrawConnection, element))?;
    let path = builder::create(
        &container.document(),
        "path",
        &attrs! {
            "d" => d,
            "fill" => "none",
            "stroke" => "black",
            "stroke-width" => 2,
        },
    )?;
    container.append_child(&path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use overdraw_core::{attr, scene::Document};

    use super::*;
    use crate::element::BusinessObject;

    fn shape(type_name: &str) -> Element {
        Element::shape(
            "Shape_1",
            BusinessObject::new(type_name),
            Bounds::new(100.0, 80.0, 100.0, 80.0),
        )
    }

    #[test]
    fn test_can_render_known_types_only() {
        let renderer = DefaultRenderer::new();

        assert!(renderer.can_render(&shape("bpmn:Task")));
        assert!(renderer.can_render(&shape("bpmn:ScriptTask")));
        assert!(!renderer.can_render(&shape("bpmn:Lane")));
        assert_eq!(renderer.priority(), Some(HOST_RENDER_PRIORITY));
    }

    #[test]
    fn test_draw_task_appends_rounded_rect() {
        let renderer = DefaultRenderer::new();
        let container = Document::new().create_element("g");

        let rect = renderer.draw_shape(&container, &shape("bpmn:Task")).unwrap();

        assert_eq!(rect.tag_name().as_deref(), Some("rect"));
        assert_eq!(rect.attribute(None, "width").as_deref(), Some("100"));
        assert_eq!(rect.attribute(None, "rx").as_deref(), Some("10"));
        assert_eq!(attr::get_attribute(&rect, "stroke-width").as_deref(), Some("2px"));
        assert!(container.children()[0].ptr_eq(&rect));
    }

    #[test]
    fn test_draw_script_task_adds_marker() {
        let renderer = DefaultRenderer::new();
        let container = Document::new().create_element("g");

        renderer
            .draw_shape(&container, &shape("bpmn:ScriptTask"))
            .unwrap();

        let names: Vec<_> = container.children().iter().filter_map(Node::tag_name).collect();
        assert_eq!(names, vec!["rect", "path"]);
    }

    #[test]
    fn test_draw_with_other_handler() {
        let renderer = DefaultRenderer::new();
        let container = Document::new().create_element("g");

        renderer
            .draw_with("bpmn:Task", &container, &shape("bpmn:ScriptTask"))
            .unwrap();

        assert_eq!(container.child_count(), 1);
    }

    #[test]
    fn test_missing_handler() {
        let renderer = DefaultRenderer::empty();
        let container = Document::new().create_element("g");

        let err = renderer
            .draw_with("bpmn:Task", &container, &shape("bpmn:Task"))
            .unwrap_err();

        assert!(matches!(
            err,
            RenderError::MissingHandler { ref type_tag, .. } if type_tag == "bpmn:Task"
        ));
        assert_eq!(container.child_count(), 0);
    }

    #[test]
    fn test_draw_event_circle() {
        let renderer = DefaultRenderer::new();
        let container = Document::new().create_element("g");
        let event = Element::shape(
            "Start_1",
            BusinessObject::new("bpmn:StartEvent"),
            Bounds::new(0.0, 0.0, 36.0, 36.0),
        );

        let circle = renderer.draw_shape(&container, &event).unwrap();
        assert_eq!(circle.attribute(None, "r").as_deref(), Some("18"));
    }

    #[test]
    fn test_sequence_flow_and_paths() {
        let renderer = DefaultRenderer::new();
        let container = Document::new().create_element("g");
        let flow = Element::connection(
            "Flow_1",
            BusinessObject::new("bpmn:SequenceFlow"),
            vec![Point::new(0.0, 0.0), Point::new(50.0, 0.0), Point::new(50.0, 25.5)],
        );

        let path = renderer.draw_connection(&container, &flow).unwrap();
        assert_eq!(path.attribute(None, "d").as_deref(), Some("M0,0L50,0L50,25.5"));
        assert_eq!(renderer.connection_path(&flow).unwrap(), "M0,0L50,0L50,25.5");

        let err = renderer.shape_path(&flow).unwrap_err();
        assert!(matches!(err, RenderError::Geometry { operation: Operation::ShapePath, .. }));
    }

    #[test]
    fn test_rect_path() {
        assert_eq!(
            rect_path(Bounds::new(100.0, 80.0, 100.0, 80.0)),
            "M100,80l100,0l0,80l-100,0z"
        );
        assert_eq!(polyline_path(&[]), None);
    }
}
