//! Priority-ordered, capability-gated render dispatch.
//!
//! A [`Renderer`] declares which operations it implements and, through its
//! capability predicate, which elements it wants to handle. Renderers are
//! registered into a [`RenderBusBuilder`] and frozen into a [`RenderBus`];
//! for every [`RenderEvent`] the bus visits renderers in descending
//! priority order and the first one whose predicate accepts the element
//! produces the result. Lower-priority renderers, including the host's
//! default renderer, are not consulted for that event.
//!
//! # Overview
//!
//! - [`Renderer`]: The overridable operations of a dispatcher.
//! - [`Operation`], [`EventGroup`], [`Capabilities`]: What an event asks for.
//! - [`RenderEvent`], [`Resolution`]: A single request and its answer.
//! - [`PriorityChain`]: Stable descending-priority ordering.
//! - [`RenderBusBuilder`], [`RenderBus`]: Registration and dispatch.

mod bus;
mod chain;

pub use bus::{RenderBus, RenderBusBuilder, Subscriber};
pub use chain::PriorityChain;

use std::fmt;

use bitflags::bitflags;

use overdraw_core::scene::Node;

use crate::{element::Element, error::RenderError};

/// Priority of renderers that do not declare one.
pub const DEFAULT_RENDER_PRIORITY: i32 = 1000;

/// Priority of the host's intrinsic renderer, below every plugin renderer.
pub const HOST_RENDER_PRIORITY: i32 = 1;

/// Priority of the bundled script-task renderer.
pub const SCRIPT_TASK_RENDER_PRIORITY: i32 = 1500;

/// An operation a render event requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    DrawShape,
    DrawConnection,
    ShapePath,
    ConnectionPath,
}

impl Operation {
    /// The subscription group that receives this operation.
    pub fn group(self) -> EventGroup {
        match self {
            Self::DrawShape | Self::DrawConnection => EventGroup::Render,
            Self::ShapePath | Self::ConnectionPath => EventGroup::PathQuery,
        }
    }

    /// The capability a renderer must declare to be consulted.
    pub fn capability(self) -> Capabilities {
        match self {
            Self::DrawShape => Capabilities::DRAW_SHAPE,
            Self::DrawConnection => Capabilities::DRAW_CONNECTION,
            Self::ShapePath => Capabilities::SHAPE_PATH,
            Self::ConnectionPath => Capabilities::CONNECTION_PATH,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::DrawShape => "shape drawing",
            Self::DrawConnection => "connection drawing",
            Self::ShapePath => "shape path query",
            Self::ConnectionPath => "connection path query",
        })
    }
}

/// Subscription groups. Each renderer subscribes to both at one priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventGroup {
    /// Shape and connection drawing.
    Render,
    /// Shape and connection outline queries.
    PathQuery,
}

bitflags! {
    /// Operations a renderer implements.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        const DRAW_SHAPE = 1;
        const DRAW_CONNECTION = 1 << 1;
        const SHAPE_PATH = 1 << 2;
        const CONNECTION_PATH = 1 << 3;
    }
}

/// A request raised by the host for one element.
#[derive(Debug, Clone, Copy)]
pub enum RenderEvent<'a> {
    DrawShape {
        container: &'a Node,
        element: &'a Element,
    },
    DrawConnection {
        container: &'a Node,
        element: &'a Element,
    },
    ShapePath {
        element: &'a Element,
    },
    ConnectionPath {
        element: &'a Element,
    },
}

impl<'a> RenderEvent<'a> {
    pub fn operation(&self) -> Operation {
        match self {
            Self::DrawShape { .. } => Operation::DrawShape,
            Self::DrawConnection { .. } => Operation::DrawConnection,
            Self::ShapePath { .. } => Operation::ShapePath,
            Self::ConnectionPath { .. } => Operation::ConnectionPath,
        }
    }

    pub fn element(&self) -> &'a Element {
        match *self {
            Self::DrawShape { element, .. }
            | Self::DrawConnection { element, .. }
            | Self::ShapePath { element }
            | Self::ConnectionPath { element } => element,
        }
    }
}

/// The resolved value of a render event.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// The node a drawing operation returned.
    Visual(Node),
    /// An SVG path outlining the element.
    Path(String),
}

/// A dispatcher that can claim and render diagram elements.
///
/// Implementors override [`Renderer::can_render`] and the operations they
/// declare in [`Renderer::capabilities`]. The default operation bodies fail
/// with [`RenderError::ContractViolation`]: claiming an element without
/// providing the behavior is a configuration error, not an empty render.
///
/// [`Renderer::can_render`] only sees the element, so a declined event can
/// never touch the container.
pub trait Renderer {
    /// Name used in logs and errors.
    fn name(&self) -> &str;

    /// Priority to register at. `None` uses the configured default.
    fn priority(&self) -> Option<i32> {
        None
    }

    /// Operations this renderer implements. Renderers are skipped for
    /// operations they do not declare.
    fn capabilities(&self) -> Capabilities {
        Capabilities::all()
    }

    /// Capability predicate: should this renderer handle `element`?
    fn can_render(&self, element: &Element) -> bool;

    /// Draws a shape into `container` and returns the node that represents it.
    fn draw_shape(&self, container: &Node, element: &Element) -> Result<Node, RenderError> {
        let _ = container;
        Err(contract_violation(self.name(), Operation::DrawShape, element))
    }

    /// Draws a connection into `container` and returns the node that represents it.
    fn draw_connection(&self, container: &Node, element: &Element) -> Result<Node, RenderError> {
        let _ = container;
        Err(contract_violation(self.name(), Operation::DrawConnection, element))
    }

    /// Returns an SVG path outlining a shape's visual bounds.
    fn shape_path(&self, element: &Element) -> Result<String, RenderError> {
        Err(contract_violation(self.name(), Operation::ShapePath, element))
    }

    /// Returns an SVG path outlining a connection.
    fn connection_path(&self, element: &Element) -> Result<String, RenderError> {
        Err(contract_violation(self.name(), Operation::ConnectionPath, element))
    }
}

fn contract_violation(renderer: &str, operation: Operation, element: &Element) -> RenderError {
    RenderError::ContractViolation {
        renderer: renderer.to_string(),
        operation,
        element_id: element.id().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Bounds, BusinessObject};

    struct Claiming;

    impl Renderer for Claiming {
        fn name(&self) -> &str {
            "claiming"
        }

        fn can_render(&self, _element: &Element) -> bool {
            true
        }
    }

    fn task() -> Element {
        Element::shape(
            "Task_1",
            BusinessObject::new("bpmn:Task"),
            Bounds::new(0.0, 0.0, 100.0, 80.0),
        )
    }

    #[test]
    fn test_operation_groups() {
        assert_eq!(Operation::DrawShape.group(), EventGroup::Render);
        assert_eq!(Operation::DrawConnection.group(), EventGroup::Render);
        assert_eq!(Operation::ShapePath.group(), EventGroup::PathQuery);
        assert_eq!(Operation::ConnectionPath.group(), EventGroup::PathQuery);
    }

    #[test]
    fn test_default_capabilities_cover_every_operation() {
        let capabilities = Claiming.capabilities();
        for operation in [
            Operation::DrawShape,
            Operation::DrawConnection,
            Operation::ShapePath,
            Operation::ConnectionPath,
        ] {
            assert!(capabilities.contains(operation.capability()));
        }
    }

    #[test]
    fn test_unoverridden_operations_fail_loudly() {
        let element = task();
        let container = overdraw_core::scene::Document::new().create_element("g");

        let err = Claiming.draw_shape(&container, &element).unwrap_err();
        assert!(matches!(
            err,
            RenderError::ContractViolation {
                operation: Operation::DrawShape,
                ..
            }
        ));
        assert_eq!(container.child_count(), 0);

        let err = Claiming.connection_path(&element).unwrap_err();
        assert!(matches!(
            err,
            RenderError::ContractViolation {
                operation: Operation::ConnectionPath,
                ..
            }
        ));
    }

    #[test]
    fn test_render_event_accessors() {
        let element = task();
        let container = overdraw_core::scene::Document::new().create_element("g");

        let event = RenderEvent::DrawShape {
            container: &container,
            element: &element,
        };
        assert_eq!(event.operation(), Operation::DrawShape);
        assert_eq!(event.element().id(), "Task_1");

        let event = RenderEvent::ConnectionPath { element: &element };
        assert_eq!(event.operation().group(), EventGroup::PathQuery);
    }
}
