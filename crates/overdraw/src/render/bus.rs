//! Registration and dispatch of render events.

use std::{fmt, rc::Rc};

use log::{debug, trace};

use overdraw_core::scene::Node;

use crate::{
    element::Element,
    error::RenderError,
    render::{
        DEFAULT_RENDER_PRIORITY, EventGroup, Operation, PriorityChain, RenderEvent, Renderer,
        Resolution,
    },
};

/// A renderer's place in a subscription group, for introspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscriber {
    name: String,
    priority: i32,
}

impl Subscriber {
    /// Returns the renderer's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the priority the renderer is registered at.
    pub fn priority(&self) -> i32 {
        self.priority
    }
}

type Chain = PriorityChain<Rc<dyn Renderer>>;

/// Collects renderer registrations before dispatch begins.
///
/// Every registration subscribes the renderer to both the render group and
/// the path-query group at the same priority. [`RenderBusBuilder::build`]
/// freezes the registrations; a [`RenderBus`] cannot be extended.
pub struct RenderBusBuilder {
    default_priority: i32,
    render: Chain,
    path_query: Chain,
}

impl RenderBusBuilder {
    /// Creates a builder whose renderers without a declared priority are
    /// registered at `default_priority`.
    pub fn new(default_priority: i32) -> Self {
        Self {
            default_priority,
            render: Chain::new(),
            path_query: Chain::new(),
        }
    }

    /// Registers `renderer` at its declared priority, or at the builder's
    /// default priority when it declares none.
    pub fn register(&mut self, renderer: Rc<dyn Renderer>) -> &mut Self {
        let priority = renderer.priority().unwrap_or(self.default_priority);
        self.register_with_priority(renderer, priority)
    }

    /// Registers `renderer` at an explicit priority.
    pub fn register_with_priority(
        &mut self,
        renderer: Rc<dyn Renderer>,
        priority: i32,
    ) -> &mut Self {
        debug!(renderer = renderer.name(), priority; "Registering renderer");
        self.render.insert(priority, Rc::clone(&renderer));
        self.path_query.insert(priority, renderer);
        self
    }

    /// Freezes the registrations into a [`RenderBus`].
    pub fn build(self) -> RenderBus {
        RenderBus {
            render: self.render,
            path_query: self.path_query,
        }
    }
}

impl fmt::Debug for RenderBusBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderBusBuilder")
            .field("default_priority", &self.default_priority)
            .field("render", &subscribers(&self.render))
            .field("path_query", &subscribers(&self.path_query))
            .finish()
    }
}

impl Default for RenderBusBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_RENDER_PRIORITY)
    }
}

/// Dispatches render events through the registered renderers.
///
/// Dispatch is synchronous and stateless: each call visits renderers in
/// descending priority order (ties in registration order), skips renderers
/// that do not implement the requested operation or whose predicate declines
/// the element, and resolves with the first claiming renderer's result.
/// Errors from the claiming renderer are returned as-is.
pub struct RenderBus {
    render: Chain,
    path_query: Chain,
}

impl RenderBus {
    /// Dispatches `event` and returns its resolved value.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Unclaimed`] if no renderer claims the event,
    /// or the claiming renderer's error.
    pub fn fire(&self, event: RenderEvent<'_>) -> Result<Resolution, RenderError> {
        match event {
            RenderEvent::DrawShape { container, element } => {
                self.draw_shape(container, element).map(Resolution::Visual)
            }
            RenderEvent::DrawConnection { container, element } => self
                .draw_connection(container, element)
                .map(Resolution::Visual),
            RenderEvent::ShapePath { element } => self.shape_path(element).map(Resolution::Path),
            RenderEvent::ConnectionPath { element } => {
                self.connection_path(element).map(Resolution::Path)
            }
        }
    }

    /// Dispatches a shape-render event and returns the drawn node.
    pub fn draw_shape(&self, container: &Node, element: &Element) -> Result<Node, RenderError> {
        self.dispatch(Operation::DrawShape, element, |renderer| {
            renderer.draw_shape(container, element)
        })
    }

    /// Dispatches a connection-render event and returns the drawn node.
    pub fn draw_connection(
        &self,
        container: &Node,
        element: &Element,
    ) -> Result<Node, RenderError> {
        self.dispatch(Operation::DrawConnection, element, |renderer| {
            renderer.draw_connection(container, element)
        })
    }

    /// Dispatches a shape path query and returns the outline.
    pub fn shape_path(&self, element: &Element) -> Result<String, RenderError> {
        self.dispatch(Operation::ShapePath, element, |renderer| {
            renderer.shape_path(element)
        })
    }

    /// Dispatches a connection path query and returns the outline.
    pub fn connection_path(&self, element: &Element) -> Result<String, RenderError> {
        self.dispatch(Operation::ConnectionPath, element, |renderer| {
            renderer.connection_path(element)
        })
    }

    /// Renderers subscribed to `group`, in visiting order.
    pub fn subscribers(&self, group: EventGroup) -> Vec<Subscriber> {
        subscribers(self.chain(group))
    }

    fn chain(&self, group: EventGroup) -> &Chain {
        match group {
            EventGroup::Render => &self.render,
            EventGroup::PathQuery => &self.path_query,
        }
    }

    fn dispatch<R>(
        &self,
        operation: Operation,
        element: &Element,
        invoke: impl Fn(&dyn Renderer) -> Result<R, RenderError>,
    ) -> Result<R, RenderError> {
        let capability = operation.capability();

        let claimed = self.chain(operation.group()).find_map(|priority, renderer| {
            if !renderer.capabilities().contains(capability) {
                trace!(
                    renderer = renderer.name(),
                    operation:%;
                    "Renderer does not implement operation, skipping"
                );
                return None;
            }

            if !renderer.can_render(element) {
                trace!(
                    renderer = renderer.name(),
                    element_id = element.id();
                    "Renderer declined element"
                );
                return None;
            }

            debug!(
                renderer = renderer.name(),
                priority,
                element_id = element.id(),
                operation:%;
                "Renderer claimed element"
            );
            Some(invoke(renderer.as_ref()))
        });

        claimed.unwrap_or_else(|| {
            Err(RenderError::Unclaimed {
                operation,
                element_id: element.id().to_string(),
            })
        })
    }
}

impl fmt::Debug for RenderBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderBus")
            .field("render", &subscribers(&self.render))
            .field("path_query", &subscribers(&self.path_query))
            .finish()
    }
}

fn subscribers(chain: &Chain) -> Vec<Subscriber> {
    chain
        .iter()
        .map(|(priority, renderer)| Subscriber {
            name: renderer.name().to_string(),
            priority,
        })
        .collect()
}
