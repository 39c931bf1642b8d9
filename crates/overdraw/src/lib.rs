//! Overdraw - Priority-ordered, capability-gated render dispatch for diagram editors.
//!
//! Renderers register at a priority and declare which elements they handle.
//! Every paint request is routed to the highest-priority renderer that
//! claims it; the host's own renderer sits underneath as the fallback. The
//! bundled [`script_task`] plugin shows the pattern by decorating script
//! tasks with a language icon.

pub mod canvas;
pub mod config;
pub mod element;
pub mod host;
pub mod module;
pub mod render;
pub mod script_task;

mod error;

pub use overdraw_core::{append, attr, attrs, builder, markup, namespace, scene};

pub use error::{ConfigurationError, OverdrawError, RenderError};

use log::info;

use canvas::Canvas;
use config::AppConfig;
use module::{ExtensionModule, PluginRegistry, Services};
use render::RenderBus;

/// Builder that wires extension modules into a paintable [`Canvas`].
///
/// # Examples
///
/// ```rust
/// use overdraw::{
///     CanvasBuilder,
///     config::AppConfig,
///     element::{Bounds, BusinessObject, Element},
///     script_task,
/// };
///
/// let mut builder = CanvasBuilder::new(AppConfig::default());
/// builder
///     .register_module(script_task::module())
///     .expect("bundled module is valid");
/// let canvas = builder.build().expect("host services are available");
///
/// let task = Element::shape(
///     "Task_1",
///     BusinessObject::new("bpmn:ScriptTask")
///         .with_super_type("bpmn:Task")
///         .with_property("scriptFormat", "python"),
///     Bounds::new(100.0, 100.0, 100.0, 80.0),
/// );
/// let visual = canvas.add(&task).expect("script task is drawable");
///
/// assert_eq!(visual.child_count(), 2);
/// ```
#[derive(Debug, Default)]
pub struct CanvasBuilder {
    config: AppConfig,
    registry: PluginRegistry,
}

impl CanvasBuilder {
    /// Create a builder without any extension modules.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            registry: PluginRegistry::new(),
        }
    }

    /// Validate and register an extension module.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] describing the malformed descriptor.
    pub fn register_module(
        &mut self,
        module: ExtensionModule,
    ) -> Result<&mut Self, ConfigurationError> {
        self.registry.register_module(module)?;
        Ok(self)
    }

    /// Returns the configuration modules are instantiated with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Instantiate the registered modules against the standard host services.
    ///
    /// # Errors
    ///
    /// Returns an error if a module's factory fails.
    pub fn build_bus(&self) -> Result<RenderBus, OverdrawError> {
        let services = Services::new(self.config.clone());
        self.registry.initialize(&services)
    }

    /// Build a canvas painting through the initialized render bus.
    ///
    /// # Errors
    ///
    /// Returns an error if a module's factory fails.
    pub fn build(&self) -> Result<Canvas, OverdrawError> {
        let bus = self.build_bus()?;
        info!(modules = self.registry.modules().len(); "Canvas ready");
        Canvas::new(bus)
    }
}
