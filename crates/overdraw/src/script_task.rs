//! Script-task icon overlay renderer.
//!
//! Claims script tasks whose script language matches a configurable,
//! case-insensitive pattern (`python|jython` by default). The host draws the
//! plain task first; the renderer then adds a small image overlay carrying
//! the bundled language icon and returns it.
//!
//! Only shape drawing is implemented. Connection drawing and path queries
//! for claimed tasks fall through to lower-priority renderers.

use std::rc::Rc;

use base64::{Engine, engine::general_purpose::STANDARD};
use regex::{Regex, RegexBuilder};

use overdraw_core::{append, attrs, builder, scene::Node};

use crate::{
    config::ScriptTaskConfig,
    element::Element,
    error::{ConfigurationError, OverdrawError, RenderError},
    host::DefaultRenderer,
    module::{ExtensionModule, Services},
    render::{Capabilities, Renderer},
};

/// Name of the extension module returned by [`module`].
pub const MODULE_NAME: &str = "scriptTaskExtension";

/// Service name the renderer is registered under.
pub const SERVICE_NAME: &str = "scriptTaskRenderer";

const ICON_SVG: &str = include_str!("../assets/python.svg");

/// The bundled icon as an embeddable `data:` URI.
pub fn icon_href() -> String {
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(ICON_SVG))
}

/// Decorates script tasks with a language icon.
#[derive(Debug)]
pub struct ScriptTaskRenderer {
    default_renderer: Rc<DefaultRenderer>,
    config: ScriptTaskConfig,
    format_pattern: Regex,
    icon_href: String,
}

impl ScriptTaskRenderer {
    /// Creates a renderer drawing base shapes through `default_renderer`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidPattern`] if the configured
    /// format pattern is not a valid regular expression.
    pub fn new(
        default_renderer: Rc<DefaultRenderer>,
        config: ScriptTaskConfig,
    ) -> Result<Self, ConfigurationError> {
        let format_pattern = RegexBuilder::new(config.format_pattern())
            .case_insensitive(true)
            .build()
            .map_err(|err| ConfigurationError::InvalidPattern {
                pattern: config.format_pattern().to_string(),
                reason: err.to_string(),
            })?;

        Ok(Self {
            default_renderer,
            config,
            format_pattern,
            icon_href: icon_href(),
        })
    }

    /// Factory used by the extension module.
    pub fn from_services(services: &Services) -> Result<Rc<dyn Renderer>, OverdrawError> {
        let default_renderer = services.default_renderer(SERVICE_NAME)?;
        let renderer = Self::new(default_renderer, services.config().script_task().clone())?;
        Ok(Rc::new(renderer))
    }

    /// Returns the icon URI used as the overlay `href`.
    pub fn icon_href(&self) -> &str {
        &self.icon_href
    }
}

impl Renderer for ScriptTaskRenderer {
    fn name(&self) -> &str {
        SERVICE_NAME
    }

    fn priority(&self) -> Option<i32> {
        Some(self.config.priority())
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::DRAW_SHAPE
    }

    fn can_render(&self, element: &Element) -> bool {
        element.is(self.config.task_type())
            && element
                .business_object()
                .property(self.config.format_property())
                .is_some_and(|format| self.format_pattern.is_match(format))
    }

    fn draw_shape(&self, container: &Node, element: &Element) -> Result<Node, RenderError> {
        self.default_renderer
            .draw_with(self.config.base_type(), container, element)?;

        let overlay = self.config.overlay();
        let image = builder::create(
            &container.document(),
            "image",
            &attrs! {
                "x" => overlay.x(),
                "y" => overlay.y(),
                "width" => overlay.width(),
                "height" => overlay.height(),
                "href" => self.icon_href.as_str(),
            },
        )?;

        append::append(container, &image)?;

        Ok(image)
    }
}

/// The extension module descriptor for the script-task renderer.
pub fn module() -> ExtensionModule {
    ExtensionModule::new(MODULE_NAME)
        .with_init(SERVICE_NAME)
        .with_type(SERVICE_NAME, ScriptTaskRenderer::from_services)
}
