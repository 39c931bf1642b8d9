//! Extension modules and the plugin registry.
//!
//! An [`ExtensionModule`] is a declarative descriptor: a name, the services
//! to instantiate eagerly, and a provider for each of them. The
//! [`PluginRegistry`] validates descriptors when they are registered,
//! instantiates the listed services against the host [`Services`], and
//! freezes the result into a [`RenderBus`] with the host's default renderer
//! underneath every plugin.

use std::rc::Rc;

use indexmap::IndexMap;
use log::{debug, info};

use crate::{
    config::AppConfig,
    error::{ConfigurationError, OverdrawError},
    host::DefaultRenderer,
    render::{RenderBus, RenderBusBuilder, Renderer},
};

/// Builds a renderer from the host services.
pub type RendererFactory = fn(&Services) -> Result<Rc<dyn Renderer>, OverdrawError>;

/// How a module provides a named service.
#[derive(Debug, Clone, Copy)]
pub enum Provider {
    /// Instantiate the service by calling the factory.
    Type(RendererFactory),
}

/// Declarative description of a renderer plugin.
#[derive(Debug, Clone)]
pub struct ExtensionModule {
    name: String,
    init: Vec<String>,
    providers: IndexMap<String, Provider>,
    duplicates: Vec<String>,
}

impl ExtensionModule {
    /// Creates an empty descriptor named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            init: Vec::new(),
            providers: IndexMap::new(),
            duplicates: Vec::new(),
        }
    }

    /// Adds a service to instantiate when the module is loaded.
    pub fn with_init(mut self, service: impl Into<String>) -> Self {
        self.init.push(service.into());
        self
    }

    /// Provides `service` through `factory`.
    pub fn with_type(mut self, service: impl Into<String>, factory: RendererFactory) -> Self {
        let service = service.into();
        if self.providers.contains_key(&service) {
            self.duplicates.push(service);
        } else {
            self.providers.insert(service, Provider::Type(factory));
        }
        self
    }

    /// Returns the module name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the services instantiated when the module loads.
    pub fn init(&self) -> &[String] {
        &self.init
    }

    /// Returns the provider registered for `service`.
    pub fn provider(&self, service: &str) -> Option<&Provider> {
        self.providers.get(service)
    }

    /// Checks that the descriptor can be loaded.
    ///
    /// # Errors
    ///
    /// Returns the first problem found: an empty module or service name, a
    /// service provided twice, or an init entry without a provider.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.name.trim().is_empty() {
            return Err(ConfigurationError::EmptyModuleName);
        }

        if let Some(service) = self.duplicates.first() {
            return Err(ConfigurationError::DuplicateProvider {
                module: self.name.clone(),
                service: service.clone(),
            });
        }

        let names = self.init.iter().chain(self.providers.keys());
        if names.into_iter().any(|service| service.trim().is_empty()) {
            return Err(ConfigurationError::EmptyServiceName {
                module: self.name.clone(),
            });
        }

        if let Some(service) = self
            .init
            .iter()
            .find(|service| !self.providers.contains_key(*service))
        {
            return Err(ConfigurationError::MissingProvider {
                module: self.name.clone(),
                service: service.clone(),
            });
        }

        Ok(())
    }
}

/// Host services made available to renderer factories.
#[derive(Debug)]
pub struct Services {
    config: AppConfig,
    default_renderer: Option<Rc<DefaultRenderer>>,
}

impl Services {
    /// Creates services backed by the host's standard [`DefaultRenderer`].
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            default_renderer: Some(Rc::new(DefaultRenderer::new())),
        }
    }

    /// Replaces the host default renderer, or removes it with `None`.
    pub fn with_default_renderer(
        mut self,
        default_renderer: Option<Rc<DefaultRenderer>>,
    ) -> Self {
        self.default_renderer = default_renderer;
        self
    }

    /// Returns the host configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The host default renderer, requested on behalf of `requested_by`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingService`] if the host runs
    /// without a default renderer.
    pub fn default_renderer(
        &self,
        requested_by: &str,
    ) -> Result<Rc<DefaultRenderer>, ConfigurationError> {
        self.default_renderer
            .clone()
            .ok_or_else(|| ConfigurationError::MissingService {
                service: DefaultRenderer::NAME.to_string(),
                requested_by: requested_by.to_string(),
            })
    }
}

impl Default for Services {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

/// Collects extension modules and instantiates them into a [`RenderBus`].
#[derive(Debug, Default, Clone)]
pub struct PluginRegistry {
    modules: Vec<ExtensionModule>,
}

impl PluginRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and registers a module.
    ///
    /// # Errors
    ///
    /// Returns the module's [`ExtensionModule::validate`] error; the module
    /// is not registered in that case.
    pub fn register_module(
        &mut self,
        module: ExtensionModule,
    ) -> Result<&mut Self, ConfigurationError> {
        module.validate()?;
        debug!(module = module.name(); "Registered extension module");
        self.modules.push(module);
        Ok(self)
    }

    /// Returns the registered modules, in registration order.
    pub fn modules(&self) -> &[ExtensionModule] {
        &self.modules
    }

    /// Instantiates every module's init services and freezes the bus.
    ///
    /// The host default renderer, when present, is registered first so that
    /// plugins of equal priority registered later never displace it.
    ///
    /// # Errors
    ///
    /// Returns the first factory error, typically a
    /// [`ConfigurationError::MissingService`].
    pub fn initialize(&self, services: &Services) -> Result<RenderBus, OverdrawError> {
        let mut builder = RenderBusBuilder::new(services.config().dispatch().default_priority());

        if let Some(default_renderer) = &services.default_renderer {
            builder.register(Rc::clone(default_renderer) as Rc<dyn Renderer>);
        }

        for module in &self.modules {
            for service in module.init() {
                let provider = module.provider(service).ok_or_else(|| {
                    ConfigurationError::MissingProvider {
                        module: module.name().to_string(),
                        service: service.clone(),
                    }
                })?;
                let renderer = match provider {
                    Provider::Type(factory) => factory(services)?,
                };
                debug!(
                    module = module.name(),
                    service = service.as_str(),
                    renderer = renderer.name();
                    "Instantiated renderer service"
                );
                builder.register(renderer);
            }
        }

        let bus = builder.build();
        info!(modules = self.modules.len(); "Render plugins initialized");
        Ok(bus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::EventGroup;

    fn host_only(_services: &Services) -> Result<Rc<dyn Renderer>, OverdrawError> {
        Ok(Rc::new(DefaultRenderer::empty()))
    }

    fn needs_host(services: &Services) -> Result<Rc<dyn Renderer>, OverdrawError> {
        let renderer: Rc<dyn Renderer> = services.default_renderer("needsHost")?;
        Ok(renderer)
    }

    #[test]
    fn test_empty_module_name_is_rejected() {
        let mut registry = PluginRegistry::new();
        let err = registry
            .register_module(ExtensionModule::new("  "))
            .unwrap_err();

        assert!(matches!(err, ConfigurationError::EmptyModuleName));
        assert!(registry.modules().is_empty());
    }

    #[test]
    fn test_empty_service_name_is_rejected() {
        let module = ExtensionModule::new("ext").with_init("").with_type("", host_only);

        assert!(matches!(
            module.validate(),
            Err(ConfigurationError::EmptyServiceName { ref module }) if module == "ext"
        ));
    }

    #[test]
    fn test_init_without_provider_is_rejected() {
        let module = ExtensionModule::new("ext").with_init("renderer");

        assert!(matches!(
            module.validate(),
            Err(ConfigurationError::MissingProvider { ref service, .. }) if service == "renderer"
        ));
    }

    #[test]
    fn test_duplicate_provider_is_rejected() {
        let module = ExtensionModule::new("ext")
            .with_init("renderer")
            .with_type("renderer", host_only)
            .with_type("renderer", needs_host);

        assert!(matches!(
            module.validate(),
            Err(ConfigurationError::DuplicateProvider { ref service, .. }) if service == "renderer"
        ));
    }

    #[test]
    fn test_missing_host_service_fails_initialization() {
        let mut registry = PluginRegistry::new();
        registry
            .register_module(
                ExtensionModule::new("ext")
                    .with_init("needsHost")
                    .with_type("needsHost", needs_host),
            )
            .unwrap();
        let services = Services::default().with_default_renderer(None);

        let err = registry.initialize(&services).unwrap_err();

        assert!(matches!(
            err,
            OverdrawError::Configuration(ConfigurationError::MissingService {
                ref requested_by,
                ..
            }) if requested_by == "needsHost"
        ));
    }

    #[test]
    fn test_initialize_registers_host_then_init_services() {
        let mut registry = PluginRegistry::new();
        registry
            .register_module(
                ExtensionModule::new("ext")
                    .with_init("hostOnly")
                    .with_type("hostOnly", host_only)
                    .with_type("unused", needs_host),
            )
            .unwrap();

        let bus = registry.initialize(&Services::default()).unwrap();
        let subscribers = bus.subscribers(EventGroup::Render);

        assert_eq!(subscribers.len(), 2);
        assert_eq!(subscribers[0].name(), DefaultRenderer::NAME);
        assert_eq!(subscribers[0].priority(), 1);
        assert_eq!(subscribers[1].name(), DefaultRenderer::NAME);
    }

    #[test]
    fn test_uninitialized_providers_are_not_instantiated() {
        let mut registry = PluginRegistry::new();
        registry
            .register_module(ExtensionModule::new("ext").with_type("needsHost", needs_host))
            .unwrap();
        let services = Services::default().with_default_renderer(None);

        let bus = registry.initialize(&services).unwrap();

        assert!(bus.subscribers(EventGroup::Render).is_empty());
    }
}
