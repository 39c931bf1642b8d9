//! Configuration types for Overdraw render dispatch.
//!
//! All types implement [`serde::Deserialize`] with per-section defaults, so a
//! configuration file only needs to name what it changes.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`DispatchConfig`] - The baseline priority for renderers without one.
//! - [`ScriptTaskConfig`] - How the script-task renderer recognizes and decorates tasks.
//! - [`OverlayConfig`] - Placement of the script-task icon overlay.
//!
//! # Example
//!
//! ```
//! # use overdraw::config::AppConfig;
//! let config = AppConfig::from_toml_str(
//!     r#"
//!     [script_task]
//!     format_pattern = "python|jython|py3"
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.script_task().format_pattern(), "python|jython|py3");
//! assert_eq!(config.dispatch().default_priority(), 1000);
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info};
use serde::Deserialize;
use thiserror::Error;

use crate::render::{DEFAULT_RENDER_PRIORITY, SCRIPT_TASK_RENDER_PRIORITY};

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Dispatch configuration section.
    #[serde(default)]
    dispatch: DispatchConfig,

    /// Script-task renderer configuration section.
    #[serde(default)]
    script_task: ScriptTaskConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(dispatch: DispatchConfig, script_task: ScriptTaskConfig) -> Self {
        Self {
            dispatch,
            script_task,
        }
    }

    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text is not valid TOML or does
    /// not match the configuration schema.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Returns the dispatch configuration.
    pub fn dispatch(&self) -> &DispatchConfig {
        &self.dispatch
    }

    /// Returns the script-task renderer configuration.
    pub fn script_task(&self) -> &ScriptTaskConfig {
        &self.script_task
    }
}

/// Dispatch settings shared by every renderer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Priority given to renderers that do not declare one.
    default_priority: i32,
}

impl DispatchConfig {
    /// Creates a dispatch section with the given default priority.
    pub fn new(default_priority: i32) -> Self {
        Self { default_priority }
    }

    /// Returns the priority for renderers that declare none.
    pub fn default_priority(&self) -> i32 {
        self.default_priority
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            default_priority: DEFAULT_RENDER_PRIORITY,
        }
    }
}

/// Settings for the script-task renderer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScriptTaskConfig {
    priority: i32,
    /// Element type the renderer decorates.
    task_type: String,
    /// Host handler used to draw the undecorated task first.
    base_type: String,
    /// Business-object property holding the script language.
    format_property: String,
    /// Matched case-insensitively against the script language.
    format_pattern: String,
    overlay: OverlayConfig,
}

impl ScriptTaskConfig {
    /// Returns the priority the renderer registers at.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Returns the element type the renderer decorates.
    pub fn task_type(&self) -> &str {
        &self.task_type
    }

    /// Returns the host handler used for the undecorated task.
    pub fn base_type(&self) -> &str {
        &self.base_type
    }

    /// Returns the business-object property holding the script language.
    pub fn format_property(&self) -> &str {
        &self.format_property
    }

    /// Returns the case-insensitive script language pattern.
    pub fn format_pattern(&self) -> &str {
        &self.format_pattern
    }

    /// Returns the icon overlay placement.
    pub fn overlay(&self) -> &OverlayConfig {
        &self.overlay
    }

    /// Replaces the format pattern (builder style).
    pub fn with_format_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.format_pattern = pattern.into();
        self
    }

    /// Replaces the priority (builder style).
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl Default for ScriptTaskConfig {
    fn default() -> Self {
        Self {
            priority: SCRIPT_TASK_RENDER_PRIORITY,
            task_type: "bpmn:ScriptTask".to_string(),
            base_type: "bpmn:Task".to_string(),
            format_property: "scriptFormat".to_string(),
            format_pattern: "python|jython".to_string(),
            overlay: OverlayConfig::default(),
        }
    }
}

/// Placement of the icon overlay, relative to the element's visual group.
///
/// The overlay is fixed in size and offset; it does not follow the
/// element's bounds.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl OverlayConfig {
    /// Creates an overlay rectangle relative to the visual group.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns the overlay x offset.
    pub fn x(&self) -> f32 {
        self.x
    }

    /// Returns the overlay y offset.
    pub fn y(&self) -> f32 {
        self.y
    }

    /// Returns the overlay width.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Returns the overlay height.
    pub fn height(&self) -> f32 {
        self.height
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self::new(5.0, 5.0, 20.0, 20.0)
    }
}

/// Loads configuration from a TOML file.
///
/// # Errors
///
/// Returns error if:
/// - The file doesn't exist
/// - The file cannot be read
/// - TOML parsing fails
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let path = path.as_ref();
    info!(path = path.display().to_string(); "Loading configuration");

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let config = AppConfig::from_toml_str(&content)?;
    debug!(config:?; "Configuration loaded");

    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.dispatch().default_priority(), DEFAULT_RENDER_PRIORITY);
        assert_eq!(config.script_task().priority(), 1500);
        assert_eq!(config.script_task().task_type(), "bpmn:ScriptTask");
        assert_eq!(config.script_task().base_type(), "bpmn:Task");
        assert_eq!(config.script_task().format_property(), "scriptFormat");
        assert_eq!(config.script_task().format_pattern(), "python|jython");
        assert_eq!(
            *config.script_task().overlay(),
            OverlayConfig::new(5.0, 5.0, 20.0, 20.0)
        );
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [dispatch]
            default_priority = 1200

            [script_task.overlay]
            width = 24
            height = 24
            "#,
        )
        .unwrap();

        assert_eq!(config.dispatch().default_priority(), 1200);
        assert_eq!(config.script_task().priority(), 1500);
        assert_eq!(config.script_task().overlay().width(), 24.0);
        assert_eq!(config.script_task().overlay().x(), 5.0);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.dispatch().default_priority(), DEFAULT_RENDER_PRIORITY);
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let result = AppConfig::from_toml_str("[dispatch]\ndefault_priority = \"high\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[script_task]\npriority = 2000").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.script_task().priority(), 2000);
    }

    #[test]
    fn test_load_config_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(dir.path().join("absent.toml"));

        assert!(matches!(result, Err(ConfigError::MissingFile(_))));
    }
}
