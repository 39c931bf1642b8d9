//! Error types for Overdraw operations.
//!
//! [`OverdrawError`] is the top-level error. Dispatch failures are
//! [`RenderError`]s and propagate to the caller's paint cycle unchanged;
//! registration problems are [`ConfigurationError`]s and surface when the
//! registry is initialized.

use std::io;

use thiserror::Error;

use overdraw_core::SceneError;

use crate::{config::ConfigError, render::Operation};

/// The main error type for Overdraw operations.
#[derive(Debug, Error)]
pub enum OverdrawError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Errors raised while dispatching a render event.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A renderer claimed an element for an operation it never implemented.
    #[error(
        "Renderer `{renderer}` claimed `{element_id}` for {operation} without implementing it"
    )]
    ContractViolation {
        renderer: String,
        operation: Operation,
        element_id: String,
    },

    #[error("No renderer claimed `{element_id}` for {operation}")]
    Unclaimed {
        operation: Operation,
        element_id: String,
    },

    #[error("No {operation} handler for element type `{type_tag}`")]
    MissingHandler {
        operation: Operation,
        type_tag: String,
    },

    #[error("Element `{element_id}` has no geometry usable for {operation}")]
    Geometry {
        operation: Operation,
        element_id: String,
    },

    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Errors raised while registering renderers.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Extension module name must not be empty")]
    EmptyModuleName,

    #[error("Module `{module}` lists an empty service name")]
    EmptyServiceName { module: String },

    #[error("Module `{module}` initializes `{service}` but provides no renderer for it")]
    MissingProvider { module: String, service: String },

    #[error("Module `{module}` provides `{service}` more than once")]
    DuplicateProvider { module: String, service: String },

    #[error("`{requested_by}` requires host service `{service}`, which is not available")]
    MissingService {
        service: String,
        requested_by: String,
    },

    #[error("Invalid script format pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}
