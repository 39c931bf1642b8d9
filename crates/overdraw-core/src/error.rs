//! Error types for scene-graph operations.

use thiserror::Error;

/// Errors produced while building or mutating the scene graph.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Hierarchy request error: {0}")]
    HierarchyRequest(String),

    #[error("Operation not supported: {0}")]
    NotSupported(String),
}

/// Malformed markup passed to the parser or the node builder.
///
/// Positions are reported against the text that was handed to the XML
/// parser, which includes the namespaced wrapper added around fragments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed markup at {row}:{column}: {message}")]
pub struct ParseError {
    message: String,
    row: u32,
    column: u32,
}

impl ParseError {
    /// Create a new parse error at the given position.
    pub fn new(message: impl Into<String>, row: u32, column: u32) -> Self {
        Self {
            message: message.into(),
            row,
            column,
        }
    }

    /// The underlying parser message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// 1-based row of the offending input.
    pub fn row(&self) -> u32 {
        self.row
    }

    /// 1-based column of the offending input.
    pub fn column(&self) -> u32 {
        self.column
    }
}

impl From<roxmltree::Error> for ParseError {
    fn from(err: roxmltree::Error) -> Self {
        let pos = err.pos();
        Self::new(err.to_string(), pos.row, pos.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new("unexpected end of stream", 1, 12);
        assert_eq!(
            err.to_string(),
            "malformed markup at 1:12: unexpected end of stream"
        );
    }

    #[test]
    fn test_scene_error_wraps_parse_error() {
        let err: SceneError = ParseError::new("bad", 2, 3).into();
        assert!(matches!(err, SceneError::Parse(_)));
        assert_eq!(err.to_string(), "malformed markup at 2:3: bad");
    }
}
