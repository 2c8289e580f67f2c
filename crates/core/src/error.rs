//! Error types for facet.
//!
//! Generation itself almost never fails: parameters are clamped and an
//! exhausted placement budget is a normal outcome. The variants here cover
//! malformed canvases, unknown asset names and I/O at the export edge.

use thiserror::Error;

/// Errors produced by generation, rendering and export.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Width or height was zero, or the pixel count overflowed.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A color scheme could not be constructed from the given colors.
    #[error("invalid palette: {0}")]
    InvalidPalette(String),

    /// No built-in color scheme has this name.
    #[error("unknown palette: {0}")]
    UnknownPalette(String),

    /// No tile component has this code.
    #[error("unknown component: {0}")]
    UnknownComponent(String),

    /// No acceptance policy has this name.
    #[error("unknown balance policy: {0}")]
    UnknownPolicy(String),

    /// A component's path data could not be parsed into geometry.
    #[error("invalid path data for component '{component}': {reason}")]
    InvalidPath { component: String, reason: String },

    /// Writing an exported artifact failed.
    #[error("i/o error: {0}")]
    Io(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_dimensions_displays_readable_message() {
        let msg = EngineError::InvalidDimensions.to_string();
        assert!(
            msg.contains("width") && msg.contains("height"),
            "expected message mentioning width and height, got: {msg}"
        );
    }

    #[test]
    fn unknown_palette_includes_name() {
        let msg = EngineError::UnknownPalette("sunset".into()).to_string();
        assert!(msg.contains("sunset"), "missing name in: {msg}");
    }

    #[test]
    fn unknown_component_includes_code() {
        let msg = EngineError::UnknownComponent("zz".into()).to_string();
        assert!(msg.contains("zz"), "missing code in: {msg}");
    }

    #[test]
    fn unknown_policy_includes_name() {
        let msg = EngineError::UnknownPolicy("greedy".into()).to_string();
        assert!(msg.contains("greedy"), "missing name in: {msg}");
    }

    #[test]
    fn invalid_path_includes_component_and_reason() {
        let err = EngineError::InvalidPath {
            component: "tc".into(),
            reason: "unexpected token".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("tc"), "missing component in: {msg}");
        assert!(msg.contains("unexpected token"), "missing reason in: {msg}");
    }

    #[test]
    fn io_includes_message() {
        let msg = EngineError::Io("disk full".into()).to_string();
        assert!(msg.contains("disk full"));
    }

    #[test]
    fn engine_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EngineError>();
    }

    #[test]
    fn engine_error_implements_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<EngineError>();
    }
}
