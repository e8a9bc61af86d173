//! Error types for the huahua core.
//!
//! Generation and rendering never fail; these errors only surface at the
//! edges (viewport construction, sketch lookup, color parsing, seed records,
//! snapshots).

use thiserror::Error;

/// Errors produced at the boundaries of the sketch system.
#[derive(Debug, Error)]
pub enum SketchError {
    /// Viewport width or height was zero, negative, or not finite.
    #[error("invalid dimensions: width and height must be finite and positive")]
    InvalidDimensions,

    /// A sketch name did not match any registered sketch.
    #[error("unknown sketch: {0}")]
    UnknownSketch(String),

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A palette could not be constructed from the given colors.
    #[error("invalid palette: {0}")]
    InvalidPalette(String),

    /// A seed record could not be parsed.
    #[error("invalid seed: {0}")]
    InvalidSeed(String),

    /// Writing a snapshot failed.
    #[error("i/o error: {0}")]
    Io(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_dimensions_mentions_width_and_height() {
        let msg = SketchError::InvalidDimensions.to_string();
        assert!(
            msg.contains("width") && msg.contains("height"),
            "expected message mentioning width and height, got: {msg}"
        );
    }

    #[test]
    fn unknown_sketch_includes_name() {
        let msg = SketchError::UnknownSketch("kandinsky".into()).to_string();
        assert!(msg.contains("kandinsky"), "missing name in: {msg}");
    }

    #[test]
    fn invalid_color_includes_message() {
        let msg = SketchError::InvalidColor("#zz0000".into()).to_string();
        assert!(msg.contains("#zz0000"), "missing input in: {msg}");
    }

    #[test]
    fn invalid_seed_includes_message() {
        let msg = SketchError::InvalidSeed("missing field `seed`".into()).to_string();
        assert!(msg.contains("missing field"), "missing cause in: {msg}");
    }

    #[test]
    fn io_includes_message() {
        let msg = SketchError::Io("disk full".into()).to_string();
        assert!(msg.contains("disk full"), "missing message in: {msg}");
    }

    #[test]
    fn sketch_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SketchError>();
    }
}
