//! Error types shared by the site's effects.
//!
//! Nothing here is fatal: callers log the error and carry on without the
//! affected effect.

use thiserror::Error;

/// Result type for browser-side operations.
pub type SiteResult<T> = Result<T, SiteError>;

/// Problems found while loading or validating [`crate::config::SiteConfig`].
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The embedded JSON override could not be parsed.
    #[error("invalid config JSON: {0}")]
    Json(String),

    /// The fireworks palette is empty.
    #[error("fireworks.colors must not be empty")]
    EmptyPalette,

    /// A `[min, max]` pair is inverted.
    #[error("{field}: min {min} is greater than max {max}")]
    InvertedRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    /// A count, interval or cap is zero.
    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    /// Volume outside `0.0..=1.0`.
    #[error("sound.volume must be within 0..=1, got {0}")]
    Volume(f64),

    /// `countdown.target_date` is not `YYYY-MM-DDTHH:MM:SS`.
    #[error("invalid countdown.target_date {value:?}: {reason}")]
    TargetDate { value: String, reason: String },
}

/// Failures of the browser glue.
#[derive(Debug, Error)]
pub enum SiteError {
    /// An element the component expects on the page is absent.
    #[error("missing page element: {0}")]
    MissingElement(&'static str),

    /// A canvas refused to hand out a 2d context.
    #[error("canvas 2d context unavailable")]
    CanvasContext,

    /// Web Audio initialization or playback failed.
    #[error("audio: {0}")]
    Audio(String),

    /// A gallery image path with an extension outside the allow list.
    #[error("unsupported image {0:?}")]
    UnsupportedImage(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

