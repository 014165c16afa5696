//! Client error type

use std::path::PathBuf;

/// Errors produced while talking to the device or preparing drawings.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The HTTP request could not be completed.
    #[error("request to {endpoint} failed: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The device answered with `{"status": "error"}`.
    #[error("device rejected {endpoint}: {message}")]
    Device { endpoint: String, message: String },

    /// The response body was not the JSON we expected.
    #[error("unexpected response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// A command could not be serialised.
    #[error("failed to encode draw command: {0}")]
    Encode(#[source] serde_json::Error),

    /// Colour string was not `#rrggbb`.
    #[error("invalid color {0:?}, expected #rrggbb")]
    InvalidColor(String),

    /// Unknown 3D primitive name.
    #[error("unknown 3D primitive {0:?}")]
    InvalidPrimitive(String),

    /// Unknown habit tracker name.
    #[error("unknown tracker {0:?}")]
    InvalidTracker(String),

    /// An icon file could not be read or decoded.
    #[error("failed to load icon {}: {source}", path.display())]
    Icon {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The preview image could not be written.
    #[error("failed to write preview {}: {source}", path.display())]
    Preview {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The configuration file could not be read or parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
