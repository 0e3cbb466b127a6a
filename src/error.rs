//! Error types for swipedeck.
//!
//! Gesture input is never an error. Everything here happens at the edges:
//! loading configuration, validating the profile set, decoding profile
//! images and parsing replay scripts.

use thiserror::Error;

/// Errors surfaced by swipedeck.
#[derive(Debug, Error)]
pub enum DeckError {
    /// The configuration file was not found.
    #[error("configuration file not found: {0}")]
    ConfigNotFound(String),

    /// A path is not valid UTF-8 or does not name a readable file.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// The configuration could not be parsed or deserialized.
    #[error("failed to parse configuration: {0}")]
    Config(#[from] config::ConfigError),

    /// The profile set violates the dense, ascending id requirement.
    #[error("invalid profile set: {0}")]
    Profiles(String),

    /// A profile image could not be found or decoded.
    #[error("failed to load image '{reference}': {source}")]
    Image {
        reference: String,
        #[source]
        source: image::ImageError,
    },

    /// A profile image reference matches neither an embedded asset nor a file.
    #[error("image not found: {0}")]
    ImageNotFound(String),

    /// The effective configuration could not be rendered as TOML.
    #[error("failed to render configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A replay script is not valid JSON.
    #[error("invalid replay script: {0}")]
    Script(#[from] serde_json::Error),

    /// Terminal or file I/O failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, DeckError>;
