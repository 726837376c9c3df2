//! Error types for the decoding engine.
//!
//! The decoder itself is total: it never fails on well-formed input, and
//! unknown pinyin or empty sequences become empty results rather than errors
//! (see [`crate::batch`] and [`crate::incremental`]). These variants cover
//! only the resource-loading boundary: a missing file, a malformed JSON
//! payload, or the underlying I/O failure.

use std::path::PathBuf;

/// Errors surfaced while loading or saving HMM parameters and lexicon data.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A parameter or lexicon aggregate file was not found at load time.
    #[error("resource missing: {0}")]
    ResourceMissing(PathBuf),

    /// The file was found but its contents did not match the expected schema.
    #[error("resource malformed: {0}")]
    ResourceMalformed(String),

    /// Underlying I/O failure (permissions, truncated reads, etc).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parse failure, reported with the serde_json error text.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse failure when loading a `DecoderConfig`.
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
