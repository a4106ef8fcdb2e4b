//! Engine Errors
//!
//! Only construction and configuration can fail. Gameplay operations on a
//! session that is not playing are silent no-ops, never errors.

use thiserror::Error;

/// Engine errors.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A session or grid was requested with no vocabulary to draw from.
    #[error("vocabulary cannot be empty")]
    EmptyVocabulary,

    /// Configuration values are out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A deserialized snapshot breaks a structural invariant.
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// Configuration document is not valid JSON for the config schema.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Configuration file could not be read.
    #[error("config io error: {0}")]
    ConfigIo(#[from] std::io::Error),
}
