//! Error types for Sentimento

use std::path::PathBuf;

/// Result type alias using Sentimento's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for Sentimento operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input text shorter than the minimum length after trimming
    #[error("invalid input: text must have at least {min_chars} characters, got {actual_chars}")]
    InvalidInput { min_chars: usize, actual_chars: usize },

    /// Normalization stripped every character from the input
    #[error("invalid input: text is empty after normalization")]
    EmptyAfterNormalization,

    /// The registry holds no classifier at all
    #[error("no models loaded: check the models directory of this deployment")]
    NoModelsLoaded,

    /// No classifier registered for the requested key
    #[error("unknown model: no '{algorithm}' classifier loaded for language '{language}'")]
    UnknownModel { algorithm: String, language: String },

    /// A present artifact file could not be deserialized or validated
    #[error("artifact load failure for {}: {reason}", path.display())]
    ArtifactLoad { path: PathBuf, reason: String },

    /// Language detection could not produce a result
    #[error("language detection failed: {0}")]
    Detection(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a new unknown model error
    pub fn unknown_model(algorithm: impl Into<String>, language: impl Into<String>) -> Self {
        Self::UnknownModel {
            algorithm: algorithm.into(),
            language: language.into(),
        }
    }

    /// Create a new artifact load error
    pub fn artifact_load(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ArtifactLoad {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new detection error
    pub fn detection(msg: impl Into<String>) -> Self {
        Self::Detection(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Stable machine-readable name of the failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "invalid_input",
            Self::EmptyAfterNormalization => "empty_after_normalization",
            Self::NoModelsLoaded => "no_models_loaded",
            Self::UnknownModel { .. } => "unknown_model",
            Self::ArtifactLoad { .. } => "artifact_load_failure",
            Self::Detection(_) => "detection_failure",
            Self::Config(_) => "configuration_error",
            Self::Io(_) => "io_error",
            Self::Serialization(_) => "serialization_error",
        }
    }

    /// Whether the caller can fix the failure by changing the request
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput { .. } | Self::EmptyAfterNormalization | Self::UnknownModel { .. }
        )
    }
}
