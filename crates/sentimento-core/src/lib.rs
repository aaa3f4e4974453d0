//! Sentimento Core
//!
//! Core types and error handling shared across Sentimento components.
//!
//! This crate provides:
//! - The supported languages, algorithm families and model keys
//! - Request, result and wire types for the inference router
//! - Error types and result handling

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{
    Algorithm, ClassLabel, InferenceRequest, InferenceResult, Language, ModelKey,
    PredictionResponse,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{Algorithm, ClassLabel, InferenceResult, Language, ModelKey};
}
