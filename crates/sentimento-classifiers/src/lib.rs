//! Sentimento Classifiers
//!
//! Sentiment inference over pre-trained TF-IDF + linear model artifacts.
//!
//! A request flows through the pipeline in this order:
//! - Text normalization (lowercase, URL and noise stripping)
//! - Language identification with fallback to a default language
//! - Classifier selection by (algorithm, language) from the artifact registry
//! - TF-IDF vectorization with the language's shared vectorizer
//! - Prediction, label resolution and confidence estimation
//!
//! The registry is loaded once at startup and is read-only afterwards.

pub mod classifier;
pub mod confidence;
pub mod config;
pub mod labels;
pub mod language;
pub mod models;
pub mod registry;
pub mod router;
pub mod text;
pub mod vectorizer;

pub use classifier::{Classifier, ClassifierKind, MarginPredictor, Predictor, ProbabilisticPredictor};
pub use config::{DetectorConfig, EngineConfig, RegistryConfig, RouterConfig};
pub use labels::LabelTable;
pub use language::{LanguageDetector, LanguageIdentifier, WhatlangDetector};
pub use models::ClassifierArtifact;
pub use registry::{ArtifactRegistry, LoadFailure, LoadReport, RegistryBuilder};
pub use router::InferenceRouter;
pub use text::{normalize, TextNormalizer};
pub use vectorizer::{Norm, SparseVector, TfidfVectorizer};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::Classifier;
    pub use crate::config::EngineConfig;
    pub use crate::registry::{ArtifactRegistry, LoadReport};
    pub use crate::router::InferenceRouter;
    pub use crate::text::normalize;
}
