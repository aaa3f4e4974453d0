//! Inference routing
//!
//! The router owns the read-only registry and turns one raw request into an
//! [`InferenceResult`]: validate, normalize, resolve the language, select the
//! classifier for (algorithm, language), vectorize, predict, label and
//! estimate confidence. Nothing here mutates shared state, so a single router
//! can serve any number of concurrent callers behind an `Arc`.

use crate::classifier::Classifier;
use crate::config::{EngineConfig, RouterConfig};
use crate::labels::LabelTable;
use crate::language::{LanguageDetector, LanguageIdentifier, WhatlangDetector};
use crate::registry::ArtifactRegistry;
use crate::text::TextNormalizer;
use sentimento_core::{Algorithm, Error, InferenceResult, Language, ModelKey, Result};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Routes requests to the classifier for their (algorithm, language)
pub struct InferenceRouter {
    registry: Arc<ArtifactRegistry>,
    identifier: LanguageIdentifier,
    normalizer: TextNormalizer,
    labels: LabelTable,
    min_text_chars: usize,
}

impl InferenceRouter {
    /// Create a router with an explicit language detector
    pub fn new(
        registry: Arc<ArtifactRegistry>,
        detector: Arc<dyn LanguageDetector>,
        config: &RouterConfig,
    ) -> Result<Self> {
        Ok(Self {
            registry,
            identifier: LanguageIdentifier::new(detector, config.default_language),
            normalizer: TextNormalizer::new()?,
            labels: LabelTable::from_config(config),
            min_text_chars: config.min_text_chars,
        })
    }

    /// Create a router backed by the whatlang detector
    pub fn from_config(registry: Arc<ArtifactRegistry>, config: &EngineConfig) -> Result<Self> {
        let detector = WhatlangDetector::new().with_min_confidence(config.detector.min_confidence);
        Self::new(registry, Arc::new(detector), &config.router)
    }

    pub fn registry(&self) -> &Arc<ArtifactRegistry> {
        &self.registry
    }

    /// Classify `raw_text` with the named algorithm
    pub fn route(&self, raw_text: &str, algorithm: &str) -> Result<InferenceResult> {
        let normalized = self.prepare(raw_text)?;
        let language = self.resolve_language(&normalized);

        let algorithm = algorithm
            .parse::<Algorithm>()
            .map_err(|_| Error::unknown_model(algorithm.trim(), language.code()))?;
        let key = ModelKey::new(algorithm, language);

        let classifier = self
            .registry
            .classifier(key)
            .ok_or_else(|| Error::unknown_model(algorithm.name(), language.code()))?;

        self.infer(key, classifier, &normalized)
    }

    /// Classify `raw_text` with every algorithm loaded for its language
    pub fn compare(&self, raw_text: &str) -> Result<Vec<InferenceResult>> {
        let normalized = self.prepare(raw_text)?;
        let language = self.resolve_language(&normalized);

        let algorithms = self.registry.algorithms_for(language);
        if algorithms.is_empty() {
            return Err(Error::unknown_model("*", language.code()));
        }

        algorithms
            .into_iter()
            .map(|algorithm| {
                let key = ModelKey::new(algorithm, language);
                let classifier = self
                    .registry
                    .classifier(key)
                    .ok_or_else(|| Error::unknown_model(algorithm.name(), language.code()))?;
                self.infer(key, classifier, &normalized)
            })
            .collect()
    }

    /// Display labels a language's classifiers can produce
    pub fn known_labels(&self, language: Language) -> BTreeSet<String> {
        self.registry
            .labels(language)
            .iter()
            .map(|label| self.labels.resolve(label))
            .collect()
    }

    /// Length check, normalization and registry emptiness, in that order
    fn prepare(&self, raw_text: &str) -> Result<String> {
        let actual_chars = raw_text.trim().chars().count();
        if actual_chars < self.min_text_chars {
            return Err(Error::InvalidInput {
                min_chars: self.min_text_chars,
                actual_chars,
            });
        }

        let normalized = self.normalizer.normalize(raw_text);
        if normalized.is_empty() {
            return Err(Error::EmptyAfterNormalization);
        }

        if self.registry.is_empty() {
            return Err(Error::NoModelsLoaded);
        }

        Ok(normalized)
    }

    /// Detected language, or the default when nothing is loaded for it
    fn resolve_language(&self, normalized: &str) -> Language {
        let detected = self.identifier.identify(normalized);
        let default = self.identifier.default_language();

        if detected != default && self.registry.vectorizer(detected).is_none() {
            debug!(
                "No artifacts loaded for '{}', using default '{}'",
                detected, default
            );
            return default;
        }
        detected
    }

    fn infer(&self, key: ModelKey, classifier: &Classifier, normalized: &str) -> Result<InferenceResult> {
        let vectorizer = self
            .registry
            .vectorizer(key.language)
            .ok_or_else(|| Error::unknown_model(key.algorithm.name(), key.language.code()))?;

        let features = vectorizer.transform(normalized);
        let label = self.labels.resolve(&classifier.predict(&features));
        let confidence = classifier.confidence(&features);

        debug!(
            "Routed to {} ({} active features): {} ({:.3})",
            key,
            features.nnz(),
            label,
            confidence
        );

        Ok(InferenceResult {
            label,
            confidence,
            language: key.language,
            algorithm: key.algorithm,
        })
    }
}
