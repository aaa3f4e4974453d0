//! Artifact registry initialization
//!
//! The registry is built once at startup by probing the deterministic
//! artifact paths of every configured (language, algorithm) pair. Loading is
//! best-effort per pair: missing files are skipped silently, corrupt files
//! are recorded in the [`LoadReport`] and never abort the other pairs.

use crate::classifier::Classifier;
use crate::config::RegistryConfig;
use crate::models::ClassifierArtifact;
use crate::vectorizer::TfidfVectorizer;
use sentimento_core::{Algorithm, ClassLabel, Language, ModelKey};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Immutable set of loaded vectorizers and classifiers
#[derive(Debug, Default)]
pub struct ArtifactRegistry {
    vectorizers: HashMap<Language, Arc<TfidfVectorizer>>,
    classifiers: BTreeMap<ModelKey, Classifier>,
    labels: HashMap<Language, Vec<ClassLabel>>,
}

impl ArtifactRegistry {
    /// Probe `config.models_dir` and load every complete artifact pair
    pub fn load(config: &RegistryConfig) -> (Self, LoadReport) {
        info!(
            "Initializing model registry from {:?} ({} combinations)",
            config.models_dir,
            config.probe_count()
        );

        let mut builder = RegistryBuilder::new();
        for language in &config.languages {
            builder.probe_language(config, *language);
        }

        let (registry, report) = builder.build();
        info!(
            "Model registry initialized with {}/{} models",
            registry.model_count(),
            config.probe_count()
        );
        (registry, report)
    }

    /// Registry with nothing loaded
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Vectorizer shared by every algorithm of a language
    pub fn vectorizer(&self, language: Language) -> Option<&TfidfVectorizer> {
        self.vectorizers.get(&language).map(Arc::as_ref)
    }

    pub fn classifier(&self, key: ModelKey) -> Option<&Classifier> {
        self.classifiers.get(&key)
    }

    pub fn contains(&self, key: ModelKey) -> bool {
        self.classifiers.contains_key(&key)
    }

    /// Raw classes known for a language, across its classifiers
    pub fn labels(&self, language: Language) -> &[ClassLabel] {
        self.labels.get(&language).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.classifiers.is_empty()
    }

    pub fn model_count(&self) -> usize {
        self.classifiers.len()
    }

    /// Usable (algorithm, language) pairs, sorted
    pub fn available_models(&self) -> Vec<ModelKey> {
        self.classifiers.keys().copied().collect()
    }

    /// Algorithms loaded for a language, sorted
    pub fn algorithms_for(&self, language: Language) -> Vec<Algorithm> {
        self.classifiers
            .keys()
            .filter(|key| key.language == language)
            .map(|key| key.algorithm)
            .collect()
    }
}

/// Accumulating builder; only successful pairs are merged
#[derive(Default)]
pub struct RegistryBuilder {
    vectorizers: HashMap<Language, Arc<TfidfVectorizer>>,
    classifiers: BTreeMap<ModelKey, (Classifier, Option<PathBuf>)>,
    report: LoadReport,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an in-memory vectorizer
    pub fn with_vectorizer(mut self, language: Language, vectorizer: TfidfVectorizer) -> Self {
        self.vectorizers.insert(language, Arc::new(vectorizer));
        self
    }

    /// Register an in-memory classifier
    pub fn with_classifier(mut self, key: ModelKey, classifier: Classifier) -> Self {
        self.classifiers.insert(key, (classifier, None));
        self
    }

    fn probe_language(&mut self, config: &RegistryConfig, language: Language) {
        let vectorizer_path = config.vectorizer_path(language);
        let mut present = Vec::new();

        for algorithm in &config.algorithms {
            let key = ModelKey::new(*algorithm, language);
            let path = config.classifier_path(key);
            if path.is_file() {
                present.push((key, path));
            } else {
                debug!("Skipping {}: {:?} not found", key, path);
                self.report.skipped.push(key);
            }
        }

        if present.is_empty() {
            return;
        }

        if !vectorizer_path.is_file() {
            debug!("Skipping language '{}': {:?} not found", language, vectorizer_path);
            self.report.skipped.extend(present.into_iter().map(|(key, _)| key));
            return;
        }

        let vectorizer = match TfidfVectorizer::from_file(&vectorizer_path) {
            Ok(vectorizer) => vectorizer,
            Err(e) => {
                for (key, _) in &present {
                    self.report.record(Some(*key), &vectorizer_path, e.to_string());
                }
                return;
            }
        };
        self.vectorizers.insert(language, Arc::new(vectorizer));

        for (key, path) in present {
            match ClassifierArtifact::from_file(&path) {
                Ok(artifact) => {
                    self.classifiers
                        .insert(key, (artifact.into_classifier(), Some(path)));
                }
                Err(e) => self.report.record(Some(key), &path, e.to_string()),
            }
        }
    }

    /// Check every classifier against its language's vectorizer and freeze
    pub fn build(mut self) -> (ArtifactRegistry, LoadReport) {
        let mut classifiers = BTreeMap::new();
        let mut labels: HashMap<Language, Vec<ClassLabel>> = HashMap::new();

        for (key, (classifier, path)) in std::mem::take(&mut self.classifiers) {
            let source = path.unwrap_or_else(|| PathBuf::from(format!("<memory>/{key}")));

            let Some(vectorizer) = self.vectorizers.get(&key.language) else {
                self.report.record(
                    Some(key),
                    &source,
                    format!("no vectorizer registered for language '{}'", key.language),
                );
                continue;
            };

            if let Some(n_features) = classifier.n_features() {
                if n_features != vectorizer.dim() {
                    self.report.record(
                        Some(key),
                        &source,
                        format!(
                            "classifier expects {} features but tfidf_{} produces {}",
                            n_features,
                            key.language,
                            vectorizer.dim()
                        ),
                    );
                    continue;
                }
            }

            let known = labels.entry(key.language).or_default();
            for class in classifier.classes() {
                if !known.contains(class) {
                    known.push(class.clone());
                }
            }

            info!("✓ Loaded model: {} ({})", key, classifier.kind().name());
            self.report.loaded.push(key);
            classifiers.insert(key, classifier);
        }

        // Vectorizers without any classifier serve no request
        self.vectorizers
            .retain(|language, _| classifiers.keys().any(|key| key.language == *language));

        let registry = ArtifactRegistry {
            vectorizers: self.vectorizers,
            classifiers,
            labels,
        };
        (registry, self.report)
    }
}

/// Outcome of registry construction
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    /// Pairs registered
    pub loaded: Vec<ModelKey>,

    /// Pairs with at least one artifact file absent
    pub skipped: Vec<ModelKey>,

    /// Present artifacts that failed to load
    pub failures: Vec<LoadFailure>,
}

impl LoadReport {
    fn record(&mut self, key: Option<ModelKey>, path: &Path, reason: String) {
        let error = sentimento_core::Error::artifact_load(path, reason.clone());
        match key {
            Some(key) => warn!("✗ Failed to load model {}: {}", key, error),
            None => warn!("✗ {}", error),
        }

        self.failures.push(LoadFailure {
            key,
            path: path.to_path_buf(),
            reason,
        });
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// One artifact that was present but unusable
#[derive(Debug, Clone, Serialize)]
pub struct LoadFailure {
    pub key: Option<ModelKey>,
    pub path: PathBuf,
    pub reason: String,
}

impl LoadFailure {
    pub fn to_error(&self) -> sentimento_core::Error {
        sentimento_core::Error::artifact_load(&self.path, &self.reason)
    }
}
