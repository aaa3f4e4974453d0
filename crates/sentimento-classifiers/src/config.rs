//! Configuration for artifact discovery, routing and language detection

use sentimento_core::{Algorithm, Language, ModelKey, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Configuration for the whole inference engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Where and what to probe for artifacts
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Request routing behaviour
    #[serde(default)]
    pub router: RouterConfig,

    /// Language detection tuning
    #[serde(default)]
    pub detector: DetectorConfig,
}

impl EngineConfig {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| sentimento_core::Error::config(format!("invalid engine config: {e}")))
    }

    /// Load from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }
}

/// Artifact directory layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Directory holding `tfidf_{lang}` and `{algorithm}_model_{lang}` files
    #[serde(default = "default_models_dir")]
    pub models_dir: PathBuf,

    /// Artifact file extension, without the leading dot
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Languages to probe
    #[serde(default = "default_languages")]
    pub languages: Vec<Language>,

    /// Algorithms to probe for every language
    #[serde(default = "default_algorithms")]
    pub algorithms: Vec<Algorithm>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            models_dir: default_models_dir(),
            extension: default_extension(),
            languages: default_languages(),
            algorithms: default_algorithms(),
        }
    }
}

impl RegistryConfig {
    /// Config probing every supported combination under `models_dir`
    pub fn with_models_dir(models_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
            ..Default::default()
        }
    }

    /// Path of the vectorizer artifact for a language
    pub fn vectorizer_path(&self, language: Language) -> PathBuf {
        self.models_dir
            .join(format!("tfidf_{}.{}", language.code(), self.extension))
    }

    /// Path of the classifier artifact for a model key
    pub fn classifier_path(&self, key: ModelKey) -> PathBuf {
        self.models_dir.join(format!(
            "{}_{}.{}",
            key.algorithm.artifact_stem(),
            key.language.code(),
            self.extension
        ))
    }

    /// Number of (algorithm, language) combinations probed at startup
    pub fn probe_count(&self) -> usize {
        self.languages.len() * self.algorithms.len()
    }
}

/// Routing behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Language used when detection fails or yields an unsupported code
    #[serde(default)]
    pub default_language: Language,

    /// Minimum number of characters after trimming
    #[serde(default = "default_min_text_chars")]
    pub min_text_chars: usize,

    /// Display labels for classifiers trained on integer class codes
    #[serde(default = "default_label_codes")]
    pub label_codes: BTreeMap<i64, String>,

    /// Label returned for an integer code missing from `label_codes`
    #[serde(default = "default_indeterminate_label")]
    pub indeterminate_label: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            default_language: Language::default(),
            min_text_chars: default_min_text_chars(),
            label_codes: default_label_codes(),
            indeterminate_label: default_indeterminate_label(),
        }
    }
}

/// Language detection tuning
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Detections below this confidence count as failed (0.0 disables)
    #[serde(default)]
    pub min_confidence: f64,
}

fn default_models_dir() -> PathBuf {
    PathBuf::from("./microservice/models")
}

fn default_extension() -> String {
    "json".to_string()
}

fn default_languages() -> Vec<Language> {
    Language::ALL.to_vec()
}

fn default_algorithms() -> Vec<Algorithm> {
    Algorithm::ALL.to_vec()
}

fn default_min_text_chars() -> usize {
    3
}

fn default_label_codes() -> BTreeMap<i64, String> {
    BTreeMap::from([(0, "Negativo".to_string()), (1, "Positivo".to_string())])
}

fn default_indeterminate_label() -> String {
    "Indeterminado".to_string()
}
