//! Core types for Sentimento

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Languages with trained artifacts
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Portuguese
    #[default]
    Pt,
    /// English
    En,
    /// Spanish
    Es,
}

impl Language {
    /// Every language the training pipeline produces artifacts for
    pub const ALL: [Language; 3] = [Language::Pt, Language::En, Language::Es];

    /// ISO 639-1 code used in artifact file names and responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::Pt => "pt",
            Self::En => "en",
            Self::Es => "es",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pt" => Ok(Self::Pt),
            "en" => Ok(Self::En),
            "es" => Ok(Self::Es),
            other => Err(format!("unsupported language code '{other}'")),
        }
    }
}

/// Classifier algorithm family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Linear support-vector classifier
    Svm,
    /// Multinomial naive Bayes
    Nb,
    /// Logistic regression
    Lr,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::Svm, Algorithm::Nb, Algorithm::Lr];

    /// Selector name as sent by callers
    pub fn name(&self) -> &'static str {
        match self {
            Self::Svm => "svm",
            Self::Nb => "nb",
            Self::Lr => "lr",
        }
    }

    /// Uppercased name used in responses
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Svm => "SVM",
            Self::Nb => "NB",
            Self::Lr => "LR",
        }
    }

    /// File name stem of the classifier artifact, without the language suffix
    pub fn artifact_stem(&self) -> &'static str {
        match self {
            Self::Svm => "svm_model",
            Self::Nb => "nb_model",
            Self::Lr => "lr_model",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svm" => Ok(Self::Svm),
            "nb" => Ok(Self::Nb),
            "lr" => Ok(Self::Lr),
            other => Err(format!("unsupported algorithm '{other}'")),
        }
    }
}

/// Composite key selecting one classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModelKey {
    pub algorithm: Algorithm,
    pub language: Language,
}

impl ModelKey {
    pub fn new(algorithm: Algorithm, language: Language) -> Self {
        Self { algorithm, language }
    }
}

impl fmt::Display for ModelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.algorithm, self.language)
    }
}

/// Label as stored in a classifier artifact.
///
/// Depending on how a classifier was trained its classes are either
/// strings (`"Positivo"`) or integer codes (`0`, `1`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassLabel {
    Code(i64),
    Text(String),
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "{code}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// Raw inference request as deserialized by the host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceRequest {
    /// Text to classify
    pub text: String,

    /// Algorithm selector (`svm`, `nb`, `lr`)
    pub algorithm: String,
}

impl InferenceRequest {
    pub fn new(text: impl Into<String>, algorithm: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            algorithm: algorithm.into(),
        }
    }
}

/// Result of routing one request through a classifier
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceResult {
    /// Display label
    pub label: String,

    /// Confidence score (0.0-1.0)
    pub confidence: f64,

    /// Language the classifier was selected for
    pub language: Language,

    /// Algorithm of the classifier
    pub algorithm: Algorithm,
}

/// Wire form of a successful prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub previsao: String,
    pub probabilidade: f64,
    pub idioma: String,
    pub algoritmo: String,
}

impl From<InferenceResult> for PredictionResponse {
    fn from(result: InferenceResult) -> Self {
        Self {
            previsao: result.label,
            probabilidade: result.confidence,
            idioma: result.language.code().to_string(),
            algoritmo: result.algorithm.display_name().to_string(),
        }
    }
}
