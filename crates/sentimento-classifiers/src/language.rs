//! Language identification with fallback to a default language

use sentimento_core::{Language, Result};
use std::sync::Arc;
use tracing::debug;

/// External language-detection capability
pub trait LanguageDetector: Send + Sync {
    /// Detect the language of `text`, returning a language code.
    ///
    /// Codes outside the supported set are allowed; the identifier maps
    /// them onto the default language.
    fn detect(&self, text: &str) -> Result<String>;
}

/// Detector backed by the `whatlang` trigram models.
///
/// Detection is restricted to the supported languages, so short reviews are
/// not attributed to languages that happen to share trigrams with them.
pub struct WhatlangDetector {
    detector: whatlang::Detector,
    min_confidence: f64,
}

impl WhatlangDetector {
    pub fn new() -> Self {
        let allowlist = Language::ALL.iter().copied().map(whatlang_lang).collect();
        Self {
            detector: whatlang::Detector::with_allowlist(allowlist),
            min_confidence: 0.0,
        }
    }

    /// Treat detections below `min_confidence` as failures
    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence;
        self
    }
}

impl Default for WhatlangDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str) -> Result<String> {
        let info = self
            .detector
            .detect(text)
            .ok_or_else(|| sentimento_core::Error::detection("no language detected"))?;

        if info.confidence() < self.min_confidence {
            return Err(sentimento_core::Error::detection(format!(
                "confidence {:.2} for '{}' below {:.2}",
                info.confidence(),
                info.lang().code(),
                self.min_confidence
            )));
        }

        Ok(iso_639_1(info.lang()).to_string())
    }
}

fn whatlang_lang(language: Language) -> whatlang::Lang {
    match language {
        Language::Pt => whatlang::Lang::Por,
        Language::En => whatlang::Lang::Eng,
        Language::Es => whatlang::Lang::Spa,
    }
}

/// Two-letter code for supported languages, ISO 639-3 for the rest
fn iso_639_1(lang: whatlang::Lang) -> &'static str {
    match lang {
        whatlang::Lang::Por => "pt",
        whatlang::Lang::Eng => "en",
        whatlang::Lang::Spa => "es",
        other => other.code(),
    }
}

/// Maps detector output onto the supported languages
#[derive(Clone)]
pub struct LanguageIdentifier {
    detector: Arc<dyn LanguageDetector>,
    default_language: Language,
}

impl LanguageIdentifier {
    pub fn new(detector: Arc<dyn LanguageDetector>, default_language: Language) -> Self {
        Self {
            detector,
            default_language,
        }
    }

    /// Language used whenever detection cannot be trusted
    pub fn default_language(&self) -> Language {
        self.default_language
    }

    /// Resolve the language of already-normalized text. Never fails.
    pub fn identify(&self, text: &str) -> Language {
        match self.detector.detect(text) {
            Ok(code) => match code.parse::<Language>() {
                Ok(language) => language,
                Err(_) => {
                    debug!(
                        "Detected unsupported language '{}', using default '{}'",
                        code, self.default_language
                    );
                    self.default_language
                }
            },
            Err(e) => {
                debug!("{}, using default '{}'", e, self.default_language);
                self.default_language
            }
        }
    }
}
