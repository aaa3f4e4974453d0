//! Text normalization applied before language detection and vectorization
//!
//! The classifiers were trained on lowercased, accent-preserving text with
//! links and punctuation removed, so every request goes through the same
//! transform before it reaches a vectorizer.

use regex::Regex;
use sentimento_core::Result;
use std::sync::OnceLock;

/// Deterministic text cleaner
pub struct TextNormalizer {
    url_regex: Regex,
    non_letter_regex: Regex,
    whitespace_regex: Regex,
}

impl TextNormalizer {
    /// Create a new normalizer
    pub fn new() -> Result<Self> {
        Ok(Self {
            url_regex: Regex::new(r"http\S+|www\S+").map_err(|e| {
                sentimento_core::Error::config(format!("Failed to compile url regex: {e}"))
            })?,
            // Combining marks are kept so decomposed accents survive
            non_letter_regex: Regex::new(r"[^\p{L}\p{M}\s]+").map_err(|e| {
                sentimento_core::Error::config(format!("Failed to compile letter regex: {e}"))
            })?,
            whitespace_regex: Regex::new(r"\s+").map_err(|e| {
                sentimento_core::Error::config(format!("Failed to compile whitespace regex: {e}"))
            })?,
        })
    }

    /// Lowercase, drop links and non-letters, collapse whitespace, trim.
    ///
    /// Links are any run starting with `http` or `www`. The output may be
    /// empty. It is a fixed point: normalizing it again returns the same
    /// string.
    pub fn normalize(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let without_urls = self.url_regex.replace_all(&lowered, "");
        let letters_only = self.non_letter_regex.replace_all(&without_urls, "");
        // Dropping punctuation can join a new link prefix, e.g. "h.ttpx"
        let letters_only = self.url_regex.replace_all(&letters_only, "");
        let collapsed = self.whitespace_regex.replace_all(&letters_only, " ");
        collapsed.trim().to_string()
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new().expect("Failed to create text normalizer")
    }
}

/// Normalize with a process-wide normalizer
pub fn normalize(text: &str) -> String {
    static NORMALIZER: OnceLock<TextNormalizer> = OnceLock::new();
    NORMALIZER.get_or_init(TextNormalizer::default).normalize(text)
}
