//! TF-IDF vectorizer artifacts and sparse feature vectors

use regex::Regex;
use sentimento_core::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use std::sync::OnceLock;

/// Sparse feature vector with entries sorted by column
#[derive(Debug, Clone, PartialEq)]
pub struct SparseVector {
    dim: usize,
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    /// Build from `(column, value)` pairs. Columns outside `dim` are dropped
    /// and duplicated columns are summed.
    pub fn new(dim: usize, entries: impl IntoIterator<Item = (usize, f64)>) -> Self {
        let mut merged = BTreeMap::new();
        for (column, value) in entries {
            if column < dim {
                *merged.entry(column).or_insert(0.0) += value;
            }
        }

        Self {
            dim,
            entries: merged.into_iter().filter(|(_, v)| *v != 0.0).collect(),
        }
    }

    /// Vector with no active features
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            entries: Vec::new(),
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    /// Number of non-zero entries
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dot product with a dense row
    pub fn dot(&self, dense: &[f64]) -> f64 {
        self.entries
            .iter()
            .filter_map(|(column, value)| dense.get(*column).map(|w| w * value))
            .sum()
    }

    /// Squared euclidean distance to a dense point
    pub fn squared_distance(&self, dense: &[f64]) -> f64 {
        let dense_norm: f64 = dense.iter().map(|c| c * c).sum();
        let cross: f64 = self
            .entries
            .iter()
            .filter_map(|(column, value)| dense.get(*column).map(|c| value * value - 2.0 * value * c))
            .sum();
        dense_norm + cross
    }

    fn normalize(&mut self, norm: Norm) {
        let magnitude = match norm {
            Norm::None => return,
            Norm::L1 => self.entries.iter().map(|(_, v)| v.abs()).sum::<f64>(),
            Norm::L2 => self.entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt(),
        };

        if magnitude > 0.0 {
            for (_, value) in &mut self.entries {
                *value /= magnitude;
            }
        }
    }
}

/// Row normalization applied after weighting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    #[default]
    L2,
    None,
}

/// Fitted TF-IDF transform exported by the training pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    /// Term (or space-joined n-gram) to column index
    vocabulary: HashMap<String, usize>,

    /// Inverse document frequency per column
    idf: Vec<f64>,

    /// Inclusive n-gram bounds
    #[serde(default = "default_ngram_range")]
    ngram_range: (usize, usize),

    /// Tokens removed before n-grams are built
    #[serde(default)]
    stop_words: HashSet<String>,

    /// Replace tf with 1 + ln(tf)
    #[serde(default)]
    sublinear_tf: bool,

    #[serde(default)]
    norm: Norm,
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn token_regex() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("Failed to compile token regex"))
}

impl TfidfVectorizer {
    /// Create a unigram vectorizer from a vocabulary and idf weights
    pub fn new(vocabulary: HashMap<String, usize>, idf: Vec<f64>) -> Result<Self> {
        let vectorizer = Self {
            vocabulary,
            idf,
            ngram_range: default_ngram_range(),
            stop_words: HashSet::new(),
            sublinear_tf: false,
            norm: Norm::default(),
        };
        vectorizer.validate()?;
        Ok(vectorizer)
    }

    /// Set n-gram bounds
    pub fn with_ngram_range(mut self, min: usize, max: usize) -> Result<Self> {
        self.ngram_range = (min, max);
        self.validate()?;
        Ok(self)
    }

    /// Set stop words
    pub fn with_stop_words<I, S>(mut self, stop_words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop_words = stop_words.into_iter().map(Into::into).collect();
        self
    }

    /// Enable sublinear term frequency
    pub fn with_sublinear_tf(mut self, enable: bool) -> Self {
        self.sublinear_tf = enable;
        self
    }

    /// Set row normalization
    pub fn with_norm(mut self, norm: Norm) -> Self {
        self.norm = norm;
        self
    }

    /// Load and validate an artifact file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let vectorizer: Self = serde_json::from_str(&content)?;
        vectorizer.validate()?;
        Ok(vectorizer)
    }

    /// Number of output columns
    pub fn dim(&self) -> usize {
        self.idf.len()
    }

    fn validate(&self) -> Result<()> {
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(sentimento_core::Error::config(format!(
                "invalid ngram_range ({min_n}, {max_n})"
            )));
        }

        if let Some((term, column)) = self.vocabulary.iter().find(|(_, c)| **c >= self.idf.len()) {
            return Err(sentimento_core::Error::config(format!(
                "term '{term}' maps to column {column} but idf has {} entries",
                self.idf.len()
            )));
        }

        if self.idf.iter().any(|w| !w.is_finite()) {
            return Err(sentimento_core::Error::config("idf contains non-finite weights"));
        }

        Ok(())
    }

    /// Transform normalized text into a weighted sparse vector
    pub fn transform(&self, text: &str) -> SparseVector {
        let tokens: Vec<&str> = token_regex()
            .find_iter(text)
            .map(|m| m.as_str())
            .filter(|token| !self.stop_words.contains(*token))
            .collect();

        let mut counts: HashMap<usize, f64> = HashMap::new();
        let (min_n, max_n) = self.ngram_range;
        for n in min_n..=max_n {
            for window in tokens.windows(n) {
                let gram = window.join(" ");
                if let Some(column) = self.vocabulary.get(&gram) {
                    *counts.entry(*column).or_insert(0.0) += 1.0;
                }
            }
        }

        let weighted = counts.into_iter().map(|(column, tf)| {
            let tf = if self.sublinear_tf { 1.0 + tf.ln() } else { tf };
            (column, tf * self.idf[column])
        });

        let mut vector = SparseVector::new(self.dim(), weighted);
        vector.normalize(self.norm);
        vector
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocabulary(terms: &[&str]) -> HashMap<String, usize> {
        terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.to_string(), i))
            .collect()
    }

    #[test]
    fn test_transform_unigrams_l2() {
        let vectorizer =
            TfidfVectorizer::new(vocabulary(&["bom", "ruim", "produto"]), vec![1.0, 1.0, 2.0])
                .unwrap();

        let vector = vectorizer.transform("produto bom bom");
        assert_eq!(vector.dim(), 3);
        assert_eq!(vector.nnz(), 2);

        // raw weights: bom = 2 * 1.0, produto = 1 * 2.0
        let expected = 2.0 / 8f64.sqrt();
        for (_, value) in vector.entries() {
            assert!((value - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_single_char_tokens_and_unknown_terms_ignored() {
        let vectorizer = TfidfVectorizer::new(vocabulary(&["bom"]), vec![1.0]).unwrap();
        assert!(vectorizer.transform("a b c xyz").is_empty());
    }

    #[test]
    fn test_bigrams_after_stop_word_removal() {
        let vectorizer = TfidfVectorizer::new(
            vocabulary(&["muito", "bom", "muito bom"]),
            vec![1.0, 1.0, 1.0],
        )
        .unwrap()
        .with_ngram_range(1, 2)
        .unwrap()
        .with_stop_words(["é"])
        .with_norm(Norm::None);

        let vector = vectorizer.transform("muito é bom");
        assert_eq!(vector.entries(), &[(0, 1.0), (1, 1.0), (2, 1.0)]);
    }

    #[test]
    fn test_sublinear_tf() {
        let vectorizer = TfidfVectorizer::new(vocabulary(&["bom"]), vec![1.0])
            .unwrap()
            .with_sublinear_tf(true)
            .with_norm(Norm::None);

        let vector = vectorizer.transform("bom bom bom");
        assert!((vector.entries()[0].1 - (1.0 + 3f64.ln())).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_out_of_range_vocabulary() {
        let err = TfidfVectorizer::new(vocabulary(&["bom", "ruim"]), vec![1.0]).unwrap_err();
        assert!(err.to_string().contains("column 1"));
    }

    #[test]
    fn test_deserialize_artifact() {
        let json = r#"{
            "vocabulary": {"ótimo": 0, "péssimo": 1},
            "idf": [1.5, 1.2],
            "ngram_range": [1, 2],
            "stop_words": ["de", "o"],
            "sublinear_tf": true,
            "norm": "l1"
        }"#;

        let vectorizer: TfidfVectorizer = serde_json::from_str(json).unwrap();
        assert_eq!(vectorizer.dim(), 2);
        assert_eq!(vectorizer.ngram_range, (1, 2));
        assert_eq!(vectorizer.norm, Norm::L1);

        let vector = vectorizer.transform("o ótimo");
        assert_eq!(vector.entries(), &[(0, 1.0)]);
    }

    #[test]
    fn test_sparse_vector_math() {
        let vector = SparseVector::new(3, [(2, 1.0), (0, 2.0), (2, 1.0), (7, 9.0)]);
        assert_eq!(vector.entries(), &[(0, 2.0), (2, 2.0)]);
        assert_eq!(vector.dot(&[1.0, 5.0, 0.5]), 3.0);
        // |(2,0,2) - (1,1,1)|^2 = 1 + 1 + 1
        assert!((vector.squared_distance(&[1.0, 1.0, 1.0]) - 3.0).abs() < 1e-12);
    }
}
