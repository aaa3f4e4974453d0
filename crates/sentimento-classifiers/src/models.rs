//! Linear classifier artifacts exported by the training pipeline
//!
//! Every artifact is a JSON document tagged by `kind`:
//!
//! | kind                  | confidence signal | algorithm slot |
//! |-----------------------|-------------------|----------------|
//! | `multinomial_nb`      | probabilities     | `nb`           |
//! | `logistic_regression` | probabilities     | `lr`           |
//! | `linear_svc`          | decision margin   | `svm`          |
//! | `nearest_centroid`    | none              | any            |

use crate::classifier::{Classifier, MarginPredictor, Predictor, ProbabilisticPredictor};
use crate::vectorizer::SparseVector;
use sentimento_core::{ClassLabel, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Serialized classifier of any supported family
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    MultinomialNb(MultinomialNb),
    LogisticRegression(LogisticRegression),
    LinearSvc(LinearSvc),
    NearestCentroid(NearestCentroid),
}

impl ClassifierArtifact {
    /// Load and validate an artifact file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let artifact: Self = serde_json::from_str(&content)?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Check shapes and weights
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::MultinomialNb(m) => m.validate(),
            Self::LogisticRegression(m) => m.weights.validate("logistic_regression"),
            Self::LinearSvc(m) => m.weights.validate("linear_svc"),
            Self::NearestCentroid(m) => m.validate(),
        }
    }

    /// Wrap into a classifier tagged with its confidence signal
    pub fn into_classifier(self) -> Classifier {
        match self {
            Self::MultinomialNb(m) => Classifier::probabilistic(m),
            Self::LogisticRegression(m) => Classifier::probabilistic(m),
            Self::LinearSvc(m) => Classifier::margin(m),
            Self::NearestCentroid(m) => Classifier::plain(m),
        }
    }
}

/// Multinomial naive Bayes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultinomialNb {
    pub classes: Vec<ClassLabel>,
    pub class_log_prior: Vec<f64>,
    /// One row of per-feature log probabilities per class
    pub feature_log_prob: Vec<Vec<f64>>,
}

impl MultinomialNb {
    fn validate(&self) -> Result<()> {
        check_classes("multinomial_nb", &self.classes)?;
        check_len("multinomial_nb", "class_log_prior", self.class_log_prior.len(), self.classes.len())?;
        check_len("multinomial_nb", "feature_log_prob rows", self.feature_log_prob.len(), self.classes.len())?;
        check_matrix("multinomial_nb", "feature_log_prob", &self.feature_log_prob)?;
        check_finite("multinomial_nb", "class_log_prior", &self.class_log_prior)
    }

    fn joint_log_likelihood(&self, features: &SparseVector) -> Vec<f64> {
        self.feature_log_prob
            .iter()
            .zip(&self.class_log_prior)
            .map(|(row, prior)| prior + features.dot(row))
            .collect()
    }
}

impl Predictor for MultinomialNb {
    fn classes(&self) -> &[ClassLabel] {
        &self.classes
    }

    fn predict(&self, features: &SparseVector) -> ClassLabel {
        self.classes[argmax(&self.joint_log_likelihood(features))].clone()
    }

    fn n_features(&self) -> Option<usize> {
        self.feature_log_prob.first().map(Vec::len)
    }
}

impl ProbabilisticPredictor for MultinomialNb {
    fn predict_proba(&self, features: &SparseVector) -> Vec<f64> {
        softmax(&self.joint_log_likelihood(features))
    }
}

/// Dense linear decision functions shared by logistic regression and SVC.
///
/// Binary models carry a single row scoring the second class; multi-class
/// models carry one row per class (one-vs-rest).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearWeights {
    pub classes: Vec<ClassLabel>,
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
}

impl LinearWeights {
    fn validate(&self, kind: &str) -> Result<()> {
        check_classes(kind, &self.classes)?;
        let expected_rows = if self.classes.len() == 2 { 1 } else { self.classes.len() };
        check_len(kind, "coef rows", self.coef.len(), expected_rows)?;
        check_len(kind, "intercept", self.intercept.len(), expected_rows)?;
        check_matrix(kind, "coef", &self.coef)?;
        check_finite(kind, "intercept", &self.intercept)
    }

    fn is_binary(&self) -> bool {
        self.coef.len() == 1
    }

    fn scores(&self, features: &SparseVector) -> Vec<f64> {
        self.coef
            .iter()
            .zip(&self.intercept)
            .map(|(row, bias)| features.dot(row) + bias)
            .collect()
    }

    fn predict_index(&self, scores: &[f64]) -> usize {
        if self.is_binary() {
            usize::from(scores[0] > 0.0)
        } else {
            argmax(scores)
        }
    }

    fn n_features(&self) -> Option<usize> {
        self.coef.first().map(Vec::len)
    }
}

/// Logistic regression
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    #[serde(flatten)]
    pub weights: LinearWeights,
}

impl Predictor for LogisticRegression {
    fn classes(&self) -> &[ClassLabel] {
        &self.weights.classes
    }

    fn predict(&self, features: &SparseVector) -> ClassLabel {
        let scores = self.weights.scores(features);
        self.weights.classes[self.weights.predict_index(&scores)].clone()
    }

    fn n_features(&self) -> Option<usize> {
        self.weights.n_features()
    }
}

impl ProbabilisticPredictor for LogisticRegression {
    fn predict_proba(&self, features: &SparseVector) -> Vec<f64> {
        let scores = self.weights.scores(features);
        if self.weights.is_binary() {
            let positive = sigmoid(scores[0]);
            vec![1.0 - positive, positive]
        } else {
            softmax(&scores)
        }
    }
}

/// Linear support-vector classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearSvc {
    #[serde(flatten)]
    pub weights: LinearWeights,
}

impl Predictor for LinearSvc {
    fn classes(&self) -> &[ClassLabel] {
        &self.weights.classes
    }

    fn predict(&self, features: &SparseVector) -> ClassLabel {
        let scores = self.weights.scores(features);
        self.weights.classes[self.weights.predict_index(&scores)].clone()
    }

    fn n_features(&self) -> Option<usize> {
        self.weights.n_features()
    }
}

impl MarginPredictor for LinearSvc {
    /// Binary: the signed decision value. Multi-class: the winning
    /// class's decision value.
    fn decision_margin(&self, features: &SparseVector) -> f64 {
        let scores = self.weights.scores(features);
        if self.weights.is_binary() {
            scores[0]
        } else {
            scores[argmax(&scores)]
        }
    }
}

/// Nearest centroid; offers neither probabilities nor margins
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearestCentroid {
    pub classes: Vec<ClassLabel>,
    pub centroids: Vec<Vec<f64>>,
}

impl NearestCentroid {
    fn validate(&self) -> Result<()> {
        check_classes("nearest_centroid", &self.classes)?;
        check_len("nearest_centroid", "centroids", self.centroids.len(), self.classes.len())?;
        check_matrix("nearest_centroid", "centroids", &self.centroids)
    }
}

impl Predictor for NearestCentroid {
    fn classes(&self) -> &[ClassLabel] {
        &self.classes
    }

    fn predict(&self, features: &SparseVector) -> ClassLabel {
        let negated: Vec<f64> = self
            .centroids
            .iter()
            .map(|centroid| -features.squared_distance(centroid))
            .collect();
        self.classes[argmax(&negated)].clone()
    }

    fn n_features(&self) -> Option<usize> {
        self.centroids.first().map(Vec::len)
    }
}

/// Index of the largest value; ties resolve to the first
fn argmax(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(best, best_value), (i, v)| {
            if *v > best_value {
                (i, *v)
            } else {
                (best, best_value)
            }
        })
        .0
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn check_classes(kind: &str, classes: &[ClassLabel]) -> Result<()> {
    if classes.len() < 2 {
        return Err(sentimento_core::Error::config(format!(
            "{kind}: expected at least 2 classes, got {}",
            classes.len()
        )));
    }
    Ok(())
}

fn check_len(kind: &str, field: &str, actual: usize, expected: usize) -> Result<()> {
    if actual != expected {
        return Err(sentimento_core::Error::config(format!(
            "{kind}: {field} has length {actual}, expected {expected}"
        )));
    }
    Ok(())
}

fn check_matrix(kind: &str, field: &str, rows: &[Vec<f64>]) -> Result<()> {
    let width = rows.first().map(Vec::len).unwrap_or(0);
    if rows.iter().any(|row| row.len() != width) {
        return Err(sentimento_core::Error::config(format!(
            "{kind}: {field} rows have different lengths"
        )));
    }
    for row in rows {
        check_finite(kind, field, row)?;
    }
    Ok(())
}

fn check_finite(kind: &str, field: &str, values: &[f64]) -> Result<()> {
    if values.iter().any(|v| !v.is_finite()) {
        return Err(sentimento_core::Error::config(format!(
            "{kind}: {field} contains non-finite values"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ClassifierKind;

    fn text(labels: &[&str]) -> Vec<ClassLabel> {
        labels.iter().map(|l| ClassLabel::Text(l.to_string())).collect()
    }

    #[test]
    fn test_multinomial_nb_predicts_and_sums_to_one() {
        let nb = MultinomialNb {
            classes: text(&["Negativo", "Positivo"]),
            class_log_prior: vec![0.5f64.ln(), 0.5f64.ln()],
            feature_log_prob: vec![
                vec![0.8f64.ln(), 0.2f64.ln()],
                vec![0.2f64.ln(), 0.8f64.ln()],
            ],
        };

        let good = SparseVector::new(2, [(1, 1.0)]);
        assert_eq!(nb.predict(&good), ClassLabel::Text("Positivo".to_string()));

        let proba = nb.predict_proba(&good);
        assert!((proba.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(proba[1] > proba[0]);
    }

    #[test]
    fn test_binary_logistic_regression() {
        let lr = LogisticRegression {
            weights: LinearWeights {
                classes: vec![ClassLabel::Code(0), ClassLabel::Code(1)],
                coef: vec![vec![-2.0, 2.0]],
                intercept: vec![0.0],
            },
        };

        let bad = SparseVector::new(2, [(0, 1.0)]);
        assert_eq!(lr.predict(&bad), ClassLabel::Code(0));

        let proba = lr.predict_proba(&bad);
        assert!((proba[0] - sigmoid(2.0)).abs() < 1e-12);
        assert!((proba[0] + proba[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_multiclass_logistic_regression_softmax() {
        let lr = LogisticRegression {
            weights: LinearWeights {
                classes: text(&["negative", "neutral", "positive"]),
                coef: vec![vec![1.0, 0.0], vec![0.0, 0.0], vec![0.0, 1.0]],
                intercept: vec![0.0, 0.1, 0.0],
            },
        };

        let x = SparseVector::new(2, [(1, 1.0)]);
        assert_eq!(lr.predict(&x), ClassLabel::Text("positive".to_string()));
        let proba = lr.predict_proba(&x);
        assert_eq!(proba.len(), 3);
        assert!((proba.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_linear_svc_margins() {
        let binary = LinearSvc {
            weights: LinearWeights {
                classes: text(&["Negativo", "Positivo"]),
                coef: vec![vec![-1.0, 1.0]],
                intercept: vec![0.25],
            },
        };

        let x = SparseVector::new(2, [(0, 1.0)]);
        assert_eq!(binary.decision_margin(&x), -0.75);
        assert_eq!(binary.predict(&x), ClassLabel::Text("Negativo".to_string()));

        let multi = LinearSvc {
            weights: LinearWeights {
                classes: text(&["a", "b", "c"]),
                coef: vec![vec![0.1, 0.0], vec![0.0, 0.6], vec![0.3, 0.0]],
                intercept: vec![0.0, 0.0, 0.0],
            },
        };
        let y = SparseVector::new(2, [(0, 1.0), (1, 1.0)]);
        assert_eq!(multi.predict(&y), ClassLabel::Text("b".to_string()));
        assert!((multi.decision_margin(&y) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_nearest_centroid() {
        let nc = NearestCentroid {
            classes: text(&["Negativo", "Positivo"]),
            centroids: vec![vec![1.0, 0.0], vec![0.0, 1.0]],
        };

        assert_eq!(
            nc.predict(&SparseVector::new(2, [(1, 0.9)])),
            ClassLabel::Text("Positivo".to_string())
        );
    }

    #[test]
    fn test_artifact_kinds() {
        let json = r#"{
            "kind": "linear_svc",
            "classes": ["Negativo", "Positivo"],
            "coef": [[0.5, -0.5]],
            "intercept": [0.0]
        }"#;

        let artifact: ClassifierArtifact = serde_json::from_str(json).unwrap();
        artifact.validate().unwrap();
        let classifier = artifact.into_classifier();
        assert_eq!(classifier.kind(), ClassifierKind::Margin);
        assert_eq!(classifier.n_features(), Some(2));

        let json = r#"{
            "kind": "nearest_centroid",
            "classes": [0, 1],
            "centroids": [[0.0], [1.0]]
        }"#;
        let artifact: ClassifierArtifact = serde_json::from_str(json).unwrap();
        assert_eq!(artifact.into_classifier().kind(), ClassifierKind::Plain);
    }

    #[test]
    fn test_validation_rejects_bad_shapes() {
        let ragged = ClassifierArtifact::MultinomialNb(MultinomialNb {
            classes: text(&["a", "b"]),
            class_log_prior: vec![-0.7, -0.7],
            feature_log_prob: vec![vec![-1.0, -1.0], vec![-1.0]],
        });
        assert!(ragged.validate().is_err());

        let single_class = ClassifierArtifact::LinearSvc(LinearSvc {
            weights: LinearWeights {
                classes: text(&["only"]),
                coef: vec![vec![1.0]],
                intercept: vec![0.0],
            },
        });
        assert!(single_class.validate().is_err());

        let wrong_rows = ClassifierArtifact::LogisticRegression(LogisticRegression {
            weights: LinearWeights {
                classes: text(&["a", "b", "c"]),
                coef: vec![vec![1.0]],
                intercept: vec![0.0],
            },
        });
        let err = wrong_rows.validate().unwrap_err();
        assert!(err.to_string().contains("coef rows"));
    }

    #[test]
    fn test_argmax_ties_pick_first() {
        assert_eq!(argmax(&[1.0, 3.0, 3.0]), 1);
        assert_eq!(argmax(&[f64::NAN, 0.5]), 1);
    }
}
