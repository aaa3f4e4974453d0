//! Classifier traits and the capability-tagged classifier handle

use crate::vectorizer::SparseVector;
use sentimento_core::ClassLabel;
use std::fmt;
use std::sync::Arc;

/// Trait for all fitted classifiers
pub trait Predictor: Send + Sync {
    /// Classes in the order the classifier scores them
    fn classes(&self) -> &[ClassLabel];

    /// Predict the label for a feature vector
    fn predict(&self, features: &SparseVector) -> ClassLabel;

    /// Expected input dimension, when the classifier knows it
    fn n_features(&self) -> Option<usize> {
        None
    }
}

/// Classifier exposing a probability distribution over its classes
pub trait ProbabilisticPredictor: Predictor {
    /// Probabilities aligned with [`Predictor::classes`]
    fn predict_proba(&self, features: &SparseVector) -> Vec<f64>;
}

/// Classifier exposing a scalar decision margin
pub trait MarginPredictor: Predictor {
    /// Signed distance of the input from the decision boundary
    fn decision_margin(&self, features: &SparseVector) -> f64;
}

/// Loaded classifier, tagged by the confidence signal it offers
#[derive(Clone)]
pub enum Classifier {
    Probabilistic(Arc<dyn ProbabilisticPredictor>),
    Margin(Arc<dyn MarginPredictor>),
    Plain(Arc<dyn Predictor>),
}

impl Classifier {
    pub fn probabilistic(predictor: impl ProbabilisticPredictor + 'static) -> Self {
        Self::Probabilistic(Arc::new(predictor))
    }

    pub fn margin(predictor: impl MarginPredictor + 'static) -> Self {
        Self::Margin(Arc::new(predictor))
    }

    pub fn plain(predictor: impl Predictor + 'static) -> Self {
        Self::Plain(Arc::new(predictor))
    }

    pub fn kind(&self) -> ClassifierKind {
        match self {
            Self::Probabilistic(_) => ClassifierKind::Probabilistic,
            Self::Margin(_) => ClassifierKind::Margin,
            Self::Plain(_) => ClassifierKind::Plain,
        }
    }

    pub fn classes(&self) -> &[ClassLabel] {
        match self {
            Self::Probabilistic(p) => p.classes(),
            Self::Margin(p) => p.classes(),
            Self::Plain(p) => p.classes(),
        }
    }

    pub fn predict(&self, features: &SparseVector) -> ClassLabel {
        match self {
            Self::Probabilistic(p) => p.predict(features),
            Self::Margin(p) => p.predict(features),
            Self::Plain(p) => p.predict(features),
        }
    }

    pub fn n_features(&self) -> Option<usize> {
        match self {
            Self::Probabilistic(p) => p.n_features(),
            Self::Margin(p) => p.n_features(),
            Self::Plain(p) => p.n_features(),
        }
    }

    /// Confidence in the prediction for `features`, see [`crate::confidence`]
    pub fn confidence(&self, features: &SparseVector) -> f64 {
        crate::confidence::confidence(self, features)
    }
}

impl fmt::Debug for Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Classifier")
            .field("kind", &self.kind())
            .field("classes", &self.classes())
            .finish()
    }
}

/// Confidence signal a classifier exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierKind {
    /// Calibrated class probabilities
    Probabilistic,
    /// Decision margin only
    Margin,
    /// Labels only
    Plain,
}

impl ClassifierKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Probabilistic => "probabilistic",
            Self::Margin => "margin",
            Self::Plain => "plain",
        }
    }
}
