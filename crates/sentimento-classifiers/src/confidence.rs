//! Confidence estimation
//!
//! Confidence is derived from whichever signal the classifier offers, in
//! priority order:
//!
//! 1. **Probabilities**: the largest class probability for the input.
//! 2. **Decision margin**: `1 / (1 + |margin|)`. This is a heuristic and
//!    not a calibrated probability: it is exactly 1.0 on the decision
//!    boundary and decays toward 0 as the margin grows in either direction.
//! 3. **Nothing**: the neutral value [`NEUTRAL_CONFIDENCE`].
//!
//! Estimation never fails; any non-finite intermediate collapses to the
//! neutral value.

use crate::classifier::Classifier;
use crate::vectorizer::SparseVector;

/// Confidence reported when a classifier exposes no usable signal
pub const NEUTRAL_CONFIDENCE: f64 = 0.5;

/// Confidence in `classifier`'s prediction for `features`, in [0, 1]
pub fn confidence(classifier: &Classifier, features: &SparseVector) -> f64 {
    let raw = match classifier {
        Classifier::Probabilistic(p) => max_probability(&p.predict_proba(features)),
        Classifier::Margin(p) => margin_confidence(p.decision_margin(features)),
        Classifier::Plain(_) => NEUTRAL_CONFIDENCE,
    };

    if raw.is_finite() {
        raw.clamp(0.0, 1.0)
    } else {
        NEUTRAL_CONFIDENCE
    }
}

/// Largest probability in a distribution; neutral for an empty one
pub fn max_probability(distribution: &[f64]) -> f64 {
    distribution
        .iter()
        .copied()
        .filter(|p| p.is_finite())
        .reduce(f64::max)
        .unwrap_or(NEUTRAL_CONFIDENCE)
}

/// Pseudo-confidence from a decision margin.
///
/// This is inverted with respect to decisiveness: a margin far from the
/// boundary yields a value near 0, and a margin of 0 yields 1.
pub fn margin_confidence(margin: f64) -> f64 {
    1.0 / (1.0 + margin.abs())
}
