//! Router integration tests
//!
//! Artifacts are written as JSON into a temporary models directory, loaded
//! through the registry exactly as at startup, and exercised end to end.

use sentimento_classifiers::{
    ArtifactRegistry, InferenceRouter, LabelTable, LanguageDetector, RegistryConfig, RouterConfig,
    WhatlangDetector,
};
use sentimento_core::{Algorithm, Error, Language, ModelKey, Result};
use serde_json::json;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

/// Detector that always reports the same language code
struct FixedDetector(&'static str);

impl LanguageDetector for FixedDetector {
    fn detect(&self, _text: &str) -> Result<String> {
        Ok(self.0.to_string())
    }
}

fn write(dir: &Path, name: &str, value: serde_json::Value) {
    std::fs::write(dir.join(name), value.to_string()).unwrap();
}

fn write_portuguese(dir: &Path, with_nb: bool) {
    write(
        dir,
        "tfidf_pt.json",
        json!({
            "vocabulary": {"produto": 0, "excelente": 1, "recomendo": 2, "ruim": 3, "péssimo": 4},
            "idf": [1.0, 1.2, 1.1, 1.3, 1.5],
            "ngram_range": [1, 1],
            "stop_words": ["de", "o", "a"],
        }),
    );
    write(
        dir,
        "svm_model_pt.json",
        json!({
            "kind": "linear_svc",
            "classes": [0, 1],
            "coef": [[0.1, 0.5, 0.4, -0.6, -0.7]],
            "intercept": [0.0],
        }),
    );
    write(
        dir,
        "lr_model_pt.json",
        json!({
            "kind": "logistic_regression",
            "classes": [0, 1],
            "coef": [[0.2, 2.5, 1.5, -2.5, -3.0]],
            "intercept": [0.1],
        }),
    );
    if with_nb {
        write(
            dir,
            "nb_model_pt.json",
            json!({
                "kind": "multinomial_nb",
                "classes": ["Negativo", "Positivo"],
                "class_log_prior": [-0.693, -0.693],
                "feature_log_prob": [
                    [-1.6, -2.3, -2.3, -1.0, -0.9],
                    [-1.6, -0.9, -1.0, -2.3, -2.3],
                ],
            }),
        );
    }
}

fn write_spanish(dir: &Path) {
    write(
        dir,
        "tfidf_es.json",
        json!({
            "vocabulary": {"bueno": 0, "malo": 1, "excelente": 2},
            "idf": [1.0, 1.0, 1.0],
        }),
    );
    write(
        dir,
        "svm_model_es.json",
        json!({
            "kind": "linear_svc",
            "classes": [0, 1],
            "coef": [[0.7, -0.7, 0.8]],
            "intercept": [0.0],
        }),
    );
    write(
        dir,
        "nb_model_es.json",
        json!({
            "kind": "multinomial_nb",
            "classes": [0, 1],
            "class_log_prior": [-0.693, -0.693],
            "feature_log_prob": [[-1.6, -0.4, -1.6], [-0.4, -1.6, -0.4]],
        }),
    );
}

fn router(dir: &Path, detector: Arc<dyn LanguageDetector>) -> InferenceRouter {
    let (registry, report) = ArtifactRegistry::load(&RegistryConfig::with_models_dir(dir));
    assert!(!report.has_failures(), "unexpected failures: {:?}", report.failures);
    InferenceRouter::new(Arc::new(registry), detector, &RouterConfig::default()).unwrap()
}

#[test]
fn test_portuguese_svm_scenario() {
    let dir = tempfile::tempdir().unwrap();
    write_portuguese(dir.path(), true);

    // Only Portuguese is loaded, so any detection resolves to pt
    let router = router(dir.path(), Arc::new(WhatlangDetector::new()));
    let result = router.route("Produto excelente, recomendo!", "svm").unwrap();

    assert_eq!(result.language, Language::Pt);
    assert_eq!(result.algorithm, Algorithm::Svm);
    assert!(router.known_labels(Language::Pt).contains(&result.label));
    assert_eq!(result.label, "Positivo");
    assert!(result.confidence > 0.5, "confidence {}", result.confidence);
}

#[test]
fn test_english_without_artifacts_falls_back_to_default_nb() {
    let dir = tempfile::tempdir().unwrap();
    write_portuguese(dir.path(), true);
    write_spanish(dir.path());

    let router = router(dir.path(), Arc::new(FixedDetector("en")));
    let result = router.route("the worst purchase ever", "nb").unwrap();

    assert_eq!(result.language, Language::Pt);
    assert_eq!(result.algorithm, Algorithm::Nb);
    assert!(router.known_labels(Language::Pt).contains(&result.label));
}

#[test]
fn test_english_without_artifacts_and_no_default_nb() {
    let dir = tempfile::tempdir().unwrap();
    write_portuguese(dir.path(), false);
    write_spanish(dir.path());

    let router = router(dir.path(), Arc::new(FixedDetector("en")));
    match router.route("the worst purchase ever", "nb").unwrap_err() {
        Error::UnknownModel { algorithm, language } => {
            assert_eq!(algorithm, "nb");
            assert_eq!(language, "pt");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_spanish_lr_is_unknown_model() {
    let dir = tempfile::tempdir().unwrap();
    write_portuguese(dir.path(), true);
    write_spanish(dir.path());

    let router = router(dir.path(), Arc::new(FixedDetector("es")));
    let err = router.route("muy bueno", "lr").unwrap_err();

    assert!(err.is_client_error());
    assert_eq!(
        err.to_string(),
        "unknown model: no 'lr' classifier loaded for language 'es'"
    );
}

#[test]
fn test_every_registered_pair_yields_its_own_class_label() {
    let dir = tempfile::tempdir().unwrap();
    write_portuguese(dir.path(), true);
    write_spanish(dir.path());
    let (registry, _) = ArtifactRegistry::load(&RegistryConfig::with_models_dir(dir.path()));
    let registry = Arc::new(registry);

    assert_eq!(registry.model_count(), 5);

    let texts = [
        "Produto excelente, recomendo!",
        "péssimo, muito ruim",
        "bueno pero malo",
        "nada a ver",
    ];

    let table = LabelTable::default();

    for key in registry.available_models() {
        let ModelKey { algorithm, language } = key;
        let detector: Arc<dyn LanguageDetector> = Arc::new(FixedDetector(language.code()));
        let router =
            InferenceRouter::new(registry.clone(), detector, &RouterConfig::default()).unwrap();
        let labels: BTreeSet<String> = registry
            .classifier(key)
            .unwrap()
            .classes()
            .iter()
            .map(|class| table.resolve(class))
            .collect();

        for text in texts {
            let result = router.route(text, algorithm.name()).unwrap();
            assert_eq!(result.language, language);
            assert!(labels.contains(&result.label), "{} not in {:?}", result.label, labels);
            assert!((0.0..=1.0).contains(&result.confidence));
        }
    }
}

#[test]
fn test_invalid_inputs_fail_before_lookup() {
    let dir = tempfile::tempdir().unwrap();
    write_portuguese(dir.path(), true);
    let router = router(dir.path(), Arc::new(FixedDetector("pt")));

    for algorithm in ["svm", "nb", "lr", "xgboost"] {
        assert!(matches!(
            router.route("ok", algorithm),
            Err(Error::InvalidInput { .. })
        ));
        assert!(matches!(
            router.route("  a ", algorithm),
            Err(Error::InvalidInput { .. })
        ));
        assert!(matches!(
            router.route("http://x.co www.y.com", algorithm),
            Err(Error::EmptyAfterNormalization)
        ));
    }
}

#[test]
fn test_compare_covers_loaded_algorithms() {
    let dir = tempfile::tempdir().unwrap();
    write_portuguese(dir.path(), true);
    let router = router(dir.path(), Arc::new(FixedDetector("pt")));

    let results = router.compare("péssimo produto, muito ruim").unwrap();
    let algorithms: Vec<Algorithm> = results.iter().map(|r| r.algorithm).collect();

    assert_eq!(algorithms, vec![Algorithm::Svm, Algorithm::Nb, Algorithm::Lr]);
    assert!(results.iter().all(|r| r.label == "Negativo"));
}
