//! Shared application state

use metrics_exporter_prometheus::PrometheusHandle;
use sentimento_classifiers::{ArtifactRegistry, EngineConfig, InferenceRouter, LoadReport};
use std::sync::Arc;
use tracing::{info, warn};

/// State shared by every request handler
#[derive(Clone)]
pub struct AppState {
    /// Router over the read-only artifact registry
    pub router: Arc<InferenceRouter>,

    /// Outcome of artifact loading at startup
    pub load_report: Arc<LoadReport>,

    /// Prometheus metrics handle for rendering
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(router: InferenceRouter, load_report: LoadReport) -> Self {
        Self {
            router: Arc::new(router),
            load_report: Arc::new(load_report),
            metrics_handle: None,
        }
    }

    /// Load the registry and build the router
    pub fn from_config(config: &EngineConfig) -> sentimento_core::Result<Self> {
        let (registry, load_report) = ArtifactRegistry::load(&config.registry);

        if registry.is_empty() {
            warn!(
                "No models loaded from {:?}; predictions will fail until artifacts are deployed",
                config.registry.models_dir
            );
        } else {
            info!("Available models: {}", format_models(&registry));
        }
        metrics::gauge!("sentimento_models_loaded").set(registry.model_count() as f64);

        let router = InferenceRouter::from_config(Arc::new(registry), config)?;
        Ok(Self::new(router, load_report))
    }

    pub fn with_metrics_handle(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }
}

fn format_models(registry: &ArtifactRegistry) -> String {
    registry
        .available_models()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
