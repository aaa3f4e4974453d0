//! Server configuration

use crate::cli::{Cli, Commands};
use sentimento_classifiers::EngineConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Registry, router and detector settings
    #[serde(flatten)]
    pub engine: EngineConfig,

    /// Cross-origin policy
    #[serde(default)]
    pub cors: CorsConfig,
}

impl ServerConfig {
    /// Load configuration from file, or use defaults when it does not exist
    pub fn load(config_path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let config_path = config_path.as_ref();
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            Self::from_yaml(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| anyhow::anyhow!("Invalid server configuration: {}", e))
    }

    /// Apply CLI overrides
    pub fn with_cli(mut self, cli: &Cli) -> Self {
        if let Some(models_dir) = &cli.models_dir {
            self.engine.registry.models_dir = models_dir.clone();
        }

        if let Commands::Serve { listen, port } = &cli.command {
            if let Some(listen) = listen {
                self.listen = listen.clone();
            }
            if let Some(port) = port {
                self.port = *port;
            }
        }

        self
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.listen, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            port: default_port(),
            engine: EngineConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

/// Cross-origin configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins; `*` allows any
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl CorsConfig {
    pub fn allows_any(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin == "*")
    }
}

fn default_listen() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use sentimento_core::Language;
    use std::path::PathBuf;

    #[test]
    fn test_full_yaml() {
        let yaml = r#"
listen: 127.0.0.1
port: 9090

registry:
  models_dir: /srv/models
  languages: [pt, en]

router:
  default_language: en
  min_text_chars: 5

cors:
  allowed_origins:
    - http://localhost:8080
"#;

        let config = ServerConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:9090");
        assert_eq!(config.engine.registry.models_dir, PathBuf::from("/srv/models"));
        assert_eq!(config.engine.registry.languages, vec![Language::Pt, Language::En]);
        assert_eq!(config.engine.router.default_language, Language::En);
        assert_eq!(config.engine.router.min_text_chars, 5);
        assert!(!config.cors.allows_any());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = ServerConfig::load("/nonexistent/sentimento.yaml").unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:8000");
        assert_eq!(
            config.engine.registry.models_dir,
            PathBuf::from("./microservice/models")
        );
        assert!(config.cors.allows_any());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sentimento.yaml");
        std::fs::write(&path, "port: 7000\ndetector:\n  min_confidence: 0.1\n").unwrap();

        let config = ServerConfig::load(&path).unwrap();
        assert_eq!(config.port, 7000);
        assert_eq!(config.engine.detector.min_confidence, 0.1);
    }

    #[test]
    fn test_invalid_yaml_is_rejected() {
        assert!(ServerConfig::from_yaml("port: not-a-port").is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::try_parse_from([
            "sentimento-server",
            "--models-dir",
            "/tmp/models",
            "serve",
            "--listen",
            "127.0.0.1",
            "-P",
            "3000",
        ])
        .unwrap();

        let config = ServerConfig::default().with_cli(&cli);
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.engine.registry.models_dir, PathBuf::from("/tmp/models"));
    }
}
