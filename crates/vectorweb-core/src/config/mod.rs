use crate::error::{Result, VectorWebError};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VectorWebConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Where the search service lives and how long to wait for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Deadline for `POST /search`. Extraction and indexing happen inside
    /// that call, so this is generous.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_health_timeout_secs")]
    pub health_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            health_timeout_secs: default_health_timeout_secs(),
        }
    }
}

impl ServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_secs(self.health_timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    /// Artificial latency before a preview result set is shown.
    #[serde(default = "default_mock_delay_ms")]
    pub mock_delay_ms: u64,
    /// Pre-filled URL in the interactive form.
    #[serde(default = "default_url")]
    pub default_url: String,
    /// Pre-filled query in the interactive form.
    #[serde(default = "default_query")]
    pub default_query: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            mock_delay_ms: default_mock_delay_ms(),
            default_url: default_url(),
            default_query: default_query(),
        }
    }
}

impl SearchConfig {
    pub fn mock_delay(&self) -> Duration {
        Duration::from_millis(self.mock_delay_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// How long the "Copied!" confirmation stays visible.
    #[serde(default = "default_copy_feedback_ms")]
    pub copy_feedback_ms: u64,
    /// Event poll interval of the terminal UI.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            copy_feedback_ms: default_copy_feedback_ms(),
            tick_ms: default_tick_ms(),
        }
    }
}

impl UiConfig {
    pub fn copy_feedback(&self) -> Duration {
        Duration::from_millis(self.copy_feedback_ms)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

// -- Defaults --

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_health_timeout_secs() -> u64 {
    5
}
fn default_limit() -> usize {
    crate::model::DEFAULT_LIMIT
}
fn default_mock_delay_ms() -> u64 {
    1500
}
fn default_url() -> String {
    "https://en.wikipedia.org/wiki/Artificial_intelligence".to_string()
}
fn default_query() -> String {
    "machine learning history".to_string()
}
fn default_copy_feedback_ms() -> u64 {
    2000
}
fn default_tick_ms() -> u64 {
    50
}

/// Prefix for environment overrides, e.g. `VECTORWEB__SERVICE__BASE_URL`.
pub const ENV_PREFIX: &str = "VECTORWEB";

impl VectorWebConfig {
    /// Load configuration with layered merge:
    /// 1. ~/.config/vectorweb/config.toml (global)
    /// 2. .vectorweb/config.toml (project)
    /// 3. .vectorweb/config.local.toml (local, gitignored)
    /// 4. `VECTORWEB__<SECTION>__<KEY>` environment variables
    pub fn load(project_dir: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        // Layer 1: Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                builder = builder.add_source(File::from(global_path).required(false));
            }
        }

        // Layer 2: Project config
        if let Some(dir) = project_dir {
            let project_config = dir.join(".vectorweb").join("config.toml");
            if project_config.exists() {
                builder = builder.add_source(File::from(project_config).required(false));
            }

            // Layer 3: Local config (gitignored)
            let local_config = dir.join(".vectorweb").join("config.local.toml");
            if local_config.exists() {
                builder = builder.add_source(File::from(local_config).required(false));
            }
        }

        // Layer 4: Environment
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| VectorWebError::Config(e.to_string()))?;

        let mut cfg: Self = config
            .try_deserialize()
            .map_err(|e| VectorWebError::Config(e.to_string()))?;

        cfg.validate();
        Ok(cfg)
    }

    /// Load with defaults only (no files).
    pub fn default_config() -> Self {
        Self::default()
    }

    /// Validate config values, fixing out-of-range values and logging warnings.
    /// Lenient: out-of-range values are repaired, never rejected.
    pub fn validate(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();

        let trimmed = self.service.base_url.trim().trim_end_matches('/').to_string();
        if trimmed.is_empty() {
            warnings.push(format!(
                "service.base_url is empty, using {}",
                default_base_url()
            ));
            self.service.base_url = default_base_url();
        } else if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            warnings.push(format!(
                "service.base_url '{trimmed}' has no http(s) scheme, assuming http://"
            ));
            self.service.base_url = format!("http://{trimmed}");
        } else {
            self.service.base_url = trimmed;
        }

        // Positive integer checks
        if self.service.timeout_secs == 0 {
            warnings.push("service.timeout_secs = 0, setting to 1".to_string());
            self.service.timeout_secs = 1;
        }
        if self.service.health_timeout_secs == 0 {
            warnings.push("service.health_timeout_secs = 0, setting to 1".to_string());
            self.service.health_timeout_secs = 1;
        }
        if self.search.default_limit == 0 {
            warnings.push("search.default_limit = 0, setting to 1".to_string());
            self.search.default_limit = 1;
        }
        if self.ui.tick_ms == 0 {
            warnings.push("ui.tick_ms = 0, setting to 10".to_string());
            self.ui.tick_ms = 10;
        }

        for w in &warnings {
            tracing::warn!("config: {}", w);
        }

        warnings
    }
}

fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("vectorweb").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = VectorWebConfig::default_config();
        assert_eq!(config.service.base_url, "http://localhost:8000");
        assert_eq!(config.service.timeout_secs, 30);
        assert_eq!(config.search.default_limit, 10);
        assert_eq!(config.search.mock_delay_ms, 1500);
        assert_eq!(config.ui.copy_feedback_ms, 2000);
        assert_eq!(config.search.mock_delay(), Duration::from_millis(1500));
        assert_eq!(config.ui.copy_feedback(), Duration::from_secs(2));
    }

    #[test]
    fn test_load_config_no_files() {
        // Loading with a non-existent directory should give defaults
        let config = VectorWebConfig::load(Some(Path::new("/nonexistent/path"))).unwrap();
        assert_eq!(config.search.default_limit, 10);
        assert_eq!(config.ui.tick_ms, 50);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = VectorWebConfig::default_config();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: VectorWebConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.service.base_url, config.service.base_url);
        assert_eq!(parsed.search.mock_delay_ms, config.search.mock_delay_ms);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let toml_str = r#"
[service]
base_url = "http://search.internal:9000"
"#;
        let config: VectorWebConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.service.base_url, "http://search.internal:9000");
        assert_eq!(config.service.timeout_secs, 30);
        assert_eq!(config.search.default_limit, 10);
        assert_eq!(config.ui.copy_feedback_ms, 2000);
    }

    #[test]
    fn test_validate_repairs_values() {
        let mut config = VectorWebConfig::default_config();
        config.service.base_url = "localhost:8000/".into();
        config.service.timeout_secs = 0;
        config.search.default_limit = 0;

        let warnings = config.validate();
        assert_eq!(warnings.len(), 3);
        assert_eq!(config.service.base_url, "http://localhost:8000");
        assert_eq!(config.service.timeout_secs, 1);
        assert_eq!(config.search.default_limit, 1);
    }

    #[test]
    fn test_validate_strips_trailing_slash() {
        let mut config = VectorWebConfig::default_config();
        config.service.base_url = "https://api.example.com/".into();
        assert!(config.validate().is_empty());
        assert_eq!(config.service.base_url, "https://api.example.com");
    }

    #[test]
    fn test_validate_clean_config_has_no_warnings() {
        let mut config = VectorWebConfig::default_config();
        assert!(config.validate().is_empty());
    }
}
