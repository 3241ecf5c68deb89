use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Memory,
    #[default]
    File,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: Backend,
    #[serde(default = "default_storage_path")]
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { backend: Backend::File, path: default_storage_path() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
    /// Fallback directive when `RUST_LOG` is unset.
    #[serde(default)]
    pub filter: Option<String>,
}

fn default_storage_path() -> String { "data/local_storage.json".into() }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    load_from_str(&content)
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.storage.normalize_from_env();
        self.storage.validate()?;
        self.logging.normalize();
        Ok(())
    }
}

impl StorageConfig {
    /// `LOCAL_STORE_PATH` wins over the file so one binary can target several stores.
    pub fn normalize_from_env(&mut self) {
        if let Ok(path) = std::env::var("LOCAL_STORE_PATH") {
            if !path.trim().is_empty() {
                self.path = path;
            }
        }
        self.path = self.path.trim().to_string();
    }

    pub fn validate(&self) -> Result<()> {
        if self.backend == Backend::File && self.path.is_empty() {
            return Err(anyhow!("storage.path is empty; set it in config.toml or LOCAL_STORE_PATH"));
        }
        if self.backend == Backend::File && self.path.ends_with('/') {
            return Err(anyhow!("storage.path must name a file, got directory {}", self.path));
        }
        Ok(())
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if matches!(self.filter.as_deref(), Some(f) if f.trim().is_empty()) {
            self.filter = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() -> Result<()> {
        let cfg = load_from_str("")?;
        assert_eq!(cfg.storage.backend, Backend::File);
        assert_eq!(cfg.storage.path, "data/local_storage.json");
        assert_eq!(cfg.logging.format, LogFormat::Compact);
        assert!(cfg.logging.filter.is_none());
        Ok(())
    }

    #[test]
    fn parses_sections() -> Result<()> {
        let cfg = load_from_str(
            r#"
            [storage]
            backend = "memory"

            [logging]
            format = "json"
            filter = "debug"
            "#,
        )?;
        assert_eq!(cfg.storage.backend, Backend::Memory);
        assert_eq!(cfg.storage.path, "data/local_storage.json");
        assert_eq!(cfg.logging.format, LogFormat::Json);
        assert_eq!(cfg.logging.filter.as_deref(), Some("debug"));
        Ok(())
    }

    #[test]
    fn rejects_unknown_backend() {
        assert!(load_from_str("[storage]\nbackend = \"redis\"\n").is_err());
    }

    #[test]
    fn file_backend_needs_a_path() {
        let cfg = StorageConfig { backend: Backend::File, path: String::new() };
        assert!(cfg.validate().is_err());

        let dir = StorageConfig { backend: Backend::File, path: "data/".into() };
        assert!(dir.validate().is_err());

        let memory = StorageConfig { backend: Backend::Memory, path: String::new() };
        assert!(memory.validate().is_ok());
    }

    #[test]
    fn blank_filter_is_dropped() {
        let mut logging = LoggingConfig { format: LogFormat::Json, filter: Some("  ".into()) };
        logging.normalize();
        assert!(logging.filter.is_none());
    }
}
