// src/config/loader.rs
//! Read-once configuration loader
//!
//! Files are merged in order, later files overriding earlier ones key by key,
//! then `EMG_*` environment variables are applied on top. There is no file
//! watching: sessions copy their parameters at construction time.

use crate::config::{constants::paths, AnalysisConfig};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Configuration loader
pub struct ConfigLoader {
    config_paths: Vec<PathBuf>,
    apply_env: bool,
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    #[error("configuration parse error: {0}")]
    ParseError(String),

    #[error("configuration validation errors: {}", .0.join("; "))]
    ValidationError(Vec<String>),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl ConfigLoader {
    /// Loader over the conventional local paths
    pub fn new() -> Self {
        Self {
            config_paths: vec![
                PathBuf::from(paths::LOCAL_CONFIG_FILE),
                PathBuf::from(paths::LOCAL_OVERRIDE_FILE),
            ],
            apply_env: true,
        }
    }

    /// Create loader with custom paths
    pub fn with_paths(paths: Vec<PathBuf>) -> Self {
        Self {
            config_paths: paths,
            apply_env: true,
        }
    }

    /// Skip `EMG_*` environment overrides
    pub fn without_env(mut self) -> Self {
        self.apply_env = false;
        self
    }

    pub fn config_paths(&self) -> &[PathBuf] {
        &self.config_paths
    }

    /// Load, merge and validate the analysis configuration.
    ///
    /// Missing files are skipped; a file that exists but fails to parse is an error.
    pub fn load(&self) -> Result<AnalysisConfig, ConfigError> {
        let mut merged = toml::Value::try_from(AnalysisConfig::default())
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        for config_path in &self.config_paths {
            match self.load_config_file(config_path) {
                Ok(file_config) => {
                    debug!(path = %config_path.display(), "merging configuration file");
                    merge_toml_values(&mut merged, file_config);
                }
                Err(ConfigError::FileNotFound(_)) => continue,
                Err(e) => return Err(e),
            }
        }

        if self.apply_env {
            apply_environment_overrides(&mut merged, std::env::vars());
        }

        let config: AnalysisConfig = merged
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::ParseError(e.to_string()))?;

        config
            .validate_consistency()
            .map_err(ConfigError::ValidationError)?;

        Ok(config)
    }

    /// Validate a single configuration file without merging
    pub fn validate_config_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: AnalysisConfig = toml::from_str(&content)?;
        config
            .validate_consistency()
            .map_err(ConfigError::ValidationError)
    }

    /// Write a configuration out as TOML
    pub fn export_config<P: AsRef<Path>>(
        config: &AnalysisConfig,
        path: P,
    ) -> Result<(), ConfigError> {
        let toml_content =
            toml::to_string_pretty(config).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    fn load_config_file(&self, path: &Path) -> Result<toml::Value, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        let config: toml::Value = toml::from_str(&content)?;
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn merge_toml_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                if let Some(base_value) = base_table.get_mut(&key) {
                    merge_toml_values(base_value, value);
                } else {
                    base_table.insert(key, value);
                }
            }
        }
        (base_value, overlay_value) => {
            *base_value = overlay_value;
        }
    }
}

fn apply_environment_overrides(
    config: &mut toml::Value,
    vars: impl Iterator<Item = (String, String)>,
) {
    let toml::Value::Table(table) = config else {
        return;
    };

    for (key, value) in vars {
        let Some(field) = key.strip_prefix(paths::ENV_PREFIX) else {
            continue;
        };
        let field = field.to_lowercase();
        // Only known keys; unrelated EMG_* variables are ignored.
        if !table.contains_key(&field) {
            continue;
        }
        debug!(field = %field, "environment override");
        table.insert(field, parse_env_value(&value));
    }
}

fn parse_env_value(value: &str) -> toml::Value {
    // Every analysis field is a float, so integers are widened.
    if let Ok(float_val) = value.parse::<f64>() {
        toml::Value::Float(float_val)
    } else if let Ok(bool_val) = value.parse::<bool>() {
        toml::Value::Boolean(bool_val)
    } else {
        toml::Value::String(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_loader_creation() {
        let loader = ConfigLoader::new();
        assert_eq!(loader.config_paths().len(), 2);
    }

    #[test]
    fn test_missing_files_give_defaults() {
        let loader =
            ConfigLoader::with_paths(vec![PathBuf::from("/nonexistent/emg/config.toml")])
                .without_env();
        let config = loader.load().unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn test_later_files_override_earlier() {
        let mut base = NamedTempFile::new().unwrap();
        writeln!(base, "m_start = 1.5\nbin_size = 0.1").unwrap();
        let mut local = NamedTempFile::new().unwrap();
        writeln!(local, "bin_size = 0.2").unwrap();

        let loader = ConfigLoader::with_paths(vec![
            base.path().to_path_buf(),
            local.path().to_path_buf(),
        ])
        .without_env();
        let config = loader.load().unwrap();

        assert_eq!(config.m_start, 1.5);
        assert_eq!(config.bin_size, 0.2);
        assert_eq!(config.h_end, AnalysisConfig::default().h_end);
    }

    #[test]
    fn test_invalid_config_validation() {
        let loader = ConfigLoader::new();

        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "h_start = 9.0\nh_end = 7.0").unwrap();

        match loader.validate_config_file(temp_file.path()) {
            Err(ConfigError::ValidationError(errors)) => {
                assert!(errors[0].contains("h_start"));
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_unparseable_file_is_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "bin_size = [not toml").unwrap();

        let loader = ConfigLoader::with_paths(vec![temp_file.path().to_path_buf()]).without_env();
        assert!(matches!(loader.load(), Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_environment_override() {
        let mut merged = toml::Value::try_from(AnalysisConfig::default()).unwrap();
        let vars = vec![
            ("EMG_BIN_SIZE".to_string(), "0.25".to_string()),
            ("EMG_H_END".to_string(), "8".to_string()),
            ("EMG_UNRELATED_FLAG".to_string(), "yes".to_string()),
            ("PATH".to_string(), "/usr/bin".to_string()),
        ];
        apply_environment_overrides(&mut merged, vars.into_iter());

        let config: AnalysisConfig = merged.try_into().unwrap();
        assert_eq!(config.bin_size, 0.25);
        assert_eq!(config.h_end, 8.0);
    }

    #[test]
    fn test_config_export() {
        let temp_file = NamedTempFile::new().unwrap();
        ConfigLoader::export_config(&AnalysisConfig::default(), temp_file.path()).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.contains("bin_size"));

        let loader = ConfigLoader::with_paths(vec![temp_file.path().to_path_buf()]).without_env();
        assert_eq!(loader.load().unwrap(), AnalysisConfig::default());
    }
}
