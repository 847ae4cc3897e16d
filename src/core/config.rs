use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::splitter::PathPolicy;

/// Name of the per-project configuration file, looked up in the root directory.
pub const CONFIG_FILE_NAME: &str = ".fs42.toml";

pub const CONFIG_VERSION: &str = "1.0";

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct MergeSettings {
    /// Ignore patterns applied before any given on the command line.
    pub ignore: Vec<String>,
    /// `.gitignore`-style files (relative to the root directory) to load patterns from.
    pub ignore_files: Vec<String>,
    /// Keep dotfiles and dot-directories found while expanding directories.
    pub include_hidden: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SplitSettings {
    pub path_policy: PathPolicy,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct GlobalSettings {
    pub verbose: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Fs42Config {
    pub version: String,
    pub merge: MergeSettings,
    pub split: SplitSettings,
    pub settings: GlobalSettings,
}

impl Default for Fs42Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            merge: MergeSettings::default(),
            split: SplitSettings::default(),
            settings: GlobalSettings::default(),
        }
    }
}

/// Serialisation formats accepted by `fs42 config --format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Toml,
    Json,
    Yaml,
}

pub struct ConfigManager {
    config_path: PathBuf,
    root_dir: PathBuf,
}

impl ConfigManager {
    /// A manager for the configuration file of the project rooted at `root_dir`.
    pub fn new_at(root_dir: PathBuf) -> Self {
        let config_path = root_dir.join(CONFIG_FILE_NAME);
        Self {
            config_path,
            root_dir,
        }
    }

    /// Writes the default configuration unless a file is already present.
    ///
    /// Returns `true` when a new file was created.
    pub fn initialize(&self) -> Result<bool> {
        if self.config_path.exists() {
            return Ok(false);
        }

        self.save_config(&Fs42Config::default())?;
        Ok(true)
    }

    /// Renders the effective configuration in the requested format.
    pub fn export_config(&self, format: ExportFormat) -> Result<String> {
        let config = self.load_config()?;

        let content = match format {
            ExportFormat::Json => {
                serde_json::to_string_pretty(&config).context("Failed to serialize to JSON")?
            }
            ExportFormat::Yaml => {
                serde_yaml::to_string(&config).context("Failed to serialize to YAML")?
            }
            ExportFormat::Toml => {
                toml::to_string_pretty(&config).context("Failed to serialize to TOML")?
            }
        };

        Ok(content)
    }

    pub fn get_root_dir(&self) -> &Path {
        &self.root_dir
    }
}

pub trait ConfigProvider {
    fn load_config(&self) -> Result<Fs42Config>;
    fn save_config(&self, config: &Fs42Config) -> Result<()>;
    fn get_config_path(&self) -> &Path;
}

impl ConfigProvider for ConfigManager {
    fn load_config(&self) -> Result<Fs42Config> {
        if !self.config_path.exists() {
            return Ok(Fs42Config::default());
        }

        let content =
            fs::read_to_string(&self.config_path).context("Failed to read config file")?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.config_path.display()))
    }

    fn save_config(&self, config: &Fs42Config) -> Result<()> {
        let content = toml::to_string_pretty(config).context("Failed to serialize config")?;

        fs::write(&self.config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    fn get_config_path(&self) -> &Path {
        &self.config_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::new_at(dir.path().to_path_buf());
        let config = manager.load_config().unwrap();
        assert_eq!(config, Fs42Config::default());
        assert_eq!(config.split.path_policy, PathPolicy::Reject);
    }

    #[test]
    fn test_initialize_then_reload() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::new_at(dir.path().to_path_buf());
        assert!(manager.initialize().unwrap());
        assert!(!manager.initialize().unwrap());
        assert!(dir.path().join(CONFIG_FILE_NAME).exists());

        let mut config = manager.load_config().unwrap();
        config.merge.ignore = vec!["*.log".into()];
        config.split.path_policy = PathPolicy::Allow;
        manager.save_config(&config).unwrap();

        assert_eq!(manager.load_config().unwrap(), config);
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[merge]\nignore = [\"target/\"]\n\n[split]\npath_policy = \"allow\"\n",
        )
        .unwrap();

        let config = ConfigManager::new_at(dir.path().to_path_buf())
            .load_config()
            .unwrap();
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.merge.ignore, vec!["target/"]);
        assert_eq!(config.split.path_policy, PathPolicy::Allow);
        assert!(!config.settings.verbose);
    }

    #[test]
    fn test_export_formats() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::new_at(dir.path().to_path_buf());

        let json = manager.export_config(ExportFormat::Json).unwrap();
        assert!(json.contains("\"path_policy\": \"reject\""));
        let yaml = manager.export_config(ExportFormat::Yaml).unwrap();
        assert!(yaml.contains("path_policy: reject"));
        let toml = manager.export_config(ExportFormat::Toml).unwrap();
        assert!(toml.contains("path_policy = \"reject\""));
    }
}
