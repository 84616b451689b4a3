//! Configuration file support for Surveyor.
//!
//! Surveyor supports two configuration file locations:
//! - Global: `~/.surveyor/config.toml` - User-wide defaults
//! - Project: `.surveyor/config.toml` - Per-directory overrides
//!
//! Project config takes precedence over global config, and command-line
//! flags take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::survey::OutputFormat;
use crate::util::fs::read_to_string;

/// Default directory for log files.
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Surveyor configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Survey defaults
    pub survey: SurveyConfig,

    /// Credential defaults
    pub credentials: CredentialsConfig,
}

/// Survey-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyConfig {
    /// Directory for log files (default: `logs`)
    pub log_dir: Option<PathBuf>,

    /// Default results format (csv, json)
    pub output_format: Option<String>,

    /// Default result limit per query
    pub limit: Option<u32>,

    /// Location of the built-in definition files
    pub definitions_dir: Option<PathBuf>,
}

/// Credential defaults applied when the matching flag is absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    /// Default profile name
    pub profile: Option<String>,

    /// Default credentials file
    pub creds_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = read_to_string(path)?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.survey.log_dir.is_some() {
            self.survey.log_dir = other.survey.log_dir;
        }
        if other.survey.output_format.is_some() {
            self.survey.output_format = other.survey.output_format;
        }
        if other.survey.limit.is_some() {
            self.survey.limit = other.survey.limit;
        }
        if other.survey.definitions_dir.is_some() {
            self.survey.definitions_dir = other.survey.definitions_dir;
        }

        if other.credentials.profile.is_some() {
            self.credentials.profile = other.credentials.profile;
        }
        if other.credentials.creds_file.is_some() {
            self.credentials.creds_file = other.credentials.creds_file;
        }
    }

    /// Parse the output format from the config string.
    pub fn output_format(&self) -> Option<OutputFormat> {
        self.survey
            .output_format
            .as_ref()
            .and_then(|s| s.parse().ok())
    }

    /// Log directory, falling back to `logs`.
    pub fn log_dir(&self) -> PathBuf {
        self.survey
            .log_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR))
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.surveyor/config.toml)
/// 2. Global config (~/.surveyor/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    if global_path.exists() {
        config.merge(Config::load_or_default(global_path));
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.survey.output_format.is_none());
        assert!(config.credentials.profile.is_none());
        assert_eq!(config.log_dir(), PathBuf::from("logs"));
    }

    #[test]
    fn test_config_load() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");

        std::fs::write(
            &config_path,
            r#"
[survey]
log_dir = "/var/log/surveyor"
output_format = "json"
limit = 500

[credentials]
profile = "prod"
creds_file = "/etc/surveyor/s1.ini"
"#,
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.log_dir(), PathBuf::from("/var/log/surveyor"));
        assert_eq!(config.output_format(), Some(OutputFormat::Json));
        assert_eq!(config.survey.limit, Some(500));
        assert_eq!(config.credentials.profile, Some("prod".to_string()));
        assert_eq!(
            config.credentials.creds_file,
            Some(PathBuf::from("/etc/surveyor/s1.ini"))
        );
    }

    #[test]
    fn test_config_load_invalid_falls_back() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        std::fs::write(&config_path, "[survey\nlimit = ").unwrap();

        assert!(Config::load(&config_path).is_err());
        let config = Config::load_or_default(&config_path);
        assert!(config.survey.limit.is_none());
    }

    #[test]
    fn test_config_merge() {
        let mut base = Config::default();
        base.survey.output_format = Some("csv".to_string());
        base.survey.limit = Some(100);

        let mut override_cfg = Config::default();
        override_cfg.survey.output_format = Some("json".to_string());

        base.merge(override_cfg);

        assert_eq!(base.survey.output_format, Some("json".to_string()));
        assert_eq!(base.survey.limit, Some(100));
    }

    #[test]
    fn test_unknown_output_format_ignored() {
        let mut config = Config::default();
        config.survey.output_format = Some("xlsx".to_string());
        assert_eq!(config.output_format(), None);
    }

    #[test]
    fn test_load_config_precedence() {
        let tmp = TempDir::new().unwrap();
        let global_path = tmp.path().join("global.toml");
        let project_path = tmp.path().join("project.toml");

        std::fs::write(
            &global_path,
            r#"
[survey]
limit = 50
output_format = "csv"

[credentials]
profile = "global"
"#,
        )
        .unwrap();

        std::fs::write(
            &project_path,
            r#"
[credentials]
profile = "project"
"#,
        )
        .unwrap();

        let config = load_config(&global_path, &project_path);

        assert_eq!(config.credentials.profile, Some("project".to_string()));
        assert_eq!(config.survey.limit, Some(50));
        assert_eq!(config.output_format(), Some(OutputFormat::Csv));
    }
}
