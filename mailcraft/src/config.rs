//! Configuration for Mailcraft.
//!
//! A YAML file for the lesson settings, plus CLI arguments and environment
//! variables handled with clap.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use lesson::Timing;
use scorm::LmsConfig;
use tutor_agent::TutorConfig;

/// Error types for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid setting: {0}")]
    Invalid(String),
}

/// Configuration for a lesson run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MailcraftConfig {
    /// AI tutor settings
    pub tutor: TutorConfig,
    /// Feedback and message durations
    pub timing: Timing,
    /// Host LMS reporting
    pub lms: LmsConfig,
    /// Certificate export
    pub certificate: CertificateConfig,
    /// General settings
    pub general: GeneralConfig,
}

impl MailcraftConfig {
    /// Load config from YAML text.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Load config from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&yaml)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tutor.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "tutor.request_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.tutor.temperature) {
            return Err(ConfigError::Invalid(
                "tutor.temperature must be between 0.0 and 2.0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Certificate export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificateConfig {
    /// Directory the certificate file is written to
    pub output_dir: PathBuf,
}

impl Default for CertificateConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
        }
    }
}

/// General configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level when RUST_LOG is not set
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Mailcraft - e-mail etiquette lesson in the terminal
#[derive(Parser, Debug, Clone)]
#[command(name = "mailcraft")]
#[command(about = "Interactive lesson on writing, formatting and sending e-mail")]
pub struct Args {
    /// YAML configuration file
    #[arg(long, env = "MAILCRAFT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (overrides the config file)
    #[arg(long, env = "LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Never call the AI tutor; use canned feedback
    #[arg(long, env = "MAILCRAFT_OFFLINE", default_value = "false")]
    pub offline: bool,

    /// Certificate output directory (overrides the config file)
    #[arg(long, env = "CERTIFICATE_DIR")]
    pub output_dir: Option<PathBuf>,
}

impl Args {
    /// Resolve the effective configuration: file, then CLI overrides.
    pub fn resolve(&self) -> Result<MailcraftConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => MailcraftConfig::load(path)?,
            None => MailcraftConfig::default(),
        };

        if let Some(level) = &self.log_level {
            config.general.log_level = level.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.certificate.output_dir = dir.clone();
        }
        Ok(config)
    }
}
