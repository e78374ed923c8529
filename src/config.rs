use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::rules::{DEFAULT_ACCESS_KEY_MAX_AGE_DAYS, DEFAULT_CERTIFICATE_EXPIRY_DAYS};
use crate::runner::{RunOptions, DEFAULT_CONCURRENCY};

/// Project config file names, tried in order.
const PROJECT_FILES: &[&str] = &[
    ".cloud-audit.yaml",
    ".cloud-audit.yml",
    ".cloud-audit.json",
    ".cloud-audit.toml",
];

/// Main configuration structure for cloud-audit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rule thresholds (key age, certificate expiry window)
    pub thresholds: ThresholdConfig,
    /// Run settings (concurrency, deadline)
    pub run: RunConfig,
}

/// Tunable rule thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Days before an active access key counts as stale
    pub access_key_max_age_days: i64,
    /// Days ahead of expiry at which certificates start to warn
    pub certificate_expiry_days: i64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            access_key_max_age_days: DEFAULT_ACCESS_KEY_MAX_AGE_DAYS,
            certificate_expiry_days: DEFAULT_CERTIFICATE_EXPIRY_DAYS,
        }
    }
}

/// Run settings (corresponds to CLI options)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Maximum number of collectors fetching at the same time
    pub concurrency: usize,
    /// Wall-clock budget for the whole run, in seconds. Absent means no limit.
    pub deadline_secs: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            deadline_secs: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.display().to_string(),
            source: e,
        })?;

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "yaml" | "yml" => serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseYaml {
                path: path.display().to_string(),
                source: e,
            }),
            "json" => serde_json::from_str(&content).map_err(|e| ConfigError::ParseJson {
                path: path.display().to_string(),
                source: e,
            }),
            "toml" => toml::from_str(&content).map_err(|e| ConfigError::ParseToml {
                path: path.display().to_string(),
                source: e,
            }),
            _ => Err(ConfigError::UnsupportedFormat(
                path.display().to_string(),
                ext,
            )),
        }
    }

    /// Load configuration for a run.
    ///
    /// An explicit path is used as given and any error in it aborts the run.
    /// Otherwise the current directory is searched, then the global config.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        Self::discover(Path::new("."))
    }

    /// Search order:
    /// 1. `.cloud-audit.yaml` / `.yml` / `.json` / `.toml` in `root`
    /// 2. `~/.config/cloud-audit/config.yaml`
    /// 3. Default configuration
    ///
    /// A discovered file that fails to parse is an error, not a fallback.
    /// Thresholds change audit outcomes, so a broken file must not be
    /// silently replaced by defaults.
    pub fn discover(root: &Path) -> Result<Self, ConfigError> {
        for filename in PROJECT_FILES {
            let path = root.join(filename);
            if path.exists() {
                debug!(path = %path.display(), "loading project config");
                return Self::from_file(&path);
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let global = config_dir.join("cloud-audit").join("config.yaml");
            if global.exists() {
                debug!(path = %global.display(), "loading global config");
                return Self::from_file(&global);
            }
        }

        Ok(Self::default())
    }

    /// Run options derived from this config alone. CLI flags override these
    /// on top.
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            concurrency: self.run.concurrency,
            deadline: self.run.deadline_secs.map(Duration::from_secs),
        }
    }

    /// Starter config with documented defaults.
    pub fn generate_template() -> String {
        r#"# cloud-audit configuration file
# Place this file as .cloud-audit.yaml in your project root

# Rule thresholds. Findings flip when a value is crossed, so changes here
# change audit results.
thresholds:
  # Days before an active access key counts as stale
  access_key_max_age_days: 90
  # Days ahead of expiry at which certificates start to warn
  certificate_expiry_days: 30

# Collector run limits. CLI flags override these.
run:
  # Maximum number of collectors fetching at the same time
  concurrency: 4
  # Wall-clock budget for the whole run, in seconds (unset = no limit)
  # deadline_secs: 60
"#
        .to_string()
    }
}

/// Configuration loading error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML config {path}: {source}")]
    ParseYaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to parse JSON config {path}: {source}")]
    ParseJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse TOML config {path}: {source}")]
    ParseToml {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Unsupported config format for {0}: .{1}")]
    UnsupportedFormat(String, String),
}
