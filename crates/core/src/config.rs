//! Client configuration
//!
//! Loaded from `config.toml` in the platform config directory. A missing
//! file yields defaults; a present but malformed file is an error.

use std::path::{Path, PathBuf};

use chrono::Duration;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Top-level client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Tracing filter used when `RUST_LOG` is unset
    pub log_filter: String,
    pub server: ServerSettings,
    pub limits: Limits,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            log_filter: "hangouts=info,hangout_core=info,hangout_net=info".to_string(),
            server: ServerSettings::default(),
            limits: Limits::default(),
        }
    }
}

/// Where the hangouts service lives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Base URL of the REST API, without a trailing slash
    pub api_base_url: String,
    /// `host:port` of the signal feed
    pub signal_addr: String,
    pub request_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000/api".to_string(),
            signal_addr: "127.0.0.1:5001".to_string(),
            request_timeout_secs: 10,
        }
    }
}

/// Per-hangout design limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub suggestions_per_member: usize,
    pub votes_per_member: usize,
    pub availability_slots_per_member: usize,
    pub min_slot_minutes: i64,
    pub max_slot_minutes: i64,
    pub forward_window_months: u32,
    pub title_min_chars: usize,
    pub title_max_chars: usize,
    pub description_max_chars: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            suggestions_per_member: 3,
            votes_per_member: 3,
            availability_slots_per_member: 10,
            min_slot_minutes: 60,
            max_slot_minutes: 24 * 60,
            forward_window_months: crate::temporal::FORWARD_WINDOW_MONTHS,
            title_min_chars: 3,
            title_max_chars: 40,
            description_max_chars: 500,
        }
    }
}

impl Limits {
    pub fn min_slot_duration(&self) -> Duration {
        Duration::minutes(self.min_slot_minutes)
    }

    pub fn max_slot_duration(&self) -> Duration {
        Duration::minutes(self.max_slot_minutes)
    }
}

impl ClientConfig {
    /// Parse configuration from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: ClientConfig =
            toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file, falling back to defaults if absent
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        tracing::info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Default config file location
    pub fn default_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    /// Directory for the local preference database
    pub fn data_dir() -> Result<PathBuf> {
        Ok(project_dirs()?.data_dir().to_path_buf())
    }

    pub fn validate(&self) -> Result<()> {
        let limits = &self.limits;

        if limits.min_slot_minutes <= 0 {
            return Err(Error::Config("min_slot_minutes must be positive".into()));
        }
        if limits.max_slot_minutes < limits.min_slot_minutes {
            return Err(Error::Config(
                "max_slot_minutes must not be below min_slot_minutes".into(),
            ));
        }
        if limits.title_min_chars > limits.title_max_chars {
            return Err(Error::Config(
                "title_min_chars must not exceed title_max_chars".into(),
            ));
        }
        if limits.forward_window_months == 0 {
            return Err(Error::Config("forward_window_months must be positive".into()));
        }
        if self.server.api_base_url.trim().is_empty() {
            return Err(Error::Config("server.api_base_url is empty".into()));
        }

        Ok(())
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("app", "hangouts", "hangouts").ok_or_else(|| {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine config directory",
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
log_filter = "debug"

[limits]
votes_per_member = 5
"#;
        let config = ClientConfig::from_toml(toml).unwrap();
        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.limits.votes_per_member, 5);
        assert_eq!(config.limits.suggestions_per_member, 3);
        assert_eq!(config.server, ServerSettings::default());
    }

    #[test]
    fn test_invalid_slot_bounds_rejected() {
        let toml = r#"
[limits]
min_slot_minutes = 120
max_slot_minutes = 60
"#;
        assert!(matches!(
            ClientConfig::from_toml(toml),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = ClientConfig::load(&temp.path().join("absent.toml")).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            "[server]\napi_base_url = \"https://hangouts.example/api\"\n",
        )
        .unwrap();

        let config = ClientConfig::load(&path).unwrap();
        assert_eq!(config.server.api_base_url, "https://hangouts.example/api");
        assert_eq!(config.server.request_timeout_secs, 10);
    }
}
