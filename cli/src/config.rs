use std::fs;
use std::path::{Path, PathBuf};

use juice_platform::MonitoringPolicy;
use juice_protocol::DEFAULT_CHANNEL;
use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::source::SourceKind;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "off" | "none" => LogLevel::Off,
            "error" => LogLevel::Error,
            "info" => LogLevel::Info,
            "debug" => LogLevel::Debug,
            "trace" => LogLevel::Trace,
            _ => LogLevel::Warn,
        }
    }

    pub fn as_tracing_level(&self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn default_channel() -> String {
    DEFAULT_CHANNEL.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// Method channel name this service answers on.
    #[serde(default = "default_channel")]
    pub channel: String,
    pub source: SourceKind,
    pub monitoring: MonitoringPolicy,
    pub log_level: LogLevel,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            channel: default_channel(),
            source: SourceKind::Auto,
            monitoring: MonitoringPolicy::KeepEnabled,
            log_level: LogLevel::Warn,
        }
    }
}

pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("juice")
}

pub fn runtime_dir() -> PathBuf {
    dirs::runtime_dir()
        .or_else(dirs::cache_dir)
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("juice")
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

impl UserConfig {
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    /// Missing or unreadable files fall back to defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn merge_with_args(&mut self, source: Option<SourceKind>, channel: Option<&str>) {
        if let Some(source) = source {
            self.source = source;
        }
        if let Some(channel) = channel {
            self.channel = channel.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("DEBUG"), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("none"), LogLevel::Off);
        assert_eq!(LogLevel::from_str("garbage"), LogLevel::Warn);
        assert_eq!(LogLevel::Off.as_tracing_level(), None);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = UserConfig::load_from(&tmp.path().join("config.toml"));
        assert_eq!(config, UserConfig::default());
        assert_eq!(config.channel, "samples.flutter.dev/battery");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "monitoring = \"per-query\"\nsource = \"simulated\"\n").unwrap();

        let config = UserConfig::load_from(&path);
        assert_eq!(config.monitoring, MonitoringPolicy::PerQuery);
        assert_eq!(config.source, SourceKind::Simulated);
        assert_eq!(config.channel, DEFAULT_CHANNEL);
        assert_eq!(config.log_level, LogLevel::Warn);
    }

    #[test]
    fn test_invalid_file_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "monitoring = [").unwrap();
        assert_eq!(UserConfig::load_from(&path), UserConfig::default());
    }

    #[test]
    fn test_save_and_reload() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("config.toml");

        let config = UserConfig {
            channel: "com.example/power".to_string(),
            source: SourceKind::System,
            monitoring: MonitoringPolicy::Manual,
            log_level: LogLevel::Debug,
        };
        config.save_to(&path).unwrap();

        assert_eq!(UserConfig::load_from(&path), config);
    }

    #[test]
    fn test_merge_with_args() {
        let mut config = UserConfig::default();
        config.merge_with_args(Some(SourceKind::Simulated), None);
        assert_eq!(config.source, SourceKind::Simulated);
        assert_eq!(config.channel, DEFAULT_CHANNEL);

        config.merge_with_args(None, Some("other/channel"));
        assert_eq!(config.channel, "other/channel");
    }
}
