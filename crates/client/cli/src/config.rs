//! CLI runtime configuration loaded from the environment.
use std::env;
use std::path::PathBuf;

/// Settings that can come from the environment (or a `.env` file) instead
/// of command-line flags.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CliConfig {
    pub data_dir: Option<PathBuf>,
    pub log_to_file: bool,
    pub log_dir: Option<PathBuf>,
}

impl CliConfig {
    pub const DEFAULT_DATA_DIR: &'static str = "data";

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `JELLY_DATA_DIR` - Content directory with `config.toml` and `levels/` (default: `./data`)
    /// - `JELLY_LOG_TO_FILE` - Also write logs to a file (default: false)
    /// - `JELLY_LOG_DIR` - Directory for the log file (default: platform cache dir)
    pub fn from_env() -> Self {
        Self {
            data_dir: read_path("JELLY_DATA_DIR"),
            log_to_file: env::var("JELLY_LOG_TO_FILE").is_ok_and(|value| is_truthy(&value)),
            log_dir: read_path("JELLY_LOG_DIR"),
        }
    }

    /// Data directory from the flag, else the environment, else `./data`.
    pub fn resolve_data_dir(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.data_dir.clone())
            .unwrap_or_else(|| PathBuf::from(Self::DEFAULT_DATA_DIR))
    }
}

fn read_path(key: &str) -> Option<PathBuf> {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthy_values() {
        for value in ["1", "true", "YES", " on "] {
            assert!(is_truthy(value), "{value}");
        }
        for value in ["", "0", "false", "off", "nope"] {
            assert!(!is_truthy(value), "{value}");
        }
    }

    #[test]
    fn flag_beats_environment() {
        let config = CliConfig {
            data_dir: Some(PathBuf::from("/from/env")),
            ..CliConfig::default()
        };
        assert_eq!(
            config.resolve_data_dir(Some(PathBuf::from("/from/flag"))),
            PathBuf::from("/from/flag")
        );
        assert_eq!(config.resolve_data_dir(None), PathBuf::from("/from/env"));
        assert_eq!(
            CliConfig::default().resolve_data_dir(None),
            PathBuf::from(CliConfig::DEFAULT_DATA_DIR)
        );
    }
}
