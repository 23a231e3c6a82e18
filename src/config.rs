use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::alert::{AlertPolicy, LogFormat};
use crate::ranking::{DEFAULT_THRESHOLD, DEFAULT_TOP_N};

pub const MIN_REFRESH_INTERVAL_MS: u64 = 500;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub refresh_interval_ms: u64,
    pub top_n: usize,
    pub cpu_threshold: f32,
    pub kill_signal: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            refresh_interval_ms: 2000,
            top_n: DEFAULT_TOP_N,
            cpu_threshold: DEFAULT_THRESHOLD,
            kill_signal: "term".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub alert_log: PathBuf,
    pub format: LogFormat,
    pub alert_policy: AlertPolicy,
    pub trace_log: Option<PathBuf>,
    pub trace_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            alert_log: PathBuf::from("cpu_monitor.log"),
            format: LogFormat::Text,
            alert_policy: AlertPolicy::EveryCycle,
            trace_log: None,
            trace_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Clamps values that would make the monitor misbehave back into range.
    pub fn sanitized(mut self) -> Self {
        let general = &mut self.general;
        general.refresh_interval_ms = general.refresh_interval_ms.max(MIN_REFRESH_INTERVAL_MS);
        general.top_n = general.top_n.max(1);
        if !general.cpu_threshold.is_finite() || general.cpu_threshold < 0.0 {
            general.cpu_threshold = DEFAULT_THRESHOLD;
        }
        self
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.general.refresh_interval_ms)
    }

    pub fn kill_signal(&self) -> sysinfo::Signal {
        match self.general.kill_signal.to_lowercase().as_str() {
            "kill" | "sigkill" | "9" => sysinfo::Signal::Kill,
            _ => sysinfo::Signal::Term,
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("cpuwatch").join("config.toml"))
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Defaults when no config file exists. An unreadable or malformed file is
/// an error so the caller can report it once logging is up.
pub fn load_config() -> Result<Config, ConfigError> {
    match config_path() {
        Some(path) => load_config_from_path(&path),
        None => Ok(Config::default()),
    }
}

pub fn load_config_from_path(path: &Path) -> Result<Config, ConfigError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.display().to_string(),
                source,
            });
        }
    };
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = Config::default();
        assert_eq!(config.general.refresh_interval_ms, 2000);
        assert_eq!(config.general.top_n, 15);
        assert!((config.general.cpu_threshold - 70.0).abs() < f32::EPSILON);
        assert_eq!(config.logging.alert_log, PathBuf::from("cpu_monitor.log"));
        assert_eq!(config.logging.format, LogFormat::Text);
        assert_eq!(config.logging.alert_policy, AlertPolicy::EveryCycle);
        assert_eq!(config.kill_signal(), sysinfo::Signal::Term);
    }

    #[test]
    fn parse_partial_toml() {
        let toml_str = r#"
[general]
cpu_threshold = 50.0
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert!((config.general.cpu_threshold - 50.0).abs() < f32::EPSILON);
        // Other fields should be defaults
        assert_eq!(config.general.top_n, 15);
        assert_eq!(config.logging.trace_level, "info");
    }

    #[test]
    fn parse_full_toml() {
        let toml_str = r#"
[general]
refresh_interval_ms = 1000
top_n = 5
cpu_threshold = 90.0
kill_signal = "kill"

[logging]
alert_log = "/var/log/cpuwatch.log"
format = "json"
alert_policy = "on_transition"
trace_log = "/tmp/cpuwatch-trace.jsonl"
trace_level = "debug"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.refresh_interval_ms, 1000);
        assert_eq!(config.general.top_n, 5);
        assert_eq!(config.kill_signal(), sysinfo::Signal::Kill);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.alert_policy, AlertPolicy::OnTransition);
        assert_eq!(
            config.logging.trace_log,
            Some(PathBuf::from("/tmp/cpuwatch-trace.jsonl"))
        );
    }

    #[test]
    fn sanitize_clamps_out_of_range_values() {
        let mut config = Config::default();
        config.general.refresh_interval_ms = 10;
        config.general.top_n = 0;
        config.general.cpu_threshold = f32::NAN;
        let config = config.sanitized();
        assert_eq!(config.general.refresh_interval_ms, MIN_REFRESH_INTERVAL_MS);
        assert_eq!(config.general.top_n, 1);
        assert!((config.general.cpu_threshold - 70.0).abs() < f32::EPSILON);
        assert_eq!(config.refresh_interval(), Duration::from_millis(500));
    }

    #[test]
    fn missing_file_returns_default() {
        let config = load_config_from_path(Path::new("/nonexistent/path/config.toml")).unwrap();
        assert_eq!(config.general.refresh_interval_ms, 2000);
    }

    #[test]
    fn invalid_toml_is_reported() {
        let temp = std::env::temp_dir().join("cpuwatch_test_invalid.toml");
        std::fs::write(&temp, "this is not valid toml {{{{").unwrap();
        let err = load_config_from_path(&temp).unwrap_err();
        let _ = std::fs::remove_file(&temp);

        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("cpuwatch_test_invalid.toml"));
    }

    #[test]
    fn wrong_value_type_is_reported() {
        let temp = std::env::temp_dir().join("cpuwatch_test_bad_type.toml");
        std::fs::write(&temp, "[general]\ntop_n = \"many\"\n").unwrap();
        let result = load_config_from_path(&temp);
        let _ = std::fs::remove_file(&temp);

        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }
}
