use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{TrackerError, TrackerResult};

/// Default number of concurrent fetch workers.
pub const DEFAULT_WORKERS: usize = 10;

/// Tracker configuration, usually loaded from a TOML file.
///
/// ```toml
/// interval_secs = 300
/// initial_delay_secs = 0
/// workers = 10
/// live_print = true
/// export = true
/// export_path = "updates.txt"
/// fetch_timeout_secs = 30
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Delay between the end of one cycle and the start of the next.
    pub interval_secs: u64,
    /// Delay before the first cycle.
    pub initial_delay_secs: u64,
    /// Size of the bounded fetch worker pool.
    pub workers: usize,
    /// Print each cycle's changes to stdout.
    pub live_print: bool,
    /// Append each cycle's changes to `export_path`.
    pub export: bool,
    pub export_path: Option<PathBuf>,
    /// Per-fetch deadline. Unset means fetches may run indefinitely.
    pub fetch_timeout_secs: Option<u64>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            interval_secs: 300,
            initial_delay_secs: 0,
            workers: DEFAULT_WORKERS,
            live_print: false,
            export: false,
            export_path: None,
            fetch_timeout_secs: None,
        }
    }
}

impl TrackerConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> TrackerResult<Self> {
        let config: Self = toml::from_str(s)
            .map_err(|e| TrackerError::config(format!("invalid tracker config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> TrackerResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            TrackerError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> TrackerResult<()> {
        if self.interval_secs == 0 {
            return Err(TrackerError::config("interval_secs must be greater than zero"));
        }
        if self.workers == 0 {
            return Err(TrackerError::config("workers must be greater than zero"));
        }
        if self.fetch_timeout_secs == Some(0) {
            return Err(TrackerError::config("fetch_timeout_secs must be greater than zero"));
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn initial_delay(&self) -> Duration {
        Duration::from_secs(self.initial_delay_secs)
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = TrackerConfig::default();
        assert_eq!(c.interval(), Duration::from_secs(300));
        assert_eq!(c.initial_delay(), Duration::ZERO);
        assert_eq!(c.workers, DEFAULT_WORKERS);
        assert!(!c.live_print);
        assert!(!c.export);
        assert!(c.export_path.is_none());
        assert!(c.fetch_timeout().is_none());
        c.validate().unwrap();
    }

    #[test]
    fn parse_full_document() {
        let c = TrackerConfig::from_toml_str(
            r#"
            interval_secs = 60
            initial_delay_secs = 5
            workers = 4
            live_print = true
            export = true
            export_path = "out/updates.txt"
            fetch_timeout_secs = 20
            "#,
        )
        .unwrap();
        assert_eq!(c.interval(), Duration::from_secs(60));
        assert_eq!(c.initial_delay(), Duration::from_secs(5));
        assert_eq!(c.workers, 4);
        assert!(c.live_print && c.export);
        assert_eq!(c.export_path, Some(PathBuf::from("out/updates.txt")));
        assert_eq!(c.fetch_timeout(), Some(Duration::from_secs(20)));
    }

    #[test]
    fn missing_keys_take_defaults() {
        let c = TrackerConfig::from_toml_str("live_print = true").unwrap();
        assert!(c.live_print);
        assert_eq!(c.interval_secs, 300);
        assert_eq!(c.workers, DEFAULT_WORKERS);
    }

    #[test]
    fn zero_interval_rejected() {
        let err = TrackerConfig::from_toml_str("interval_secs = 0").unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn zero_workers_rejected() {
        assert!(TrackerConfig::from_toml_str("workers = 0").is_err());
    }

    #[test]
    fn zero_timeout_rejected() {
        assert!(TrackerConfig::from_toml_str("fetch_timeout_secs = 0").is_err());
    }

    #[test]
    fn malformed_toml_is_configuration_error() {
        let err = TrackerConfig::from_toml_str("interval_secs = \"soon\"").unwrap_err();
        assert!(matches!(err, TrackerError::Configuration(_)));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seatwatch.toml");
        std::fs::write(&path, "interval_secs = 120\nworkers = 2\n").unwrap();
        let c = TrackerConfig::load(&path).unwrap();
        assert_eq!(c.interval_secs, 120);
        assert_eq!(c.workers, 2);

        let missing = TrackerConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(missing.is_configuration());
    }
}
