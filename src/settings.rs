use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use timer_core::{Navigation, DEFAULT_MAX_TIMERS};

use crate::error::ConfigError;

const APP_NAME: &str = "thymer";
const CONFIG_NAME: &str = "config";

pub const MIN_REFRESH_MS: u64 = 10;
pub const MAX_REFRESH_MS: u64 = 1000;
pub const MAX_LAP_ROWS: usize = 20;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Settings {
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,
    #[serde(default)]
    pub navigation: Navigation,
    #[serde(default = "default_initial_timers")]
    pub initial_timers: usize,
    #[serde(default = "default_max_timers")]
    pub max_timers: usize,
    #[serde(default)]
    pub confirm_quit_while_running: bool,
    #[serde(default = "default_lap_rows")]
    pub lap_rows: usize,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_refresh_interval_ms() -> u64 {
    50
}

fn default_initial_timers() -> usize {
    1
}

fn default_max_timers() -> usize {
    DEFAULT_MAX_TIMERS
}

fn default_lap_rows() -> usize {
    3
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            refresh_interval_ms: default_refresh_interval_ms(),
            navigation: Navigation::default(),
            initial_timers: default_initial_timers(),
            max_timers: default_max_timers(),
            confirm_quit_while_running: false,
            lap_rows: default_lap_rows(),
            log_file: None,
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Reads `thymer/config.yml` from the platform config dir, writing the
    /// defaults there on first run.
    pub fn load() -> Result<Self, ConfigError> {
        Ok(confy::load(APP_NAME, CONFIG_NAME)?)
    }

    pub fn config_path() -> Option<PathBuf> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME).ok()
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("thymer.log"))
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    /// Pulls out-of-range values back into bounds, logging each fix.
    pub fn sanitized(mut self) -> Self {
        let refresh = self.refresh_interval_ms.clamp(MIN_REFRESH_MS, MAX_REFRESH_MS);
        if refresh != self.refresh_interval_ms {
            log::warn!(
                "refresh_interval_ms {} out of range, using {}",
                self.refresh_interval_ms,
                refresh
            );
            self.refresh_interval_ms = refresh;
        }
        if self.max_timers == 0 {
            log::warn!("max_timers must be at least 1");
            self.max_timers = 1;
        }
        if self.initial_timers > self.max_timers {
            log::warn!(
                "initial_timers {} exceeds max_timers {}",
                self.initial_timers,
                self.max_timers
            );
            self.initial_timers = self.max_timers;
        }
        let lap_rows = self.lap_rows.clamp(1, MAX_LAP_ROWS);
        if lap_rows != self.lap_rows {
            log::warn!("lap_rows {} out of range, using {}", self.lap_rows, lap_rows);
            self.lap_rows = lap_rows;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.refresh_interval(), Duration::from_millis(50));
        assert_eq!(s.navigation, Navigation::Clamp);
        assert_eq!(s.initial_timers, 1);
        assert_eq!(s.max_timers, 99);
        assert_eq!(s.lap_rows, 3);
        assert!(!s.confirm_quit_while_running);
    }

    #[test]
    fn test_sanitized_clamps_ranges() {
        let s = Settings {
            refresh_interval_ms: 1,
            max_timers: 0,
            initial_timers: 5,
            lap_rows: 0,
            ..Settings::default()
        }
        .sanitized();
        assert_eq!(s.refresh_interval_ms, MIN_REFRESH_MS);
        assert_eq!(s.max_timers, 1);
        assert_eq!(s.initial_timers, 1);
        assert_eq!(s.lap_rows, 1);

        let s = Settings {
            refresh_interval_ms: 60_000,
            lap_rows: 500,
            ..Settings::default()
        }
        .sanitized();
        assert_eq!(s.refresh_interval_ms, MAX_REFRESH_MS);
        assert_eq!(s.lap_rows, MAX_LAP_ROWS);
    }

    #[test]
    fn test_sanitized_keeps_valid_values() {
        let s = Settings::default();
        assert_eq!(s.clone().sanitized(), s);
    }

    #[test]
    fn test_log_path_override() {
        let s = Settings {
            log_file: Some(PathBuf::from("/var/tmp/t.log")),
            ..Settings::default()
        };
        assert_eq!(s.log_path(), PathBuf::from("/var/tmp/t.log"));
        assert!(Settings::default().log_path().ends_with("thymer.log"));
    }
}
