//! Application configuration from `habitboard.toml`.
//!
//! ```toml
//! log_level = "info"
//!
//! [source]
//! kind = "home_assistant"
//! url = "http://homeassistant.local:8123"
//! registry_path = "registry.json"
//!
//! [progress]
//! period = { policy = "anchored", anchor = "2020-01-05", length_days = 14 }
//! classification = "binary"
//!
//! [layout]
//! header = "compact"
//!
//! [output]
//! dir = "static/images"
//! keep_images = 96
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use habitboard_progress::EngineConfig;
use habitboard_render::{LayoutConfig, Size};
use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};

/// Config file read when no path is given.
pub const DEFAULT_CONFIG_PATH: &str = "habitboard.toml";

/// Environment variable overriding `source.url`.
pub const URL_ENV: &str = "HA_URL";

/// Environment variable overriding `source.token`.
pub const TOKEN_ENV: &str = "HA_API_KEY";

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default log filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Where goals and counts come from
    #[serde(default)]
    pub source: SourceConfig,

    /// Period and classification policies
    #[serde(default)]
    pub progress: EngineConfig,

    /// Image layout
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Image output
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            source: SourceConfig::default(),
            progress: EngineConfig::default(),
            layout: LayoutConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Counter source kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Home Assistant REST API
    #[default]
    HomeAssistant,
    /// Local counts file
    File,
}

/// Source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Counter source kind
    #[serde(default)]
    pub kind: SourceKind,

    /// Home Assistant base URL
    #[serde(default)]
    pub url: Option<String>,

    /// Home Assistant long-lived access token
    #[serde(default)]
    pub token: Option<String>,

    /// Counts file for the `file` kind
    #[serde(default)]
    pub counts_path: Option<PathBuf>,

    /// Label and entity registry export used for goal discovery
    #[serde(default = "default_registry_path")]
    pub registry_path: PathBuf,

    /// Upper bound for discovery plus counter fetch
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::default(),
            url: None,
            token: None,
            counts_path: None,
            registry_path: default_registry_path(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl SourceConfig {
    /// Fetch timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory rendered images are written to
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// Image width in pixels
    #[serde(default = "default_width")]
    pub width: u32,

    /// Image height in pixels
    #[serde(default = "default_height")]
    pub height: u32,

    /// Seconds between refreshes in watch mode
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    /// Newest images kept on disk; 0 keeps all
    #[serde(default = "default_keep_images")]
    pub keep_images: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            width: default_width(),
            height: default_height(),
            refresh_interval_secs: default_refresh_interval_secs(),
            keep_images: default_keep_images(),
        }
    }
}

impl OutputConfig {
    /// Canvas size.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Watch interval.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }
}

// Serde default functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_registry_path() -> PathBuf {
    PathBuf::from("registry.json")
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("static/images")
}

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    480
}

fn default_refresh_interval_secs() -> u64 {
    900
}

fn default_keep_images() -> usize {
    96
}

impl AppConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make every refresh fail.
    pub fn validate(&self) -> Result<()> {
        if self.output.width == 0 {
            return Err(DashboardError::InvalidSetting("output.width", "must be at least 1"));
        }
        if self.output.height == 0 {
            return Err(DashboardError::InvalidSetting("output.height", "must be at least 1"));
        }
        Ok(())
    }

    /// Load config from `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load config from `path`, or defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Apply `HA_URL` / `HA_API_KEY` from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Apply environment overrides using `lookup`. Empty values are ignored.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(URL_ENV).filter(|v| !v.is_empty()) {
            self.source.url = Some(url);
        }
        if let Some(token) = lookup(TOKEN_ENV).filter(|v| !v.is_empty()) {
            self.source.token = Some(token);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Weekday};
    use habitboard_progress::{ClassificationPolicy, PeriodPolicy};
    use habitboard_render::HeaderStyle;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.source.kind, SourceKind::HomeAssistant);
        assert_eq!(config.source.timeout(), Duration::from_secs(10));
        assert_eq!(config.progress.period, PeriodPolicy::fortnight());
        assert_eq!(config.progress.classification, ClassificationPolicy::Binary);
        assert_eq!(config.output.dir, PathBuf::from("static/images"));
        assert_eq!(config.output.size(), Size::new(800, 480));
        assert_eq!(config.output.refresh_interval(), Duration::from_secs(900));
        assert_eq!(config.output.keep_images, 96);
    }

    #[test]
    fn test_full_config() {
        let config = AppConfig::from_toml(
            r#"
            log_level = "debug"

            [source]
            kind = "file"
            counts_path = "counts.json"
            registry_path = "/etc/habitboard/registry.json"
            timeout_secs = 3

            [progress]
            period = { policy = "rolling_week", start = "monday" }
            classification = "tolerance_band"

            [layout]
            header = "header_footer"
            midpoint_band = false

            [output]
            dir = "/tmp/out"
            width = 400
            height = 300
            "#,
        )
        .unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.source.kind, SourceKind::File);
        assert_eq!(config.source.counts_path, Some(PathBuf::from("counts.json")));
        assert_eq!(config.source.timeout_secs, 3);
        assert_eq!(config.progress.period, PeriodPolicy::RollingWeek { start: Weekday::Mon });
        assert_eq!(config.progress.classification, ClassificationPolicy::ToleranceBand);
        assert_eq!(config.layout.header, HeaderStyle::HeaderFooter);
        assert!(!config.layout.midpoint_band);
        assert!(config.layout.day_ticks);
        assert_eq!(config.output.size(), Size::new(400, 300));
        assert_eq!(config.output.refresh_interval_secs, 900);
    }

    #[test]
    fn test_anchored_period() {
        let config = AppConfig::from_toml(
            r#"
            [progress]
            period = { policy = "anchored", anchor = "2024-03-03", length_days = 7 }
            "#,
        )
        .unwrap();
        assert_eq!(
            config.progress.period,
            PeriodPolicy::Anchored {
                anchor: NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(),
                length_days: 7,
            }
        );
    }

    #[test]
    fn test_bad_config_is_an_error() {
        assert!(AppConfig::from_toml("[source]\nkind = \"carrier_pigeon\"").is_err());
        assert!(AppConfig::from_toml("[output]\nwidth = -1").is_err());
    }

    #[test]
    fn test_zero_sized_canvas_is_rejected() {
        assert!(matches!(
            AppConfig::from_toml("[output]\nwidth = 0"),
            Err(DashboardError::InvalidSetting("output.width", _))
        ));
        assert!(matches!(
            AppConfig::from_toml("[output]\nheight = 0"),
            Err(DashboardError::InvalidSetting("output.height", _))
        ));
        assert!(AppConfig::from_toml("[output]\nwidth = 1\nheight = 1").is_ok());
    }

    #[test]
    fn test_zero_length_period_is_rejected() {
        let result = AppConfig::from_toml(
            r#"
            [progress]
            period = { policy = "anchored", anchor = "2024-03-03", length_days = 0 }
            "#,
        );
        assert!(matches!(result, Err(DashboardError::Config(_))));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::from_toml("[source]\nurl = \"http://old:8123\"").unwrap();
        config.apply_env_with(|key| match key {
            URL_ENV => Some("http://hub.local:8123".to_string()),
            TOKEN_ENV => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.source.url.as_deref(), Some("http://hub.local:8123"));
        assert_eq!(config.source.token, None);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_or_default(&dir.path().join("habitboard.toml")).unwrap();
        assert_eq!(config.output.width, 800);

        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "log_level = [").unwrap();
        assert!(AppConfig::load_or_default(&path).is_err());
    }
}
