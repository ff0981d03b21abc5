//! TOML-based configuration persistence for the gesture controller.
//!
//! Reads and writes [`AppConfig`] to the platform-appropriate config file:
//! - Windows:  `%APPDATA%\GestureControl\config.toml`
//! - Linux:    `$XDG_CONFIG_HOME/gesture-control/config.toml` (or `~/.config/...`)
//! - macOS:    `~/Library/Application Support/GestureControl/config.toml`
//!
//! # Example file
//!
//! ```toml
//! [gesture]
//! zoom_sensitivity = 1200.0
//! scroll_threshold = 0.05
//! position_smoothing = 0.3
//! swipe_debounce_ms = 500
//!
//! [listener]
//! bind_address = "0.0.0.0"
//! port = 9090
//! device_id = ""        # empty = accept any device
//! screen_index = -1     # negative = accept any screen
//!
//! [legacy]
//! enabled = true
//! port = 8080
//!
//! [screens]
//! default_screen = 0
//! cache_ttl_ms = 3000
//!
//! [[screens.displays]]  # only used when the platform cannot enumerate displays
//! device_name = "left"
//! bounds = { x = 0, y = 0, width = 1920, height = 1080 }
//! is_primary = true
//!
//! [runtime]
//! tracking_timeout_ms = 1500
//! log_level = "info"
//! ```
//!
//! Every section and every field is optional.  Missing values take the
//! defaults listed on each `default_*` helper, so an empty file (or no file)
//! is a valid configuration.

use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use gesture_core::{DisplayOutput, GestureSettings};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// `listener.bind_address` is not an IP address.
    #[error("invalid bind address '{0}'")]
    InvalidBindAddress(String),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level application configuration stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub gesture: GestureConfig,
    #[serde(default)]
    pub listener: ListenerSection,
    #[serde(default)]
    pub legacy: LegacySection,
    #[serde(default)]
    pub screens: ScreensSection,
    #[serde(default)]
    pub runtime: RuntimeSection,
}

/// Tuning knobs; converted to [`GestureSettings`] with [`GestureConfig::to_settings`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GestureConfig {
    #[serde(default = "default_zoom_sensitivity")]
    pub zoom_sensitivity: f64,
    #[serde(default = "default_scroll_sensitivity")]
    pub scroll_sensitivity: f64,
    #[serde(default = "default_zoom_threshold")]
    pub zoom_threshold: f64,
    #[serde(default = "default_scroll_threshold")]
    pub scroll_threshold: f64,
    /// EMA factor in `[0, 0.99]`; 0 disables smoothing.
    #[serde(default = "default_position_smoothing")]
    pub position_smoothing: f64,
    #[serde(default = "default_swipe_debounce_ms")]
    pub swipe_debounce_ms: u64,
    #[serde(default = "default_clap_debounce_ms")]
    pub clap_debounce_ms: u64,
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,
}

/// Gesture packet listener settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListenerSection {
    /// IP address to bind.  `"0.0.0.0"` binds all interfaces.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_gesture_port")]
    pub port: u16,
    /// Accept packets from this device only; empty accepts any device.
    #[serde(default)]
    pub device_id: String,
    /// Accept packets for this screen only; negative accepts any screen.
    #[serde(default = "default_screen_filter")]
    pub screen_index: i32,
}

/// Legacy text-protocol listener settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LegacySection {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_legacy_port")]
    pub port: u16,
}

/// Display geometry settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScreensSection {
    /// Display used when a packet carries no (or an unknown) screen index.
    #[serde(default)]
    pub default_screen: usize,
    /// Geometry cache lifetime; clamped to 2000–5000 ms when the cache is built.
    #[serde(default = "default_cache_ttl_ms")]
    pub cache_ttl_ms: u64,
    /// Static display list for platforms without native enumeration.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub displays: Vec<DisplayOutput>,
}

/// Process-level settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuntimeSection {
    /// Silence after which held input is released; 0 disables the reset.
    #[serde(default = "default_tracking_timeout_ms")]
    pub tracking_timeout_ms: u64,
    /// `tracing` level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_zoom_sensitivity() -> f64 {
    1200.0
}
fn default_scroll_sensitivity() -> f64 {
    120.0
}
fn default_zoom_threshold() -> f64 {
    0.0
}
fn default_scroll_threshold() -> f64 {
    0.05
}
fn default_position_smoothing() -> f64 {
    0.3
}
fn default_swipe_debounce_ms() -> u64 {
    500
}
fn default_clap_debounce_ms() -> u64 {
    800
}
fn default_min_confidence() -> f64 {
    0.7
}
fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}
fn default_gesture_port() -> u16 {
    9090
}
fn default_screen_filter() -> i32 {
    -1
}
fn default_true() -> bool {
    true
}
fn default_legacy_port() -> u16 {
    8080
}
fn default_cache_ttl_ms() -> u64 {
    3000
}
fn default_tracking_timeout_ms() -> u64 {
    1500
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            zoom_sensitivity: default_zoom_sensitivity(),
            scroll_sensitivity: default_scroll_sensitivity(),
            zoom_threshold: default_zoom_threshold(),
            scroll_threshold: default_scroll_threshold(),
            position_smoothing: default_position_smoothing(),
            swipe_debounce_ms: default_swipe_debounce_ms(),
            clap_debounce_ms: default_clap_debounce_ms(),
            min_confidence: default_min_confidence(),
        }
    }
}

impl Default for ListenerSection {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_gesture_port(),
            device_id: String::new(),
            screen_index: default_screen_filter(),
        }
    }
}

impl Default for LegacySection {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            port: default_legacy_port(),
        }
    }
}

impl Default for ScreensSection {
    fn default() -> Self {
        Self {
            default_screen: 0,
            cache_ttl_ms: default_cache_ttl_ms(),
            displays: Vec::new(),
        }
    }
}

impl Default for RuntimeSection {
    fn default() -> Self {
        Self {
            tracking_timeout_ms: default_tracking_timeout_ms(),
            log_level: default_log_level(),
        }
    }
}

impl GestureConfig {
    /// Builds validated [`GestureSettings`] (out-of-range values are clamped).
    pub fn to_settings(&self) -> GestureSettings {
        GestureSettings {
            zoom_sensitivity: self.zoom_sensitivity,
            scroll_sensitivity: self.scroll_sensitivity,
            zoom_threshold: self.zoom_threshold,
            scroll_threshold: self.scroll_threshold,
            position_smoothing: self.position_smoothing,
            swipe_debounce: Duration::from_millis(self.swipe_debounce_ms),
            clap_debounce: Duration::from_millis(self.clap_debounce_ms),
            min_confidence: self.min_confidence,
        }
        .validated()
    }
}

impl ListenerSection {
    /// Parses `bind_address`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBindAddress`] if it is not an IP address.
    pub fn bind_ip(&self) -> Result<IpAddr, ConfigError> {
        self.bind_address
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddress(self.bind_address.clone()))
    }
}

impl RuntimeSection {
    /// `None` when the tracking-loss reset is disabled.
    pub fn tracking_timeout(&self) -> Option<Duration> {
        (self.tracking_timeout_ms > 0).then(|| Duration::from_millis(self.tracking_timeout_ms))
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Resolves the default path of the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    platform_config_dir()
        .map(|dir| dir.join("config.toml"))
        .ok_or(ConfigError::NoPlatformConfigDir)
}

/// Loads `AppConfig` from `path`, returning `AppConfig::default()` if the
/// file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Loads `AppConfig` from the platform default path.
///
/// # Errors
///
/// See [`load_config_from`]; additionally [`ConfigError::NoPlatformConfigDir`].
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Writes `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config_to(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolves the platform config directory including the application subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("GestureControl"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("gesture-control"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("GestureControl")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use gesture_core::PhysicalRect;

    fn temp_dir(tag: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        std::env::temp_dir().join(format!("gesture_cfg_{tag}_{}_{nanos}", std::process::id()))
    }

    #[test]
    fn test_default_config_matches_documented_defaults() {
        // Arrange / Act
        let cfg = AppConfig::default();

        // Assert
        assert_eq!(cfg.listener.port, 9090);
        assert_eq!(cfg.listener.screen_index, -1);
        assert!(cfg.listener.device_id.is_empty());
        assert_eq!(cfg.legacy.port, 8080);
        assert!(cfg.legacy.enabled);
        assert_eq!(cfg.screens.cache_ttl_ms, 3000);
        assert_eq!(cfg.runtime.tracking_timeout_ms, 1500);
        assert_eq!(cfg.runtime.log_level, "info");
    }

    #[test]
    fn test_default_gesture_config_matches_default_settings() {
        assert_eq!(GestureConfig::default().to_settings(), GestureSettings::default());
    }

    #[test]
    fn test_empty_toml_is_a_valid_config() {
        let cfg: AppConfig = toml::from_str("").expect("empty file parses");

        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        // Arrange
        let toml_str = r#"
[listener]
port = 9999
device_id = "tablet"
"#;

        // Act
        let cfg: AppConfig = toml::from_str(toml_str).expect("deserialize partial");

        // Assert
        assert_eq!(cfg.listener.port, 9999);
        assert_eq!(cfg.listener.device_id, "tablet");
        assert_eq!(cfg.listener.bind_address, "0.0.0.0");
        assert_eq!(cfg.legacy.port, 8080);
    }

    #[test]
    fn test_static_display_list_parses_with_scale_defaults() {
        let toml_str = r#"
[[screens.displays]]
device_name = "left"
bounds = { x = 0, y = 0, width = 1920, height = 1080 }
is_primary = true

[[screens.displays]]
device_name = "right"
bounds = { x = 1920, y = 0, width = 2560, height = 1440 }
dpi_scale = 1.25
"#;

        let cfg: AppConfig = toml::from_str(toml_str).expect("deserialize displays");

        assert_eq!(cfg.screens.displays.len(), 2);
        assert_eq!(cfg.screens.displays[0].dpi_scale, 1.0);
        assert!(!cfg.screens.displays[1].is_primary);
        assert_eq!(
            cfg.screens.displays[1].bounds,
            PhysicalRect::new(1920, 0, 2560, 1440)
        );
    }

    #[test]
    fn test_to_settings_clamps_out_of_range_values() {
        let gesture = GestureConfig {
            position_smoothing: 4.0,
            min_confidence: 2.0,
            swipe_debounce_ms: 250,
            ..GestureConfig::default()
        };

        let settings = gesture.to_settings();

        assert_eq!(settings.position_smoothing, 0.99);
        assert_eq!(settings.min_confidence, 1.0);
        assert_eq!(settings.swipe_debounce, Duration::from_millis(250));
    }

    #[test]
    fn test_bind_ip_rejects_hostnames() {
        let mut listener = ListenerSection::default();
        assert!(listener.bind_ip().is_ok());

        listener.bind_address = "localhost".into();

        assert!(matches!(
            listener.bind_ip(),
            Err(ConfigError::InvalidBindAddress(_))
        ));
    }

    #[test]
    fn test_zero_tracking_timeout_disables_reset() {
        let runtime = RuntimeSection {
            tracking_timeout_ms: 0,
            ..RuntimeSection::default()
        };

        assert_eq!(runtime.tracking_timeout(), None);
        assert_eq!(
            RuntimeSection::default().tracking_timeout(),
            Some(Duration::from_millis(1500))
        );
    }

    #[test]
    fn test_invalid_toml_returns_parse_error() {
        let dir = temp_dir("bad");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "[[[ not valid toml").unwrap();

        let result = load_config_from(&path);

        assert!(matches!(result, Err(ConfigError::Parse(_))));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let path = temp_dir("missing").join("config.toml");

        let cfg = load_config_from(&path).expect("missing file is not an error");

        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        // Arrange
        let dir = temp_dir("roundtrip");
        let path = dir.join("nested").join("config.toml");
        let mut cfg = AppConfig::default();
        cfg.listener.screen_index = 2;
        cfg.runtime.log_level = "debug".to_string();
        cfg.screens.displays.push(DisplayOutput {
            device_name: "only".into(),
            bounds: PhysicalRect::new(0, 0, 1280, 720),
            dpi_scale: 1.0,
            is_primary: true,
        });

        // Act
        save_config_to(&cfg, &path).expect("save");
        let loaded = load_config_from(&path).expect("load");

        // Assert
        assert_eq!(loaded, cfg);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_config_file_path_ends_with_config_toml() {
        if let Ok(path) = config_file_path() {
            assert!(
                path.ends_with("config.toml"),
                "config file must be named config.toml, got {path:?}"
            );
        }
    }
}
