//! Configuration for fingerprint collection.

use crate::signals::SignalKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which signals to collect
    pub signals: SignalConfig,

    /// Per-probe timeout in milliseconds (0 disables the timeout)
    pub probe_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            signals: SignalConfig::default(),
            probe_timeout_ms: 2_000,
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a file, falling back to defaults when absent.
    pub fn load_from(path: &std::path::Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content =
                std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to a file.
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("device-fingerprint")
            .join("config.json")
    }

    /// The probe timeout, if one is configured.
    pub fn probe_timeout(&self) -> Option<Duration> {
        (self.probe_timeout_ms > 0).then(|| Duration::from_millis(self.probe_timeout_ms))
    }
}

/// Which signals to collect. Disabled signals are recorded as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SignalConfig {
    pub user_agent: bool,
    pub language: bool,
    pub color_depth: bool,
    pub timezone: bool,
    pub canvas: bool,
    pub webgl: bool,
    pub fonts: bool,
    pub audio: bool,
    pub plugins: bool,
    pub hardware: bool,
    pub touch_support: bool,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self::all()
    }
}

impl SignalConfig {
    /// Every signal enabled.
    pub fn all() -> Self {
        Self::uniform(true)
    }

    /// Every signal disabled.
    pub fn none() -> Self {
        Self::uniform(false)
    }

    fn uniform(enabled: bool) -> Self {
        Self {
            user_agent: enabled,
            language: enabled,
            color_depth: enabled,
            timezone: enabled,
            canvas: enabled,
            webgl: enabled,
            fonts: enabled,
            audio: enabled,
            plugins: enabled,
            hardware: enabled,
            touch_support: enabled,
        }
    }

    /// Parse signal configuration from a comma-separated string.
    ///
    /// Accepts `all` or signal names (`userAgent`, `user-agent`, `fonts`, ...).
    pub fn from_csv(s: &str) -> Result<Self, ConfigError> {
        let mut config = Self::none();

        for name in s.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            if name.eq_ignore_ascii_case("all") {
                return Ok(Self::all());
            }
            let kind = name
                .parse::<SignalKind>()
                .map_err(|e| ConfigError::ParseError(e.to_string()))?;
            config.set(kind, true);
        }

        Ok(config)
    }

    /// Check whether a signal is enabled.
    pub fn is_enabled(&self, kind: SignalKind) -> bool {
        match kind {
            SignalKind::UserAgent => self.user_agent,
            SignalKind::Language => self.language,
            SignalKind::ColorDepth => self.color_depth,
            SignalKind::Timezone => self.timezone,
            SignalKind::Canvas => self.canvas,
            SignalKind::Webgl => self.webgl,
            SignalKind::Fonts => self.fonts,
            SignalKind::Audio => self.audio,
            SignalKind::Plugins => self.plugins,
            SignalKind::Hardware => self.hardware,
            SignalKind::TouchSupport => self.touch_support,
        }
    }

    /// Enable or disable a signal.
    pub fn set(&mut self, kind: SignalKind, enabled: bool) {
        let slot = match kind {
            SignalKind::UserAgent => &mut self.user_agent,
            SignalKind::Language => &mut self.language,
            SignalKind::ColorDepth => &mut self.color_depth,
            SignalKind::Timezone => &mut self.timezone,
            SignalKind::Canvas => &mut self.canvas,
            SignalKind::Webgl => &mut self.webgl,
            SignalKind::Fonts => &mut self.fonts,
            SignalKind::Audio => &mut self.audio,
            SignalKind::Plugins => &mut self.plugins,
            SignalKind::Hardware => &mut self.hardware,
            SignalKind::TouchSupport => &mut self.touch_support,
        };
        *slot = enabled;
    }

    /// Check if at least one signal is enabled.
    pub fn any_enabled(&self) -> bool {
        SignalKind::ALL.iter().any(|k| self.is_enabled(*k))
    }

    /// Enabled signals in record order.
    pub fn enabled(&self) -> Vec<SignalKind> {
        SignalKind::ALL
            .iter()
            .copied()
            .filter(|k| self.is_enabled(*k))
            .collect()
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {e}"),
            ConfigError::ParseError(e) => write!(f, "Parse error: {e}"),
            ConfigError::SerializeError(e) => write!(f, "Serialize error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}
