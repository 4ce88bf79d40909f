//! Configuration for the drawbridge server.

use std::path::Path;

use serde::{Deserialize, Serialize};

use drawbridge_core::HandlerSettings;
use drawbridge_core::dispatch::{DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH};

/// Default descriptor carrying draw data.
pub const DEFAULT_DRAW_FD: i32 = 3;

/// Top-level configuration loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SrvConfig {
    /// Window defaults.
    pub window: WindowConfig,
    /// Draw-data channel selection.
    pub channels: ChannelConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Window defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Width used when `Tinit` carries no geometry.
    pub default_width: i32,
    /// Height used when `Tinit` carries no geometry.
    pub default_height: i32,
}

/// Draw-data channel selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Inherited file descriptor carrying draw data.
    pub draw_fd: i32,
    /// Use an in-memory loopback instead of `draw_fd`.
    pub loopback_draw: bool,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
}

// ── Defaults ─────────────────────────────────────────────────────

impl Default for SrvConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            channels: ChannelConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            default_width: DEFAULT_WINDOW_WIDTH,
            default_height: DEFAULT_WINDOW_HEIGHT,
        }
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            draw_fd: DEFAULT_DRAW_FD,
            loopback_draw: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
        }
    }
}

// ── Loading ──────────────────────────────────────────────────────

impl SrvConfig {
    /// Load configuration from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents).unwrap_or_else(|e| {
                tracing::warn!("invalid config {}: {e}; using defaults", path.display());
                Self::default()
            }),
            Err(_) => {
                tracing::debug!("no config at {}; using defaults", path.display());
                Self::default()
            }
        }
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Handler tunables. Non-positive sizes fall back to the built-in
    /// defaults.
    pub fn to_handler_settings(&self) -> HandlerSettings {
        let pick = |v: i32, fallback: i32| if v > 0 { v } else { fallback };
        HandlerSettings {
            default_width: pick(self.window.default_width, DEFAULT_WINDOW_WIDTH),
            default_height: pick(self.window.default_height, DEFAULT_WINDOW_HEIGHT),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let text = toml::to_string_pretty(&SrvConfig::default()).unwrap();
        assert!(text.contains("default_width"));
        assert!(text.contains("draw_fd"));
    }

    #[test]
    fn roundtrip_config() {
        let text = toml::to_string_pretty(&SrvConfig::default()).unwrap();
        let parsed = SrvConfig::parse(&text).unwrap();
        assert_eq!(parsed.window.default_width, 640);
        assert_eq!(parsed.window.default_height, 480);
        assert_eq!(parsed.channels.draw_fd, 3);
        assert!(!parsed.channels.loopback_draw);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let parsed = SrvConfig::parse("[window]\ndefault_width = 1024\n").unwrap();
        assert_eq!(parsed.window.default_width, 1024);
        assert_eq!(parsed.window.default_height, 480);
        assert_eq!(parsed.logging.level, "warn");
    }

    #[test]
    fn handler_settings_reject_nonpositive_sizes() {
        let mut cfg = SrvConfig::default();
        cfg.window.default_width = 0;
        cfg.window.default_height = 300;
        let settings = cfg.to_handler_settings();
        assert_eq!(settings.default_width, 640);
        assert_eq!(settings.default_height, 300);
    }

    #[test]
    fn missing_file_uses_defaults() {
        let cfg = SrvConfig::load(Path::new("/nonexistent/drawbridge.toml"));
        assert_eq!(cfg.channels.draw_fd, DEFAULT_DRAW_FD);
    }
}
