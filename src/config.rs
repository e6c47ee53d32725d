// src/config.rs

//! Defines the configuration structures for `fbdemo`.
//!
//! The configuration is deserialized from a JSON file named by the
//! `FBDEMO_CONFIG` environment variable. Every section carries
//! `#[serde(default)]`, so a partial file only overrides what it names and a
//! missing file yields the built-in defaults.

use log::{info, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::color::{Color, NamedColor};

/// Environment variable holding the path of the JSON configuration file.
pub const CONFIG_ENV_VAR: &str = "FBDEMO_CONFIG";

/// Process-wide configuration, loaded on first access.
pub static CONFIG: Lazy<Config> = Lazy::new(Config::load_or_default);

// --- Top-Level Configuration Structure ---

/// Represents the complete configuration for the demo.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Framebuffer device settings.
    pub device: DeviceConfig,
    /// Animation loop settings.
    pub animation: AnimationConfig,
    /// Frame-rate reporter settings.
    pub reporter: ReporterConfig,
    /// Colors not owned by any scene object.
    pub appearance: AppearanceConfig,
}

impl Config {
    /// Loads the configuration from the file named by `FBDEMO_CONFIG`,
    /// falling back to defaults when the variable is unset or the file is
    /// unusable.
    pub fn load_or_default() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV_VAR) else {
            info!("{} not set, using default configuration", CONFIG_ENV_VAR);
            return Config::default();
        };
        match Self::from_file(Path::new(&path)) {
            Ok(config) => {
                info!("Loaded configuration from {:?}", path);
                config
            }
            Err(e) => {
                warn!("Ignoring configuration {:?}: {:#}", path, e);
                Config::default()
            }
        }
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}

// --- Device Configuration ---

/// Framebuffer device settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DeviceConfig {
    /// Path to the framebuffer device node.
    pub path: PathBuf,
    /// Number of display rows held by the off-screen buffer.
    pub buffer_rows: u32,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        DeviceConfig {
            path: PathBuf::from("/dev/fb0"),
            buffer_rows: 4,
        }
    }
}

// --- Animation Configuration ---

/// Settings for the ping-pong animation of the two rectangles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnimationConfig {
    /// Distance moved along the diagonal per frame.
    pub step: u32,
    /// Diagonal offset of the second rectangle relative to the first.
    pub follower_offset: i32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        AnimationConfig {
            step: 2,
            follower_offset: 60,
        }
    }
}

// --- Reporter Configuration ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReporterConfig {
    /// Interval between frame-rate reports, in milliseconds.
    pub interval_ms: u64,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        ReporterConfig { interval_ms: 1000 }
    }
}

// --- Appearance Configuration ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppearanceConfig {
    /// Color painted behind all objects.
    pub background: Color,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        AppearanceConfig {
            background: Color::Named(NamedColor::White),
        }
    }
}
