use anyhow::{Context, Result};
use directories::ProjectDirs;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

pub const CONFIG_FILE: &str = "trigl.toml";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Window size {width}x{height} must be non-zero")]
    ZeroSize { width: u32, height: u32 },
    #[error("Triangle side length must be positive and finite, got {0}")]
    SideLength(f32),
    #[error("{field} component {value} is outside [0, 1]")]
    Color { field: &'static str, value: f32 },
    #[error("Unknown log level: {0}")]
    LogLevel(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub log_level: String,
    pub window: WindowConfig,
    pub gl: GlConfig,
    pub scene: SceneConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub visible: bool,
    pub vsync: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    Core,
    Compatibility,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlConfig {
    pub major: u8,
    pub minor: u8,
    pub profile: Profile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneKind {
    /// Clear every frame, draw nothing
    Clear,
    Triangle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub kind: SceneKind,
    pub clear_color: [f32; 4],
    pub side_length: f32,
    pub fill_color: [f32; 4],
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            window: WindowConfig::default(),
            gl: GlConfig::default(),
            scene: SceneConfig::default(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            title: "OpenGL Testing".to_string(),
            visible: true,
            vsync: true,
        }
    }
}

impl Default for GlConfig {
    fn default() -> Self {
        Self {
            major: 3,
            minor: 3,
            profile: Profile::Core,
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            kind: SceneKind::Triangle,
            clear_color: [1.0, 1.0, 1.0, 1.0],
            side_length: 1.0,
            fill_color: [0.8, 0.3, 0.02, 1.0],
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let WindowConfig { width, height, .. } = self.window;
        if width == 0 || height == 0 {
            return Err(ConfigError::ZeroSize { width, height });
        }

        let side = self.scene.side_length;
        if !side.is_finite() || side <= 0.0 {
            return Err(ConfigError::SideLength(side));
        }

        for (field, color) in [
            ("clear_color", self.scene.clear_color),
            ("fill_color", self.scene.fill_color),
        ] {
            if let Some(&value) = color.iter().find(|c| !(0.0..=1.0).contains(*c)) {
                return Err(ConfigError::Color { field, value });
            }
        }

        self.level_filter().map(|_| ())
    }

    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| ConfigError::LogLevel(self.log_level.clone()))
    }
}

pub fn default_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("org", "trigl", "trigl")
        .context("Couldn't determine project directory")?;
    Ok(proj_dirs.config_dir().join(CONFIG_FILE))
}

/// Reads `path`, writing the defaults there first if it does not exist.
pub fn load_or_create(path: &Path) -> Result<AppConfig> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    if !path.exists() {
        let default_config = AppConfig::default();
        let toml_content = toml::to_string_pretty(&default_config)?;
        std::fs::write(path, toml_content).context("Failed to write default config")?;
        return Ok(default_config);
    }

    let content = std::fs::read_to_string(path).context("Failed to read config file")?;
    toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}
