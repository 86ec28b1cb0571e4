use std::env;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub(crate) const CONFIG_ENV_VAR: &str = "CROWN_CLIMB_CONFIG";

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config json at {location}: {source}")]
    Parse {
        location: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config at {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameConfig {
    pub(crate) window: WindowConfig,
    pub(crate) physics: PhysicsConfig,
    pub(crate) layout: LayoutConfig,
    /// How long the "collect all coins" reminder stays on screen.
    pub(crate) reminder_seconds: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            physics: PhysicsConfig::default(),
            layout: LayoutConfig::default(),
            reminder_seconds: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct WindowConfig {
    pub(crate) title: String,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) target_tps: u32,
    pub(crate) resize_debounce_ms: u64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Crown Climb".to_string(),
            width: 1280,
            height: 800,
            target_tps: 60,
            resize_debounce_ms: 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct PhysicsConfig {
    pub(crate) gravity: f32,
    pub(crate) player_speed: f32,
    pub(crate) climb_speed: f32,
    pub(crate) jump_force: f32,
    pub(crate) player_size: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 1200.0,
            player_speed: 200.0,
            climb_speed: 200.0,
            jump_force: 700.0,
            player_size: 40.0,
        }
    }
}

/// Geometry constants for the generated level. All distances are screen pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct LayoutConfig {
    pub(crate) platform_width: f32,
    pub(crate) platform_height: f32,
    pub(crate) ladder_width: f32,
    pub(crate) vertical_gap: f32,
    pub(crate) top_margin: f32,
    pub(crate) bottom_margin: f32,
    pub(crate) max_platforms: usize,
    pub(crate) central_ladder_height: f32,
    /// Distances above the bottom edge of the fixed-height ladders in the center column.
    pub(crate) central_ladder_offsets: Vec<f32>,
    pub(crate) platform_coins: usize,
    pub(crate) ladder_coins: usize,
    pub(crate) target_coins: usize,
    pub(crate) win_platform_width: f32,
    pub(crate) win_platform_height: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            platform_width: 120.0,
            platform_height: 24.0,
            ladder_width: 20.0,
            vertical_gap: 60.0,
            top_margin: 100.0,
            bottom_margin: 180.0,
            max_platforms: 12,
            central_ladder_height: 100.0,
            central_ladder_offsets: vec![280.0, 480.0],
            platform_coins: 6,
            ladder_coins: 3,
            target_coins: 9,
            win_platform_width: 160.0,
            win_platform_height: 20.0,
        }
    }
}

impl GameConfig {
    pub(crate) fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse_json(&raw)?;
        config.validate()?;
        Ok(config)
    }

    fn parse_json(raw: &str) -> Result<Self, ConfigError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        serde_path_to_error::deserialize::<_, GameConfig>(&mut deserializer).map_err(|error| {
            let location = error.path().to_string();
            let location = if location.is_empty() {
                ".".to_string()
            } else {
                location
            };
            ConfigError::Parse {
                location,
                source: error.into_inner(),
            }
        })
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        require_positive("layout.platform_width", self.layout.platform_width)?;
        require_positive("layout.platform_height", self.layout.platform_height)?;
        require_positive("layout.ladder_width", self.layout.ladder_width)?;
        require_positive("layout.vertical_gap", self.layout.vertical_gap)?;
        require_positive("layout.central_ladder_height", self.layout.central_ladder_height)?;
        if let Some(offset) = self
            .layout
            .central_ladder_offsets
            .iter()
            .find(|offset| !offset.is_finite())
        {
            return Err(invalid(
                "layout.central_ladder_offsets",
                "finite numbers",
                offset,
            ));
        }
        require_positive("physics.player_size", self.physics.player_size)?;
        if !self.physics.gravity.is_finite() {
            return Err(invalid("physics.gravity", "finite number", self.physics.gravity));
        }
        if !(self.reminder_seconds.is_finite() && self.reminder_seconds >= 0.0) {
            return Err(invalid(
                "reminder_seconds",
                "non-negative number",
                self.reminder_seconds,
            ));
        }
        if self.window.target_tps == 0 {
            return Err(invalid("window.target_tps", "at least 1", 0));
        }
        Ok(())
    }
}

fn require_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, "positive number", value))
    }
}

fn invalid(field: &'static str, expected: impl Display, actual: impl Display) -> ConfigError {
    ConfigError::Invalid {
        field,
        message: format!("expected {expected}, got {actual}"),
    }
}

/// Path named by `CROWN_CLIMB_CONFIG`, if set and non-empty.
pub(crate) fn config_path_from_env() -> Option<PathBuf> {
    env::var_os(CONFIG_ENV_VAR)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}
