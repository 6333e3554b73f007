//! Game settings and tuning
//!
//! Every field defaults to the observed value, so a settings file only needs
//! the keys it wants to change.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;
use crate::sim::scene::RestartPolicy;
use crate::sim::scoring::ScoringRules;

/// Play area dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayArea {
    pub width: f32,
    pub height: f32,
}

impl Default for PlayArea {
    fn default() -> Self {
        Self {
            width: PLAY_WIDTH,
            height: PLAY_HEIGHT,
        }
    }
}

/// Ball catcher tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatcherTuning {
    pub lives: u32,
    pub max_balls: usize,
    pub first_ball_delay_ms: u64,
    pub replenish_delay_ms: u64,
    pub start_speed: f32,
}

impl Default for CatcherTuning {
    fn default() -> Self {
        Self {
            lives: CATCHER_LIVES,
            max_balls: CATCHER_MAX_BALLS,
            first_ball_delay_ms: FIRST_BALL_DELAY_MS,
            replenish_delay_ms: BALL_REPLENISH_DELAY_MS,
            start_speed: BALL_START_SPEED,
        }
    }
}

/// Flappy square tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlappyTuning {
    pub gravity: f32,
    pub jump_velocity: f32,
    pub first_pipe_delay_ms: u64,
    pub pipe_interval_ms: u64,
    pub pipe_speed: f32,
    pub gap: f32,
    pub max_pipes: usize,
}

impl Default for FlappyTuning {
    fn default() -> Self {
        Self {
            gravity: FLAPPY_GRAVITY,
            jump_velocity: FLAPPY_JUMP_VELOCITY,
            first_pipe_delay_ms: FIRST_PIPE_DELAY_MS,
            pipe_interval_ms: PIPE_INTERVAL_MS,
            pipe_speed: PIPE_SPEED,
            gap: PIPE_GAP,
            max_pipes: MAX_PIPES,
        }
    }
}

/// Number clicker tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClickerTuning {
    pub seconds: u32,
    pub start_range: u32,
    pub max_range: u32,
}

impl Default for ClickerTuning {
    fn default() -> Self {
        Self {
            seconds: CLICKER_SECONDS,
            start_range: CLICKER_START_RANGE,
            max_range: CLICKER_MAX_RANGE,
        }
    }
}

/// Quick tap tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuickTapTuning {
    pub seconds: u32,
    pub next_color_delay_ms: u64,
}

impl Default for QuickTapTuning {
    fn default() -> Self {
        Self {
            seconds: QUICK_TAP_SECONDS,
            next_color_delay_ms: NEXT_COLOR_DELAY_MS,
        }
    }
}

/// Tile memory tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileMemoryTuning {
    pub tiles: usize,
    pub first_round_delay_ms: u64,
    pub lead_in_ms: u64,
    pub interval_ms: u64,
    pub settle_ms: u64,
    pub highlight_ms: u64,
    pub next_round_delay_ms: u64,
}

impl Default for TileMemoryTuning {
    fn default() -> Self {
        Self {
            tiles: TILE_COUNT,
            first_round_delay_ms: FIRST_ROUND_DELAY_MS,
            lead_in_ms: PLAYBACK_LEAD_IN_MS,
            interval_ms: PLAYBACK_INTERVAL_MS,
            settle_ms: PLAYBACK_SETTLE_MS,
            highlight_ms: HIGHLIGHT_MS,
            next_round_delay_ms: NEXT_ROUND_DELAY_MS,
        }
    }
}

/// All tunables for the arcade
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub play_area: PlayArea,
    pub restart: RestartPolicy,
    pub scoring: ScoringRules,

    // === Per-game tuning ===
    pub catcher: CatcherTuning,
    pub flappy: FlappyTuning,
    pub clicker: ClickerTuning,
    pub quick_tap: QuickTapTuning,
    pub tiles: TileMemoryTuning,
}

impl Settings {
    /// Parse and validate settings from JSON text
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values no game can run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let invalid = |field: &'static str, reason: &'static str| -> Result<(), SettingsError> {
            Err(SettingsError::Invalid { field, reason })
        };

        if !(self.play_area.width > 0.0 && self.play_area.height > 0.0) {
            return invalid("play_area", "width and height must be positive");
        }
        if self.catcher.max_balls == 0 {
            return invalid("catcher.max_balls", "must be at least 1");
        }
        if self.catcher.lives == 0 {
            return invalid("catcher.lives", "must be at least 1");
        }
        if self.flappy.max_pipes < 2 {
            return invalid("flappy.max_pipes", "must fit one pipe pair");
        }
        if self.clicker.start_range == 0 || self.clicker.start_range > self.clicker.max_range {
            return invalid("clicker.start_range", "must be in 1..=max_range");
        }
        if self.tiles.tiles == 0 {
            return invalid("tiles.tiles", "must be at least 1");
        }
        Ok(())
    }
}
