//! Mini Arcade - plug-in arcade mini-games on a shared session core
//!
//! Core modules:
//! - `sim`: Deterministic session core (timers, entity pool, session state
//!   machine, scoring, sequence matching)
//! - `games`: The five mini-games built on that core
//! - `registry`: Typed game-id -> factory registry
//! - `arcade`: Host-side driver that runs and restarts one game instance
//! - `settings`: Data-driven tuning

pub mod arcade;
pub mod error;
pub mod games;
pub mod input;
pub mod registry;
pub mod settings;
pub mod sim;

pub use arcade::Arcade;
pub use error::{RegistryError, SettingsError};
pub use games::MiniGame;
pub use input::{InputEvent, Key};
pub use registry::GameRegistry;
pub use settings::Settings;

/// Game configuration constants (observed defaults)
pub mod consts {
    /// Host frame length used by the headless runner (~60 Hz)
    pub const FRAME_MS: u64 = 16;

    /// Play area
    pub const PLAY_WIDTH: f32 = 800.0;
    pub const PLAY_HEIGHT: f32 = 600.0;

    /// Delay between game over and automatic restart
    pub const RESTART_DELAY_MS: u64 = 3000;

    /// Ball catcher
    pub const CATCHER_LIVES: u32 = 3;
    pub const CATCHER_MAX_BALLS: usize = 5;
    pub const FIRST_BALL_DELAY_MS: u64 = 500;
    pub const BALL_REPLENISH_DELAY_MS: u64 = 200;
    pub const BALL_START_SPEED: f32 = 300.0;
    pub const BALL_SPEED_STEP: f32 = 30.0;
    pub const CATCHES_PER_SPEED_STEP: u32 = 5;
    pub const BALL_RADIUS: f32 = 10.0;
    pub const BALL_SPAWN_Y: f32 = 20.0;
    pub const BALL_SPAWN_MARGIN: f32 = 50.0;
    pub const PADDLE_WIDTH: f32 = 120.0;
    pub const PADDLE_HEIGHT: f32 = 20.0;
    /// Paddle centre distance from the bottom edge
    pub const PADDLE_BOTTOM_OFFSET: f32 = 30.0;

    /// Flappy square
    pub const FLAPPY_GRAVITY: f32 = 800.0;
    pub const FLAPPY_JUMP_VELOCITY: f32 = -400.0;
    pub const FLAPPY_PLAYER_SIZE: f32 = 30.0;
    pub const FIRST_PIPE_DELAY_MS: u64 = 2000;
    pub const PIPE_INTERVAL_MS: u64 = 2500;
    pub const PIPE_SPEED: f32 = 300.0;
    pub const PIPE_WIDTH: f32 = 60.0;
    pub const PIPE_GAP: f32 = 120.0;
    /// Gap centre keeps this far from the top and bottom edges
    pub const PIPE_GAP_MARGIN: f32 = 80.0;
    /// Pipes are retired once their centre passes this x
    pub const PIPE_EXIT_X: f32 = -50.0;
    pub const MAX_PIPES: usize = 6;

    /// Number clicker
    pub const CLICKER_SECONDS: u32 = 30;
    pub const CLICKER_START_RANGE: u32 = 5;
    pub const CLICKER_MAX_RANGE: u32 = 10;
    pub const CLICKER_BUTTON_SIZE: f32 = 80.0;
    pub const CLICKER_BUTTON_SPACING: f32 = 40.0;

    /// Quick tap
    pub const QUICK_TAP_SECONDS: u32 = 45;
    pub const NEXT_COLOR_DELAY_MS: u64 = 300;
    pub const QUICK_TAP_BUTTON_SIZE: f32 = 70.0;
    pub const QUICK_TAP_BUTTON_SPACING: f32 = 15.0;

    /// Tile memory
    pub const TILE_COUNT: usize = 4;
    pub const FIRST_ROUND_DELAY_MS: u64 = 1000;
    pub const PLAYBACK_LEAD_IN_MS: u64 = 500;
    pub const PLAYBACK_INTERVAL_MS: u64 = 600;
    /// Pause after the last highlight slot before input opens
    pub const PLAYBACK_SETTLE_MS: u64 = 500;
    pub const HIGHLIGHT_MS: u64 = 200;
    pub const NEXT_ROUND_DELAY_MS: u64 = 1500;
    pub const TILE_SIZE: f32 = 100.0;
    pub const TILE_SPACING: f32 = 20.0;
    pub const TILE_GRID_TOP: f32 = 150.0;

    /// Countdown tick
    pub const SECOND_MS: u64 = 1000;
}

/// Milliseconds to seconds, for integrating velocities
#[inline]
pub fn ms_to_secs(ms: u64) -> f32 {
    ms as f32 / 1000.0
}

/// Centres of `count` equally sized items laid out in one row, centred on
/// `center_x`
pub fn row_centers(count: usize, size: f32, spacing: f32, center_x: f32) -> Vec<f32> {
    if count == 0 {
        return Vec::new();
    }
    let total = count as f32 * size + (count - 1) as f32 * spacing;
    let start = center_x - total / 2.0 + size / 2.0;
    (0..count)
        .map(|i| start + i as f32 * (size + spacing))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_centers_symmetric() {
        let xs = row_centers(5, 80.0, 40.0, 400.0);
        assert_eq!(xs.len(), 5);
        assert!((xs[2] - 400.0).abs() < 1e-4);
        assert!((xs[1] - 280.0).abs() < 1e-4);
        assert!(row_centers(0, 80.0, 40.0, 400.0).is_empty());
    }
}
