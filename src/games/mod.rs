//! The mini-games: Ball Catcher, Flappy Square, Number Clicker, Quick Tap,
//! Tile Memory.
//!
//! Each game owns a [`SceneCore`](crate::sim::SceneCore) and implements the
//! [`MiniGame`] lifecycle. The host never subclasses anything; it holds a
//! `Box<dyn MiniGame>` built by the registry.

pub mod catcher;
pub mod flappy;
pub mod number_clicker;
pub mod quick_tap;
pub mod tile_memory;

pub use catcher::BallCatcher;
pub use flappy::FlappySquare;
pub use number_clicker::NumberClicker;
pub use quick_tap::QuickTap;
pub use tile_memory::TileMemory;

use crate::input::InputEvent;
use crate::sim::session::{GameOver, Session};

/// Lifecycle capability set a game exposes to the host
pub trait MiniGame {
    /// Registry key, e.g. `"ball-catcher"`
    fn id(&self) -> &'static str;

    /// Set up the scene and schedule the opening timers. Called once.
    fn init(&mut self);

    /// One host frame: drain due timers, then per-frame logic
    fn tick(&mut self, dt_ms: u64);

    /// One discrete input event
    fn handle_input(&mut self, event: InputEvent);

    /// Cancel outstanding timers before the host drops the instance
    fn teardown(&mut self);

    fn session(&self) -> &Session;

    /// Status lines (score, lives/time, prompt)
    fn hud(&self) -> Vec<String>;

    /// Game-over overlay text, once ended
    fn overlay(&self) -> Option<String> {
        self.session().game_over().map(GameOver::message)
    }

    /// Input a simple autopilot would send this frame (headless demo)
    fn demo_input(&self) -> Option<InputEvent> {
        None
    }
}
