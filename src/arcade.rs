//! Host-side driver
//!
//! Holds the registry and at most one live game. Restarting is done here:
//! once the running instance reports `Restarting`, it is torn down and a fresh
//! instance of the same game is created and initialised in the same call.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::error::RegistryError;
use crate::games::MiniGame;
use crate::input::InputEvent;
use crate::registry::GameRegistry;
use crate::settings::Settings;
use crate::sim::session::{EndReason, Phase};

/// One finished play-through
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionRecord {
    pub game: &'static str,
    pub seed: u64,
    pub score: u32,
    pub reason: EndReason,
    /// Instance time at which the session ended
    pub ended_at_ms: u64,
}

struct Running {
    game: Box<dyn MiniGame>,
    seed: u64,
    elapsed_ms: u64,
    recorded: bool,
}

pub struct Arcade {
    registry: GameRegistry,
    settings: Settings,
    rng: Pcg32,
    running: Option<Running>,
    history: Vec<SessionRecord>,
    restarts: u32,
}

impl Arcade {
    /// `seed` drives the per-instance seeds handed to every created game
    pub fn new(registry: GameRegistry, settings: Settings, seed: u64) -> Self {
        Self {
            registry,
            settings,
            rng: Pcg32::seed_from_u64(seed),
            running: None,
            history: Vec::new(),
            restarts: 0,
        }
    }

    pub fn registry(&self) -> &GameRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace whatever is running with a fresh instance of `id`
    pub fn start(&mut self, id: &str) -> Result<(), RegistryError> {
        let seed = self.rng.next_u64();
        let mut game = self.registry.create(id, &self.settings, seed)?;
        self.stop();
        game.init();
        log::info!("Started '{}' (seed {})", game.id(), seed);
        self.running = Some(Running {
            game,
            seed,
            elapsed_ms: 0,
            recorded: false,
        });
        Ok(())
    }

    /// Tear down the running game, if any
    pub fn stop(&mut self) {
        if let Some(mut running) = self.running.take() {
            running.game.teardown();
            log::debug!("Stopped '{}'", running.game.id());
        }
    }

    /// One host frame
    pub fn tick(&mut self, dt_ms: u64) {
        if let Some(running) = self.running.as_mut() {
            running.game.tick(dt_ms);
            running.elapsed_ms += dt_ms;
        }
        self.settle();
    }

    pub fn input(&mut self, event: InputEvent) {
        if let Some(running) = self.running.as_mut() {
            running.game.handle_input(event);
        }
        self.settle();
    }

    pub fn game(&self) -> Option<&dyn MiniGame> {
        self.running.as_ref().map(|r| r.game.as_ref())
    }

    pub fn current_id(&self) -> Option<&'static str> {
        self.game().map(|g| g.id())
    }

    /// Sessions that reached a terminal condition, oldest first
    pub fn completed(&self) -> &[SessionRecord] {
        &self.history
    }

    /// Instances re-created after a restart
    pub fn restarts(&self) -> u32 {
        self.restarts
    }

    /// Record a newly ended session, and replace a restarting instance
    fn settle(&mut self) {
        let Some(running) = self.running.as_mut() else {
            return;
        };

        let session = running.game.session();
        if let (Some(over), false) = (session.game_over(), running.recorded) {
            let record = SessionRecord {
                game: running.game.id(),
                seed: running.seed,
                score: over.final_score,
                reason: over.reason,
                ended_at_ms: running.elapsed_ms,
            };
            log::info!(
                "'{}' ended ({:?}) with score {}",
                record.game,
                record.reason,
                record.score
            );
            self.history.push(record);
            running.recorded = true;
        }

        if session.phase() == Phase::Restarting {
            let id = running.game.id();
            self.restarts += 1;
            // Registered ids cannot disappear while running
            if let Err(err) = self.start(id) {
                log::error!("Restart of '{}' failed: {}", id, err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::scene::RestartPolicy;

    fn arcade(settings: Settings) -> Arcade {
        Arcade::new(GameRegistry::with_builtin_games(), settings, 7)
    }

    #[test]
    fn test_unknown_game() {
        let mut arcade = arcade(Settings::default());
        assert!(arcade.start("pinball").is_err());
        assert!(arcade.game().is_none());
    }

    #[test]
    fn test_restart_creates_fresh_instance() {
        let mut arcade = arcade(Settings::default());
        arcade.start("number-clicker").unwrap();
        arcade.input(InputEvent::Button(1));
        assert_eq!(arcade.completed().len(), 1);
        assert_eq!(arcade.completed()[0].reason, EndReason::WrongInput);
        assert_eq!(
            arcade.game().unwrap().session().phase(),
            Phase::Ending
        );

        arcade.tick(RESTART_DELAY_MS - 1);
        assert_eq!(arcade.restarts(), 0);
        arcade.tick(1);
        assert_eq!(arcade.restarts(), 1);
        let session = arcade.game().unwrap().session();
        assert!(session.is_active());
        assert_eq!(session.score(), 0);
        assert_eq!(session.counter(), CLICKER_SECONDS);
        assert_eq!(arcade.current_id(), Some("number-clicker"));
        assert_eq!(arcade.completed().len(), 1);
    }

    #[test]
    fn test_on_tap_restart() {
        let mut settings = Settings::default();
        settings.restart = RestartPolicy::OnTap;
        let mut arcade = arcade(settings);
        arcade.start("number-clicker").unwrap();
        arcade.input(InputEvent::Button(4));
        arcade.tick(10 * RESTART_DELAY_MS);
        assert_eq!(arcade.restarts(), 0);

        arcade.input(InputEvent::Button(0));
        assert_eq!(arcade.restarts(), 1);
        assert!(arcade.game().unwrap().session().is_active());
    }

    #[test]
    fn test_stop() {
        let mut arcade = arcade(Settings::default());
        arcade.start("ball-catcher").unwrap();
        arcade.stop();
        assert!(arcade.current_id().is_none());
        arcade.tick(FRAME_MS);
    }
}
