//! Flappy Square
//!
//! Jump through the gaps between scrolling pipes. Touching a pipe or leaving
//! the top/bottom of the play area ends the run.

use glam::Vec2;
use rand::Rng;

use super::MiniGame;
use crate::consts::*;
use crate::input::{InputEvent, Key};
use crate::ms_to_secs;
use crate::settings::{FlappyTuning, PlayArea, Settings};
use crate::sim::collision::{Rect, rect_rect_overlap};
use crate::sim::pool::{Entity, EntityKind, EntityPool, Spawn};
use crate::sim::scene::SceneCore;
use crate::sim::scoring::{ScoreEvent, ScoringRules};
use crate::sim::session::{EndReason, Session, SessionConfig};

/// Timed events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlappyEvent {
    /// Spawn a pipe pair and schedule the next one
    SpawnPipes,
}

#[derive(Debug, Clone)]
pub struct FlappySquare {
    core: SceneCore<FlappyEvent>,
    pipes: EntityPool,
    player_y: f32,
    player_vel: f32,
    area: PlayArea,
    tuning: FlappyTuning,
    scoring: ScoringRules,
}

impl FlappySquare {
    pub const ID: &'static str = "flappy-square";

    pub fn new(settings: &Settings, seed: u64) -> Self {
        let tuning = settings.flappy;
        let session = Session::new(SessionConfig {
            initial_counter: 0,
            initial_difficulty: tuning.pipe_speed,
        });
        Self {
            core: SceneCore::new(session, seed, settings.restart),
            pipes: EntityPool::new(tuning.max_pipes),
            player_y: settings.play_area.height / 2.0,
            player_vel: 0.0,
            area: settings.play_area,
            tuning,
            scoring: settings.scoring,
        }
    }

    /// Registry factory
    pub fn create(settings: &Settings, seed: u64) -> Box<dyn MiniGame> {
        Box::new(Self::new(settings, seed))
    }

    pub fn pipes(&self) -> &EntityPool {
        &self.pipes
    }

    #[inline]
    pub fn player_x(&self) -> f32 {
        self.area.width / 4.0
    }

    pub fn player(&self) -> Rect {
        Rect::new(
            Vec2::new(self.player_x(), self.player_y),
            Vec2::splat(FLAPPY_PLAYER_SIZE),
        )
    }

    pub fn jump(&mut self) {
        self.player_vel = self.tuning.jump_velocity;
    }

    /// Gap centre for a new pair, uniform within the margins
    fn random_gap_y(&mut self) -> f32 {
        let lo = PIPE_GAP_MARGIN;
        let hi = self.area.height - self.tuning.gap - PIPE_GAP_MARGIN;
        if hi <= lo {
            return self.area.height / 2.0;
        }
        self.core.rng.random_range(lo..=hi)
    }

    /// Upper and lower pipe around a gap centred on `gap_y`. Both or neither:
    /// a pair is skipped when the pool cannot hold two more.
    fn spawn_pair(&mut self, gap_y: f32) -> bool {
        if !self.pipes.has_room(2) {
            return false;
        }
        let phase = self.core.session.phase();
        let x = self.area.width;
        let vel = Vec2::new(-self.core.session.difficulty(), 0.0);
        let half_gap = self.tuning.gap / 2.0;

        let top_h = (gap_y - half_gap).max(0.0);
        let bottom_top = gap_y + half_gap;
        let bottom_h = (self.area.height - bottom_top).max(0.0);

        let upper = Spawn {
            kind: EntityKind::Pipe { upper: true },
            pos: Vec2::new(x, top_h / 2.0),
            vel,
            size: Vec2::new(PIPE_WIDTH, top_h),
        };
        let lower = Spawn {
            kind: EntityKind::Pipe { upper: false },
            pos: Vec2::new(x, bottom_top + bottom_h / 2.0),
            vel,
            size: Vec2::new(PIPE_WIDTH, bottom_h),
        };
        self.pipes.spawn(phase, upper).is_some() && self.pipes.spawn(phase, lower).is_some()
    }

    fn crash(&mut self) {
        self.core.end_session(EndReason::Crashed);
    }

    /// Player bounds, then off-screen pipes, then scoring, then collisions
    fn update(&mut self, dt: f32) {
        self.player_vel += self.tuning.gravity * dt;
        self.player_y += self.player_vel * dt;
        self.pipes.integrate(dt);

        if self.player_y > self.area.height || self.player_y < 0.0 {
            self.crash();
            return;
        }

        self.pipes.sweep(|pipe| pipe.pos.x < PIPE_EXIT_X);

        let player_x = self.player_x();
        let mut passed = 0;
        for pipe in self.pipes.iter_mut() {
            if pipe.kind == (EntityKind::Pipe { upper: true }) && !pipe.scored && pipe.pos.x <= player_x {
                pipe.scored = true;
                passed += 1;
            }
        }
        for _ in 0..passed {
            let delta = self.scoring.evaluate(ScoreEvent::PipePassed, &self.core.session);
            self.core.session.apply(delta);
        }

        let player = self.player();
        if self.pipes.iter().any(|pipe| rect_rect_overlap(&player, &pipe.bounds())) {
            self.crash();
        }
    }

    /// Next upper pipe whose trailing edge is not yet behind the player
    fn next_upper_pipe(&self) -> Option<&Entity> {
        let player_left = self.player_x() - FLAPPY_PLAYER_SIZE / 2.0;
        self.pipes
            .iter()
            .filter(|p| p.kind == EntityKind::Pipe { upper: true })
            .filter(|p| p.pos.x + p.size.x / 2.0 >= player_left)
            .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x))
    }
}

impl MiniGame for FlappySquare {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn init(&mut self) {
        self.core
            .after(self.tuning.first_pipe_delay_ms, FlappyEvent::SpawnPipes);
    }

    fn tick(&mut self, dt_ms: u64) {
        self.core.advance(dt_ms);
        while let Some(event) = self.core.next_event() {
            match event {
                FlappyEvent::SpawnPipes => {
                    let gap_y = self.random_gap_y();
                    if !self.spawn_pair(gap_y) {
                        log::debug!("Pipe pool full, skipping pair");
                    }
                    self.core
                        .after(self.tuning.pipe_interval_ms, FlappyEvent::SpawnPipes);
                }
            }
        }
        if self.core.session.is_active() {
            self.update(ms_to_secs(dt_ms));
        }
    }

    fn handle_input(&mut self, event: InputEvent) {
        if self.core.intercept_input(&event) {
            return;
        }
        match event {
            InputEvent::PointerDown(_) | InputEvent::KeyDown(Key::Space) => self.jump(),
            _ => {}
        }
    }

    fn teardown(&mut self) {
        self.core.teardown();
        self.pipes.clear();
    }

    fn session(&self) -> &Session {
        &self.core.session
    }

    fn hud(&self) -> Vec<String> {
        vec![
            format!("Score: {}", self.core.session.score()),
            "Click or Tap to Jump".to_string(),
        ]
    }

    fn demo_input(&self) -> Option<InputEvent> {
        let target_y = match self.next_upper_pipe() {
            Some(upper) => upper.pos.y + upper.size.y / 2.0 + self.tuning.gap / 2.0,
            None => self.area.height / 2.0,
        };
        // Flap when sinking below the gap centre
        (self.player_vel > 0.0 && self.player_y > target_y + 10.0)
            .then_some(InputEvent::KeyDown(Key::Space))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::session::Phase;

    fn floating() -> FlappySquare {
        let mut settings = Settings::default();
        settings.flappy.gravity = 0.0;
        let mut game = FlappySquare::new(&settings, 3);
        game.init();
        game
    }

    #[test]
    fn test_falls_out_without_input() {
        let mut game = FlappySquare::new(&Settings::default(), 1);
        game.init();
        for _ in 0..200 {
            game.tick(FRAME_MS);
        }
        assert_eq!(game.core.session.phase(), Phase::Ending);
        assert_eq!(game.core.session.game_over().unwrap().reason, EndReason::Crashed);
        assert_eq!(game.pipes.spawned_total(), 0);
    }

    #[test]
    fn test_jump_sets_velocity() {
        let mut game = floating();
        game.handle_input(InputEvent::PointerDown(Vec2::ZERO));
        assert_eq!(game.player_vel, FLAPPY_JUMP_VELOCITY);
        game.player_vel = 0.0;
        game.handle_input(InputEvent::KeyDown(Key::Left));
        assert_eq!(game.player_vel, 0.0);
    }

    #[test]
    fn test_pipes_spawn_on_schedule() {
        let mut game = floating();
        game.tick(FIRST_PIPE_DELAY_MS - 1);
        assert_eq!(game.pipes.alive(), 0);
        game.tick(1);
        assert_eq!(game.pipes.alive(), 2);
        let gap_top = game.pipes.iter().next().map(|p| p.size.y).unwrap();
        assert!(gap_top >= PIPE_GAP_MARGIN - PIPE_GAP / 2.0);
    }

    #[test]
    fn test_passing_a_gap_scores_once() {
        let mut game = floating();
        game.spawn_pair(PLAY_HEIGHT / 2.0);
        // 600 px to the player at 300 px/s, plus margin
        for _ in 0..140 {
            game.tick(FRAME_MS);
        }
        assert!(game.core.session.is_active());
        assert_eq!(game.core.session.score(), 1);
        for _ in 0..20 {
            game.tick(FRAME_MS);
        }
        assert_eq!(game.core.session.score(), 1);
    }

    #[test]
    fn test_hitting_a_pipe_crashes() {
        let mut game = floating();
        game.spawn_pair(PIPE_GAP_MARGIN);
        for _ in 0..140 {
            game.tick(FRAME_MS);
        }
        assert_eq!(game.core.session.phase(), Phase::Ending);
        assert_eq!(game.core.session.score(), 0);
    }

    #[test]
    fn test_offscreen_pipes_retired_without_penalty() {
        let mut game = floating();
        game.spawn_pair(PLAY_HEIGHT / 2.0);
        // 850 px at 300 px/s is about 2.83 s
        for _ in 0..180 {
            game.tick(FRAME_MS);
        }
        assert!(game.pipes.get(1).is_none());
        assert!(game.pipes.get(2).is_none());
        assert!(game.core.session.is_active());
        assert_eq!(game.core.session.score(), 1);
        // The scheduled pair from 2000 ms is still on screen
        assert_eq!(game.pipes.alive(), 2);
    }
}
