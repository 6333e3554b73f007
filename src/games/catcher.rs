//! Ball Catcher
//!
//! Move the paddle to catch falling balls. A missed ball costs a life; every
//! fifth catch speeds up the next drops.

use glam::Vec2;

use super::MiniGame;
use crate::consts::*;
use crate::input::InputEvent;
use crate::ms_to_secs;
use crate::settings::{CatcherTuning, PlayArea, Settings};
use crate::sim::collision::{Rect, circle_rect_overlap};
use crate::sim::pool::{EntityId, EntityKind, EntityPool, Spawn, random_x};
use crate::sim::scene::{SceneCore, Scheduled};
use crate::sim::scoring::{ScoreEvent, ScoringRules};
use crate::sim::session::{EndReason, Session, SessionConfig};

/// Timed events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatcherEvent {
    DropBall,
}

#[derive(Debug, Clone)]
pub struct BallCatcher {
    core: SceneCore<CatcherEvent>,
    balls: EntityPool,
    paddle_x: f32,
    area: PlayArea,
    tuning: CatcherTuning,
    scoring: ScoringRules,
}

impl BallCatcher {
    pub const ID: &'static str = "ball-catcher";

    pub fn new(settings: &Settings, seed: u64) -> Self {
        let tuning = settings.catcher;
        let session = Session::new(SessionConfig {
            initial_counter: tuning.lives,
            initial_difficulty: tuning.start_speed,
        });
        Self {
            core: SceneCore::new(session, seed, settings.restart),
            balls: EntityPool::new(tuning.max_balls),
            paddle_x: settings.play_area.width / 2.0,
            area: settings.play_area,
            tuning,
            scoring: settings.scoring,
        }
    }

    /// Registry factory
    pub fn create(settings: &Settings, seed: u64) -> Box<dyn MiniGame> {
        Box::new(Self::new(settings, seed))
    }

    pub fn balls(&self) -> &EntityPool {
        &self.balls
    }

    pub fn paddle(&self) -> Rect {
        Rect::new(
            Vec2::new(self.paddle_x, self.area.height - PADDLE_BOTTOM_OFFSET),
            Vec2::new(PADDLE_WIDTH, PADDLE_HEIGHT),
        )
    }

    /// Follow the pointer, keeping the paddle fully inside the play area
    pub fn move_paddle(&mut self, x: f32) {
        let half = PADDLE_WIDTH / 2.0;
        self.paddle_x = x.max(half).min(self.area.width - half);
    }

    /// Spawn one ball at a random x, falling at the current difficulty speed
    fn drop_ball(&mut self) -> Option<EntityId> {
        let x = random_x(&mut self.core.rng, self.area.width, BALL_SPAWN_MARGIN);
        let speed = self.core.session.difficulty();
        self.balls.spawn(
            self.core.session.phase(),
            Spawn {
                kind: EntityKind::Ball,
                pos: Vec2::new(x, BALL_SPAWN_Y),
                vel: Vec2::new(0.0, speed),
                size: Vec2::splat(BALL_RADIUS * 2.0),
            },
        )
    }

    fn schedule_drop(&mut self) {
        if !self.balls.is_full() {
            self.core
                .after(self.tuning.replenish_delay_ms, CatcherEvent::DropBall);
        }
    }

    /// Misses first, then catches. A ball removed as a miss is never seen by
    /// the catch check in the same frame.
    fn update(&mut self, dt: f32) {
        self.balls.integrate(dt);

        let floor = self.area.height;
        for _missed in self.balls.sweep(|ball| ball.pos.y > floor) {
            if !self.core.session.is_active() {
                break;
            }
            if self.core.session.decrement() {
                self.core.end_session(EndReason::OutOfLives);
            } else {
                self.schedule_drop();
            }
        }

        let paddle = self.paddle();
        let caught: Vec<EntityId> = self
            .balls
            .iter()
            .filter(|ball| circle_rect_overlap(ball.pos, ball.size.x / 2.0, &paddle))
            .map(|ball| ball.id)
            .collect();

        for id in caught {
            if !self.core.session.is_active() {
                break;
            }
            let delta = self.scoring.evaluate(ScoreEvent::Catch, &self.core.session);
            self.core.session.apply(delta);
            if delta.difficulty > 0.0 {
                log::debug!("Ball speed now {}", self.core.session.difficulty());
            }
            let phase = self.core.session.phase();
            self.balls.retire_and_replenish(
                id,
                phase,
                self.core.timers_mut(),
                self.tuning.replenish_delay_ms,
                Scheduled::Game(CatcherEvent::DropBall),
            );
        }
    }
}

impl MiniGame for BallCatcher {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn init(&mut self) {
        self.core
            .after(self.tuning.first_ball_delay_ms, CatcherEvent::DropBall);
    }

    fn tick(&mut self, dt_ms: u64) {
        self.core.advance(dt_ms);
        while let Some(event) = self.core.next_event() {
            match event {
                CatcherEvent::DropBall => {
                    self.drop_ball();
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
        if let InputEvent::PointerMove(pos) = event {
            self.move_paddle(pos.x);
        }
    }

    fn teardown(&mut self) {
        self.core.teardown();
        self.balls.clear();
    }

    fn session(&self) -> &Session {
        &self.core.session
    }

    fn hud(&self) -> Vec<String> {
        vec![
            format!("Score: {}", self.core.session.score()),
            format!("Lives: {}", self.core.session.counter()),
        ]
    }

    fn demo_input(&self) -> Option<InputEvent> {
        // Chase the lowest ball
        let target = self
            .balls
            .iter()
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))?;
        Some(InputEvent::PointerMove(Vec2::new(
            target.pos.x,
            self.area.height - PADDLE_BOTTOM_OFFSET,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::session::Phase;

    fn game() -> BallCatcher {
        let mut game = BallCatcher::new(&Settings::default(), 42);
        game.init();
        game
    }

    /// Keep the paddle on the far side from every ball
    fn dodge(game: &mut BallCatcher) {
        let mid = game.area.width / 2.0;
        let x = match game.balls.iter().next() {
            Some(ball) if ball.pos.x < mid => game.area.width,
            _ => 0.0,
        };
        game.move_paddle(x);
    }

    #[test]
    fn test_first_ball_after_delay() {
        let mut game = game();
        game.tick(FIRST_BALL_DELAY_MS - 1);
        assert_eq!(game.balls.alive(), 0);
        game.tick(1);
        assert_eq!(game.balls.alive(), 1);
        let ball = game.balls.iter().next().unwrap();
        assert!((BALL_SPAWN_MARGIN..=PLAY_WIDTH - BALL_SPAWN_MARGIN).contains(&ball.pos.x));
        assert_eq!(ball.vel.y, BALL_START_SPEED);
    }

    #[test]
    fn test_three_misses_end_session_with_score_unchanged() {
        let mut game = game();
        let mut lives_seen = vec![game.core.session.counter()];

        for _ in 0..2000 {
            dodge(&mut game);
            game.tick(FRAME_MS);
            let lives = game.core.session.counter();
            if lives_seen.last() != Some(&lives) {
                lives_seen.push(lives);
            }
            if !game.core.session.is_active() {
                break;
            }
        }

        assert_eq!(lives_seen, vec![3, 2, 1, 0]);
        assert_eq!(game.core.session.phase(), Phase::Ending);
        assert_eq!(game.core.session.score(), 0);
        let over = game.core.session.game_over().unwrap();
        assert_eq!(over.reason, EndReason::OutOfLives);
        assert!(game.overlay().unwrap().contains("Score: 0"));
    }

    #[test]
    fn test_catches_escalate_speed_every_five() {
        let mut game = game();
        for _ in 0..20_000 {
            if let Some(input) = game.demo_input() {
                game.handle_input(input);
            }
            game.tick(FRAME_MS);
            if game.core.session.score() >= 10 {
                break;
            }
        }
        assert_eq!(game.core.session.score(), 10);
        assert_eq!(game.core.session.counter(), CATCHER_LIVES);
        assert_eq!(
            game.core.session.difficulty(),
            BALL_START_SPEED + 2.0 * BALL_SPEED_STEP
        );
    }

    #[test]
    fn test_paddle_clamped() {
        let mut game = game();
        game.handle_input(InputEvent::PointerMove(Vec2::new(-100.0, 0.0)));
        assert_eq!(game.paddle().center.x, 60.0);
        game.handle_input(InputEvent::PointerMove(Vec2::new(5000.0, 0.0)));
        assert_eq!(game.paddle().center.x, PLAY_WIDTH - 60.0);
    }

    #[test]
    fn test_no_spawns_after_end() {
        let mut game = game();
        game.tick(FIRST_BALL_DELAY_MS);
        game.core.end_session(EndReason::Crashed);
        let spawned = game.balls.spawned_total();
        for _ in 0..100 {
            game.tick(FRAME_MS);
        }
        assert_eq!(game.balls.spawned_total(), spawned);
        assert_eq!(game.core.session.phase(), Phase::Ending);
    }
}
