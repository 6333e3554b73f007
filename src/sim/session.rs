//! Session state machine
//!
//! One play-through: `Active` until a terminal condition, `Ending` while the
//! game-over overlay is shown, `Restarting` once the restart fires. The host
//! discards the instance in `Restarting` and builds a fresh `Active` one.

use serde::{Deserialize, Serialize};

use super::scoring::ScoreDelta;

/// Lifecycle phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Gameplay; the only phase in which score, spawning and input apply
    Active,
    /// Terminal condition hit, overlay visible, restart pending
    Ending,
    /// Restart fired; waiting for the host to replace the instance
    Restarting,
}

impl Phase {
    /// The only legal forward step from this phase (within one instance)
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Active => Some(Phase::Ending),
            Phase::Ending => Some(Phase::Restarting),
            Phase::Restarting => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Active => "active",
            Phase::Ending => "ending",
            Phase::Restarting => "restarting",
        }
    }
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Lives reached zero
    OutOfLives,
    /// Countdown reached zero
    TimeUp,
    /// Hit an obstacle or left the play area
    Crashed,
    /// Pressed the wrong button / tile
    WrongInput,
}

/// Terminal summary shown on the game-over overlay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOver {
    pub reason: EndReason,
    pub final_score: u32,
}

impl GameOver {
    /// Overlay text containing the final score
    pub fn message(&self) -> String {
        match self.reason {
            EndReason::TimeUp => format!("TIME'S UP!\nFinal Score: {}", self.final_score),
            _ => format!("GAME OVER\n\nScore: {}", self.final_score),
        }
    }
}

/// Starting values for a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Lives or seconds; 0 means the game has no such counter
    pub initial_counter: u32,
    /// Game-specific difficulty scalar (e.g. fall speed)
    pub initial_difficulty: f32,
}

/// Score, counter and phase of one play-through
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    score: u32,
    /// Lives or seconds remaining, per game
    counter: u32,
    phase: Phase,
    difficulty: f32,
    game_over: Option<GameOver>,
    config: SessionConfig,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            score: 0,
            counter: config.initial_counter,
            phase: Phase::Active,
            difficulty: config.initial_difficulty,
            game_over: None,
            config,
        }
    }

    #[inline]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[inline]
    pub fn counter(&self) -> u32 {
        self.counter
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn difficulty(&self) -> f32 {
        self.difficulty
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Summary recorded when the session ended
    pub fn game_over(&self) -> Option<&GameOver> {
        self.game_over.as_ref()
    }

    /// Apply a score/difficulty delta. Score never drops below zero.
    /// Ignored (returns false) unless active.
    pub fn apply(&mut self, delta: ScoreDelta) -> bool {
        if !self.is_active() {
            return false;
        }
        self.score = self.score.saturating_add_signed(delta.points);
        self.difficulty += delta.difficulty;
        true
    }

    /// Take one off the counter. Returns true when this call brought it to
    /// zero. Ignored unless active.
    pub fn decrement(&mut self) -> bool {
        if !self.is_active() || self.counter == 0 {
            return false;
        }
        self.counter -= 1;
        self.counter == 0
    }

    /// Leave `Active`. Only the first call has any effect; later calls
    /// return `None`.
    pub fn end(&mut self, reason: EndReason) -> Option<GameOver> {
        if !self.is_active() {
            return None;
        }
        self.phase = Phase::Ending;
        let over = GameOver {
            reason,
            final_score: self.score,
        };
        log::info!("Session ended ({:?}), final score {}", reason, self.score);
        self.game_over = Some(over.clone());
        Some(over)
    }

    /// `Ending` -> `Restarting`. No-op from any other phase.
    pub fn begin_restart(&mut self) -> bool {
        if self.phase.next() != Some(Phase::Restarting) {
            return false;
        }
        self.phase = Phase::Restarting;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lives(n: u32) -> Session {
        Session::new(SessionConfig {
            initial_counter: n,
            initial_difficulty: 300.0,
        })
    }

    #[test]
    fn test_phase_order() {
        assert_eq!(Phase::Active.next(), Some(Phase::Ending));
        assert_eq!(Phase::Ending.next(), Some(Phase::Restarting));
        assert_eq!(Phase::Restarting.next(), None);
    }

    #[test]
    fn test_end_is_idempotent() {
        let mut session = lives(3);
        session.apply(ScoreDelta::points(4));

        let over = session.end(EndReason::Crashed).expect("first end");
        assert_eq!(over.final_score, 4);
        assert_eq!(session.phase(), Phase::Ending);

        assert!(session.end(EndReason::TimeUp).is_none());
        assert_eq!(session.game_over().map(|o| o.reason), Some(EndReason::Crashed));
    }

    #[test]
    fn test_no_mutation_after_end() {
        let mut session = lives(3);
        session.end(EndReason::WrongInput);

        assert!(!session.apply(ScoreDelta::points(10)));
        assert!(!session.decrement());
        assert_eq!(session.score(), 0);
        assert_eq!(session.counter(), 3);
    }

    #[test]
    fn test_restart_only_from_ending() {
        let mut session = lives(1);
        assert!(!session.begin_restart());
        assert_eq!(session.phase(), Phase::Active);

        assert!(session.decrement());
        session.end(EndReason::OutOfLives);
        assert!(session.begin_restart());
        assert_eq!(session.phase(), Phase::Restarting);
        assert!(!session.begin_restart());
    }

    #[test]
    fn test_score_floor() {
        let mut session = lives(0);
        session.apply(ScoreDelta::points(3));
        session.apply(ScoreDelta::points(-5));
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_messages() {
        let over = GameOver {
            reason: EndReason::TimeUp,
            final_score: 70,
        };
        assert_eq!(over.message(), "TIME'S UP!\nFinal Score: 70");
        let over = GameOver {
            reason: EndReason::OutOfLives,
            final_score: 3,
        };
        assert!(over.message().contains("Score: 3"));
    }
}
