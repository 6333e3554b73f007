//! Scoring and difficulty policy
//!
//! A pure mapping from a qualifying event and the current session to a
//! delta. The policy never touches entities; the session applies the delta.

use serde::{Deserialize, Serialize};

use super::session::Session;
use crate::consts::*;

/// Score/difficulty change produced by one event
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreDelta {
    pub points: i32,
    pub difficulty: f32,
    /// Growth of the clickable range (number clicker only)
    pub range_growth: u32,
}

impl ScoreDelta {
    pub fn points(points: i32) -> Self {
        Self {
            points,
            ..Default::default()
        }
    }
}

/// Events that score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreEvent {
    /// Ball landed on the paddle
    Catch,
    /// Player passed a pipe pair
    PipePassed,
    /// Right colour tapped
    CorrectTap,
    /// Wrong colour tapped (penalty, no life lost)
    WrongTap,
    /// Next number in the ascending order clicked
    CorrectClick,
    /// Last number of the current range clicked
    RangeCleared,
    /// Whole reference sequence reproduced
    SequenceRound,
}

/// Tunable scoring rules; defaults are the observed values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    pub catch_points: i32,
    /// Difficulty steps up every time the score reaches a multiple of this
    pub catch_step_every: u32,
    pub catch_speed_step: f32,
    pub pipe_points: i32,
    pub correct_tap_points: i32,
    pub wrong_tap_penalty: i32,
    pub click_points: i32,
    pub range_bonus: i32,
    pub range_growth: u32,
    pub round_points: i32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            catch_points: 1,
            catch_step_every: CATCHES_PER_SPEED_STEP,
            catch_speed_step: BALL_SPEED_STEP,
            pipe_points: 1,
            correct_tap_points: 10,
            wrong_tap_penalty: 5,
            click_points: 10,
            range_bonus: 50,
            range_growth: 1,
            round_points: 1,
        }
    }
}

impl ScoringRules {
    /// Delta for `event` given the session it happens in
    pub fn evaluate(&self, event: ScoreEvent, session: &Session) -> ScoreDelta {
        match event {
            ScoreEvent::Catch => {
                let after = session.score().saturating_add_signed(self.catch_points);
                let steps_up = self.catch_step_every > 0
                    && after > 0
                    && after.is_multiple_of(self.catch_step_every);
                ScoreDelta {
                    points: self.catch_points,
                    difficulty: if steps_up { self.catch_speed_step } else { 0.0 },
                    range_growth: 0,
                }
            }
            ScoreEvent::PipePassed => ScoreDelta::points(self.pipe_points),
            ScoreEvent::CorrectTap => ScoreDelta::points(self.correct_tap_points),
            ScoreEvent::WrongTap => ScoreDelta::points(-self.wrong_tap_penalty),
            ScoreEvent::CorrectClick => ScoreDelta::points(self.click_points),
            ScoreEvent::RangeCleared => ScoreDelta {
                points: self.click_points + self.range_bonus,
                difficulty: 0.0,
                range_growth: self.range_growth,
            },
            ScoreEvent::SequenceRound => ScoreDelta::points(self.round_points),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::session::SessionConfig;

    fn session() -> Session {
        Session::new(SessionConfig {
            initial_counter: 3,
            initial_difficulty: BALL_START_SPEED,
        })
    }

    #[test]
    fn test_catch_steps_up_every_fifth() {
        let rules = ScoringRules::default();
        let mut session = session();
        for n in 1..=10 {
            let delta = rules.evaluate(ScoreEvent::Catch, &session);
            assert_eq!(delta.points, 1);
            if n % 5 == 0 {
                assert_eq!(delta.difficulty, BALL_SPEED_STEP, "catch {n}");
            } else {
                assert_eq!(delta.difficulty, 0.0, "catch {n}");
            }
            session.apply(delta);
        }
        assert_eq!(session.difficulty(), BALL_START_SPEED + 2.0 * BALL_SPEED_STEP);
    }

    #[test]
    fn test_wrong_tap_floors_at_zero() {
        let rules = ScoringRules::default();
        let mut session = session();
        session.apply(rules.evaluate(ScoreEvent::CorrectTap, &session));
        session.apply(rules.evaluate(ScoreEvent::WrongTap, &session));
        assert_eq!(session.score(), 5);
        session.apply(rules.evaluate(ScoreEvent::WrongTap, &session));
        session.apply(rules.evaluate(ScoreEvent::WrongTap, &session));
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_range_cleared_includes_click_and_bonus() {
        let rules = ScoringRules::default();
        let delta = rules.evaluate(ScoreEvent::RangeCleared, &session());
        assert_eq!(delta.points, 60);
        assert_eq!(delta.range_growth, 1);
    }
}
