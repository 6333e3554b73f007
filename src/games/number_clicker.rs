//! Number Clicker
//!
//! Click the numbers in ascending order before the clock runs out. Clearing
//! the whole range pays a bonus and adds one more number, up to a cap. A
//! click out of order ends the game.

use glam::Vec2;

use super::MiniGame;
use crate::consts::*;
use crate::input::{InputEvent, hit_circles};
use crate::row_centers;
use crate::settings::{ClickerTuning, PlayArea, Settings};
use crate::sim::scene::SceneCore;
use crate::sim::scoring::{ScoreEvent, ScoringRules};
use crate::sim::session::{EndReason, Session, SessionConfig};

/// Timed events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickerEvent {
    /// Countdown tick
    Second,
}

/// Buttons per row before wrapping
const BUTTONS_PER_ROW: usize = 5;

#[derive(Debug, Clone)]
pub struct NumberClicker {
    core: SceneCore<ClickerEvent>,
    /// Number expected next (1-based)
    current: u32,
    /// Highest number on the board
    range: u32,
    area: PlayArea,
    tuning: ClickerTuning,
    scoring: ScoringRules,
}

impl NumberClicker {
    pub const ID: &'static str = "number-clicker";

    pub fn new(settings: &Settings, seed: u64) -> Self {
        let tuning = settings.clicker;
        let session = Session::new(SessionConfig {
            initial_counter: tuning.seconds,
            initial_difficulty: tuning.start_range as f32,
        });
        Self {
            core: SceneCore::new(session, seed, settings.restart),
            current: 1,
            range: tuning.start_range,
            area: settings.play_area,
            tuning,
            scoring: settings.scoring,
        }
    }

    /// Registry factory
    pub fn create(settings: &Settings, seed: u64) -> Box<dyn MiniGame> {
        Box::new(Self::new(settings, seed))
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn range(&self) -> u32 {
        self.range
    }

    /// Button circles (centre, radius) for numbers `1..=range`, index 0 is 1
    pub fn buttons(&self) -> Vec<(Vec2, f32)> {
        let count = self.range as usize;
        let radius = CLICKER_BUTTON_SIZE / 2.0;
        let top = self.area.height / 2.0 - 50.0;
        let mut buttons = Vec::with_capacity(count);
        let mut remaining = count;
        let mut row = 0;
        while remaining > 0 {
            let in_row = remaining.min(BUTTONS_PER_ROW);
            let y = top + row as f32 * (CLICKER_BUTTON_SIZE + CLICKER_BUTTON_SPACING);
            for x in row_centers(
                in_row,
                CLICKER_BUTTON_SIZE,
                CLICKER_BUTTON_SPACING,
                self.area.width / 2.0,
            ) {
                buttons.push((Vec2::new(x, y), radius));
            }
            remaining -= in_row;
            row += 1;
        }
        buttons
    }

    fn click(&mut self, number: u32) {
        if number != self.current {
            log::debug!("Clicked {} while expecting {}", number, self.current);
            self.core.end_session(EndReason::WrongInput);
            return;
        }

        if self.current >= self.range {
            let delta = self.scoring.evaluate(ScoreEvent::RangeCleared, &self.core.session);
            self.core.session.apply(delta);
            self.range = (self.range + delta.range_growth).min(self.tuning.max_range);
            self.current = 1;
            log::debug!("Range cleared, now 1..={}", self.range);
        } else {
            let delta = self.scoring.evaluate(ScoreEvent::CorrectClick, &self.core.session);
            self.core.session.apply(delta);
            self.current += 1;
        }
    }
}

impl MiniGame for NumberClicker {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn init(&mut self) {
        self.core.every(SECOND_MS, ClickerEvent::Second);
    }

    fn tick(&mut self, dt_ms: u64) {
        self.core.advance(dt_ms);
        while let Some(event) = self.core.next_event() {
            match event {
                ClickerEvent::Second => {
                    if self.core.session.decrement() {
                        self.core.end_session(EndReason::TimeUp);
                    }
                }
            }
        }
    }

    fn handle_input(&mut self, event: InputEvent) {
        if self.core.intercept_input(&event) {
            return;
        }
        let index = match event {
            InputEvent::Button(index) => Some(index),
            InputEvent::PointerDown(pos) => hit_circles(&self.buttons(), pos),
            _ => None,
        };
        if let Some(index) = index.filter(|&i| i < self.range as usize) {
            self.click(index as u32 + 1);
        }
    }

    fn teardown(&mut self) {
        self.core.teardown();
    }

    fn session(&self) -> &Session {
        &self.core.session
    }

    fn hud(&self) -> Vec<String> {
        let order = (1..=self.range)
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(" → ");
        vec![
            format!("Score: {}", self.core.session.score()),
            format!("Time: {}s", self.core.session.counter()),
            format!("Click numbers in order: {order}"),
        ]
    }

    fn demo_input(&self) -> Option<InputEvent> {
        Some(InputEvent::Button(self.current as usize - 1))
    }
}
