//! Quick Tap
//!
//! A colour is named; tap the matching button before the clock runs out.
//! Wrong taps cost points but never end the game.

use glam::Vec2;
use rand::Rng;

use super::MiniGame;
use crate::consts::*;
use crate::input::{InputEvent, hit_circles};
use crate::row_centers;
use crate::settings::{PlayArea, QuickTapTuning, Settings};
use crate::sim::scene::SceneCore;
use crate::sim::scoring::{ScoreEvent, ScoringRules};
use crate::sim::session::{EndReason, Session, SessionConfig};

/// Button colours, in on-screen order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapColor {
    Red,
    Teal,
    Yellow,
    Mint,
    Orange,
}

impl TapColor {
    pub const ALL: [TapColor; 5] = [
        TapColor::Red,
        TapColor::Teal,
        TapColor::Yellow,
        TapColor::Mint,
        TapColor::Orange,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TapColor::Red => "RED",
            TapColor::Teal => "TEAL",
            TapColor::Yellow => "YELLOW",
            TapColor::Mint => "MINT",
            TapColor::Orange => "ORANGE",
        }
    }

    /// 0xRRGGBB
    pub fn hex(self) -> u32 {
        match self {
            TapColor::Red => 0xFF6B6B,
            TapColor::Teal => 0x4ECDC4,
            TapColor::Yellow => 0xFFE66D,
            TapColor::Mint => 0x95E1D3,
            TapColor::Orange => 0xFF8C42,
        }
    }
}

/// Timed events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickTapEvent {
    Second,
    NextColor,
}

#[derive(Debug, Clone)]
pub struct QuickTap {
    core: SceneCore<QuickTapEvent>,
    /// `None` between a correct tap and the next colour
    target: Option<TapColor>,
    area: PlayArea,
    tuning: QuickTapTuning,
    scoring: ScoringRules,
}

impl QuickTap {
    pub const ID: &'static str = "quick-tap";

    pub fn new(settings: &Settings, seed: u64) -> Self {
        let tuning = settings.quick_tap;
        let session = Session::new(SessionConfig {
            initial_counter: tuning.seconds,
            initial_difficulty: 0.0,
        });
        Self {
            core: SceneCore::new(session, seed, settings.restart),
            target: None,
            area: settings.play_area,
            tuning,
            scoring: settings.scoring,
        }
    }

    /// Registry factory
    pub fn create(settings: &Settings, seed: u64) -> Box<dyn MiniGame> {
        Box::new(Self::new(settings, seed))
    }

    pub fn target(&self) -> Option<TapColor> {
        self.target
    }

    /// Button circles (centre, radius) in [`TapColor::ALL`] order
    pub fn buttons(&self) -> Vec<(Vec2, f32)> {
        let y = self.area.height / 2.0 + 50.0;
        row_centers(
            TapColor::ALL.len(),
            QUICK_TAP_BUTTON_SIZE,
            QUICK_TAP_BUTTON_SPACING,
            self.area.width / 2.0,
        )
        .into_iter()
        .map(|x| (Vec2::new(x, y), QUICK_TAP_BUTTON_SIZE / 2.0))
        .collect()
    }

    fn next_color(&mut self) {
        let index = self.core.rng.random_range(0..TapColor::ALL.len());
        self.target = Some(TapColor::ALL[index]);
    }

    fn tap(&mut self, color: TapColor) {
        // Between colours
        let Some(target) = self.target else {
            return;
        };

        let event = if color == target {
            ScoreEvent::CorrectTap
        } else {
            ScoreEvent::WrongTap
        };
        let delta = self.scoring.evaluate(event, &self.core.session);
        self.core.session.apply(delta);

        if color == target {
            self.target = None;
            self.core
                .after(self.tuning.next_color_delay_ms, QuickTapEvent::NextColor);
        }
    }
}

impl MiniGame for QuickTap {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn init(&mut self) {
        self.next_color();
        self.core.every(SECOND_MS, QuickTapEvent::Second);
    }

    fn tick(&mut self, dt_ms: u64) {
        self.core.advance(dt_ms);
        while let Some(event) = self.core.next_event() {
            match event {
                QuickTapEvent::Second => {
                    if self.core.session.decrement() {
                        self.target = None;
                        self.core.end_session(EndReason::TimeUp);
                    }
                }
                QuickTapEvent::NextColor => self.next_color(),
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
        if let Some(&color) = index.and_then(|i| TapColor::ALL.get(i)) {
            self.tap(color);
        }
    }

    fn teardown(&mut self) {
        self.core.teardown();
    }

    fn session(&self) -> &Session {
        &self.core.session
    }

    fn hud(&self) -> Vec<String> {
        vec![
            format!("Score: {}", self.core.session.score()),
            format!("Time: {}s", self.core.session.counter()),
            format!(
                "TAP THIS COLOR: {}",
                self.target.map_or("?", TapColor::name)
            ),
        ]
    }

    fn demo_input(&self) -> Option<InputEvent> {
        let target = self.target?;
        TapColor::ALL
            .iter()
            .position(|&c| c == target)
            .map(InputEvent::Button)
    }
}
