//! Tile Memory
//!
//! Watch the tiles light up, then repeat the pattern. Each cleared round adds
//! one more tile to the sequence; one wrong tap ends the game.

use glam::Vec2;

use super::MiniGame;
use crate::consts::*;
use crate::input::{InputEvent, hit_rects};
use crate::row_centers;
use crate::settings::{PlayArea, Settings, TileMemoryTuning};
use crate::sim::collision::Rect;
use crate::sim::scene::SceneCore;
use crate::sim::scoring::{ScoreEvent, ScoringRules};
use crate::sim::sequence::{MatchOutcome, SequenceMatcher};
use crate::sim::session::{EndReason, Session, SessionConfig};

/// Timed events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileEvent {
    /// Append a tile and start playback
    NextRound,
    Highlight(usize),
    Unhighlight(usize),
    /// Playback done, accept taps
    OpenInput,
}

#[derive(Debug, Clone)]
pub struct TileMemory {
    core: SceneCore<TileEvent>,
    matcher: SequenceMatcher,
    /// Tile currently lit during playback
    lit: Option<usize>,
    area: PlayArea,
    tuning: TileMemoryTuning,
    scoring: ScoringRules,
}

impl TileMemory {
    pub const ID: &'static str = "tap-tiles";

    pub fn new(settings: &Settings, seed: u64) -> Self {
        let tuning = settings.tiles;
        let session = Session::new(SessionConfig {
            initial_counter: 0,
            initial_difficulty: 0.0,
        });
        Self {
            core: SceneCore::new(session, seed, settings.restart),
            matcher: SequenceMatcher::new(tuning.tiles),
            lit: None,
            area: settings.play_area,
            tuning,
            scoring: settings.scoring,
        }
    }

    /// Registry factory
    pub fn create(settings: &Settings, seed: u64) -> Box<dyn MiniGame> {
        Box::new(Self::new(settings, seed))
    }

    pub fn matcher(&self) -> &SequenceMatcher {
        &self.matcher
    }

    pub fn lit(&self) -> Option<usize> {
        self.lit
    }

    /// Square grid of tile rects, row-major
    pub fn tiles(&self) -> Vec<Rect> {
        let count = self.matcher.tile_count();
        let cols = (count as f32).sqrt().ceil().max(1.0) as usize;
        let mut rects = Vec::with_capacity(count);
        let mut row = 0;
        while rects.len() < count {
            let in_row = cols.min(count - rects.len());
            let y = TILE_GRID_TOP + row as f32 * (TILE_SIZE + TILE_SPACING);
            for x in row_centers(in_row, TILE_SIZE, TILE_SPACING, self.area.width / 2.0) {
                rects.push(Rect::new(Vec2::new(x, y), Vec2::splat(TILE_SIZE)));
            }
            row += 1;
        }
        rects
    }

    /// Queue highlight/unhighlight pairs for the whole reference, then open input
    fn schedule_playback(&mut self) {
        let (flashes, open_at) = self.matcher.playback(
            self.tuning.lead_in_ms,
            self.tuning.interval_ms,
            self.tuning.settle_ms,
        );
        for (offset, tile) in flashes {
            self.core.after(offset, TileEvent::Highlight(tile));
            self.core
                .after(offset + self.tuning.highlight_ms, TileEvent::Unhighlight(tile));
        }
        self.core.after(open_at, TileEvent::OpenInput);
    }

    fn tap(&mut self, tile: usize) {
        match self.matcher.submit(tile) {
            MatchOutcome::Ignored | MatchOutcome::Advanced { .. } => {}
            MatchOutcome::RoundComplete { length } => {
                let delta = self.scoring.evaluate(ScoreEvent::SequenceRound, &self.core.session);
                self.core.session.apply(delta);
                log::debug!("Round of {} cleared", length);
                self.core
                    .after(self.tuning.next_round_delay_ms, TileEvent::NextRound);
            }
            MatchOutcome::Mismatch {
                position,
                expected,
                actual,
            } => {
                log::debug!(
                    "Tile {} at position {}, expected {}",
                    actual,
                    position,
                    expected
                );
                self.lit = None;
                self.core.end_session(EndReason::WrongInput);
            }
        }
    }
}

impl MiniGame for TileMemory {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn init(&mut self) {
        self.core
            .after(self.tuning.first_round_delay_ms, TileEvent::NextRound);
    }

    fn tick(&mut self, dt_ms: u64) {
        self.core.advance(dt_ms);
        while let Some(event) = self.core.next_event() {
            match event {
                TileEvent::NextRound => {
                    let tile = self.matcher.begin_round(&mut self.core.rng);
                    log::debug!(
                        "Round {} starts, appended tile {}",
                        self.matcher.reference().len(),
                        tile
                    );
                    self.schedule_playback();
                }
                TileEvent::Highlight(tile) => self.lit = Some(tile),
                TileEvent::Unhighlight(tile) => {
                    if self.lit == Some(tile) {
                        self.lit = None;
                    }
                }
                TileEvent::OpenInput => self.matcher.open_input(),
            }
        }
    }

    fn handle_input(&mut self, event: InputEvent) {
        if self.core.intercept_input(&event) {
            return;
        }
        let index = match event {
            InputEvent::Button(index) => Some(index),
            InputEvent::PointerDown(pos) => hit_rects(&self.tiles(), pos),
            _ => None,
        };
        if let Some(tile) = index.filter(|&i| i < self.matcher.tile_count()) {
            self.tap(tile);
        }
    }

    fn teardown(&mut self) {
        self.core.teardown();
        self.matcher.close();
        self.lit = None;
    }

    fn session(&self) -> &Session {
        &self.core.session
    }

    fn hud(&self) -> Vec<String> {
        let prompt = if self.matcher.is_accepting() {
            "Your turn!"
        } else {
            "Watch the sequence..."
        };
        vec![
            format!("Score: {}", self.core.session.score()),
            format!("Level: {}", self.matcher.reference().len()),
            prompt.to_string(),
        ]
    }

    fn demo_input(&self) -> Option<InputEvent> {
        self.matcher.expected_tile().map(InputEvent::Button)
    }
}
