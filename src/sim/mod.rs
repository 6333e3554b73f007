//! Deterministic session core
//!
//! Shared by every mini-game. This module must stay pure and deterministic:
//! - Time only advances through the timer scheduler
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod pool;
pub mod scene;
pub mod scoring;
pub mod sequence;
pub mod session;
pub mod timer;

pub use collision::{Rect, circle_rect_overlap, rect_rect_overlap};
pub use pool::{Entity, EntityId, EntityKind, EntityPool, Spawn};
pub use scene::{RestartPolicy, SceneCore, Scheduled};
pub use scoring::{ScoreDelta, ScoreEvent, ScoringRules};
pub use sequence::{MatchOutcome, SequenceMatcher};
pub use session::{EndReason, GameOver, Phase, Session, SessionConfig};
pub use timer::{TimerHandle, TimerScheduler};
