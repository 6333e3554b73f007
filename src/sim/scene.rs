//! Shared per-instance plumbing for every mini-game
//!
//! Bundles the session, the timer scheduler and the seeded RNG, and owns the
//! single `end_session` path that every terminal condition funnels through.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::session::{EndReason, GameOver, Session};
use super::timer::{TimerHandle, TimerScheduler};
use crate::input::InputEvent;

/// How an ended session gets restarted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RestartPolicy {
    /// Restart automatically after a fixed delay
    AfterDelay { delay_ms: u64 },
    /// Restart on the next tap on the game-over overlay
    OnTap,
}

impl Default for RestartPolicy {
    fn default() -> Self {
        RestartPolicy::AfterDelay {
            delay_ms: crate::consts::RESTART_DELAY_MS,
        }
    }
}

/// What the scheduler carries: game events plus the restart itself
#[derive(Debug, Clone, PartialEq)]
pub enum Scheduled<E> {
    Game(E),
    Restart,
}

/// Session + timers + RNG of one game instance
#[derive(Debug, Clone)]
pub struct SceneCore<E> {
    pub session: Session,
    pub rng: Pcg32,
    timers: TimerScheduler<Scheduled<E>>,
    restart: RestartPolicy,
}

impl<E: Clone> SceneCore<E> {
    pub fn new(session: Session, seed: u64, restart: RestartPolicy) -> Self {
        Self {
            session,
            rng: Pcg32::seed_from_u64(seed),
            timers: TimerScheduler::new(),
            restart,
        }
    }

    pub fn restart_policy(&self) -> RestartPolicy {
        self.restart
    }

    /// Scene clock in milliseconds
    pub fn now_ms(&self) -> u64 {
        self.timers.now_ms()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    /// One-shot game event. Refused once the session has left `Active`.
    pub fn after(&mut self, delay_ms: u64, event: E) -> Option<TimerHandle> {
        if !self.session.is_active() {
            return None;
        }
        Some(self.timers.after(delay_ms, Scheduled::Game(event)))
    }

    /// Repeating game event. Refused once the session has left `Active`.
    pub fn every(&mut self, period_ms: u64, event: E) -> Option<TimerHandle> {
        if !self.session.is_active() {
            return None;
        }
        Some(self.timers.every(period_ms, Scheduled::Game(event)))
    }

    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.timers.cancel(handle)
    }

    /// Access to the raw scheduler for pool replenishment
    pub fn timers_mut(&mut self) -> &mut TimerScheduler<Scheduled<E>> {
        &mut self.timers
    }

    /// Advance the scene clock by one frame
    pub fn advance(&mut self, dt_ms: u64) {
        self.timers.advance(dt_ms);
    }

    /// Next due game event for this frame.
    ///
    /// The restart timer is consumed here (moving the session to
    /// `Restarting`). Game events surfacing outside `Active` are dropped.
    pub fn next_event(&mut self) -> Option<E> {
        while let Some(scheduled) = self.timers.pop_due() {
            match scheduled {
                Scheduled::Restart => {
                    if self.session.begin_restart() {
                        log::info!("Restarting after {} ms", self.timers.now_ms());
                    }
                }
                Scheduled::Game(event) if self.session.is_active() => return Some(event),
                Scheduled::Game(_) => {}
            }
        }
        None
    }

    /// Terminal transition. Cancels all outstanding timers and arranges the
    /// restart. Returns `None` if the session had already ended.
    pub fn end_session(&mut self, reason: EndReason) -> Option<GameOver> {
        let over = self.session.end(reason)?;
        self.timers.clear();
        if let RestartPolicy::AfterDelay { delay_ms } = self.restart {
            self.timers.after(delay_ms, Scheduled::Restart);
        }
        Some(over)
    }

    /// Input gate. Returns true when the event was consumed because the
    /// session is not active (a tap may trigger an `OnTap` restart).
    pub fn intercept_input(&mut self, event: &InputEvent) -> bool {
        if self.session.is_active() {
            return false;
        }
        if self.restart == RestartPolicy::OnTap && event.is_press() && self.session.begin_restart() {
            log::info!("Restart requested by tap");
        }
        true
    }

    /// Cancel everything (host is discarding the instance)
    pub fn teardown(&mut self) {
        self.timers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::session::{Phase, SessionConfig};
    use glam::Vec2;

    #[derive(Debug, Clone, PartialEq)]
    enum Ev {
        Tick,
        Spawn,
    }

    fn core(restart: RestartPolicy) -> SceneCore<Ev> {
        let session = Session::new(SessionConfig {
            initial_counter: 30,
            initial_difficulty: 0.0,
        });
        SceneCore::new(session, 1, restart)
    }

    fn drain(core: &mut SceneCore<Ev>, dt: u64) -> Vec<Ev> {
        core.advance(dt);
        std::iter::from_fn(|| core.next_event()).collect()
    }

    #[test]
    fn test_end_cancels_repeating_and_schedules_restart() {
        let mut core = core(RestartPolicy::default());
        core.every(1000, Ev::Tick);
        core.after(1500, Ev::Spawn);
        assert_eq!(drain(&mut core, 1000), vec![Ev::Tick]);

        assert!(core.end_session(EndReason::TimeUp).is_some());
        assert!(core.end_session(EndReason::Crashed).is_none());
        assert!(core.after(10, Ev::Spawn).is_none());

        assert!(drain(&mut core, 2999).is_empty());
        assert_eq!(core.session.phase(), Phase::Ending);
        assert!(drain(&mut core, 1).is_empty());
        assert_eq!(core.session.phase(), Phase::Restarting);
    }

    #[test]
    fn test_on_tap_restart() {
        let mut core = core(RestartPolicy::OnTap);
        core.end_session(EndReason::WrongInput);
        assert_eq!(core.pending_timers(), 0);

        assert!(core.intercept_input(&InputEvent::PointerMove(Vec2::ZERO)));
        assert_eq!(core.session.phase(), Phase::Ending);
        assert!(core.intercept_input(&InputEvent::PointerDown(Vec2::ZERO)));
        assert_eq!(core.session.phase(), Phase::Restarting);
    }

    #[test]
    fn test_input_passes_while_active() {
        let mut core = core(RestartPolicy::default());
        assert!(!core.intercept_input(&InputEvent::Button(0)));
    }
}
