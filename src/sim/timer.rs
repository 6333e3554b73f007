//! Millisecond timer scheduler
//!
//! Timers carry a typed event instead of a closure. The owning scene drains
//! due events one at a time and applies them to its own state, so nothing
//! captures the scene mutably across a wait.
//!
//! - One-shot timers fire once and are removed
//! - Repeating timers fire once per elapsed period until cancelled
//! - Due timers fire in (due time, scheduling order)

/// Opaque reference to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u32);

#[derive(Debug, Clone)]
struct Timer<E> {
    handle: TimerHandle,
    due_ms: u64,
    period_ms: Option<u64>,
    /// Scheduling order, breaks ties between timers due at the same instant
    seq: u64,
    event: E,
}

/// Single-threaded scheduler for one-shot and repeating timers
#[derive(Debug, Clone)]
pub struct TimerScheduler<E> {
    now_ms: u64,
    horizon_ms: u64,
    next_handle: u32,
    next_seq: u64,
    timers: Vec<Timer<E>>,
}

impl<E> Default for TimerScheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> TimerScheduler<E> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            horizon_ms: 0,
            next_handle: 1,
            next_seq: 0,
            timers: Vec::new(),
        }
    }

    /// Scheduler-local clock. While draining this is the firing time of the
    /// event most recently returned.
    #[inline]
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of outstanding timers
    #[inline]
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.timers.iter().any(|t| t.handle == handle)
    }

    /// Schedule `event` once, `delay_ms` from now
    pub fn after(&mut self, delay_ms: u64, event: E) -> TimerHandle {
        self.insert(delay_ms, None, event)
    }

    /// Schedule `event` every `period_ms`, first firing one period from now.
    /// A zero period is treated as 1 ms so a drain always terminates.
    pub fn every(&mut self, period_ms: u64, event: E) -> TimerHandle {
        let period = period_ms.max(1);
        self.insert(period, Some(period), event)
    }

    fn insert(&mut self, delay_ms: u64, period_ms: Option<u64>, event: E) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.push(Timer {
            handle,
            due_ms: self.now_ms + delay_ms,
            period_ms,
            seq,
            event,
        });
        handle
    }

    /// Cancel a timer. Returns false when the handle already fired (one-shot)
    /// or was cancelled before; that is not an error.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.handle != handle);
        self.timers.len() != before
    }

    /// Drop every outstanding timer
    pub fn clear(&mut self) {
        if !self.timers.is_empty() {
            log::debug!("Cancelling {} outstanding timers", self.timers.len());
        }
        self.timers.clear();
    }

    /// Move the drain horizon `dt_ms` past the current horizon. Follow with
    /// [`pop_due`](Self::pop_due) until it returns `None`.
    pub fn advance(&mut self, dt_ms: u64) {
        self.horizon_ms = self.horizon_ms.max(self.now_ms) + dt_ms;
    }
}

impl<E: Clone> TimerScheduler<E> {
    /// Pop the earliest timer due at or before the horizon.
    ///
    /// The clock jumps to that timer's due time, so timers scheduled while
    /// handling the event are relative to when it fired. Once nothing is due
    /// the clock settles on the horizon and `None` is returned.
    pub fn pop_due(&mut self) -> Option<E> {
        let horizon = self.horizon_ms;
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= horizon)
            .min_by_key(|(_, t)| (t.due_ms, t.seq))
            .map(|(i, _)| i);

        let Some(idx) = idx else {
            self.now_ms = horizon;
            return None;
        };

        let due = self.timers[idx].due_ms;
        self.now_ms = self.now_ms.max(due);

        match self.timers[idx].period_ms {
            Some(period) => {
                let seq = self.next_seq;
                self.next_seq += 1;
                let timer = &mut self.timers[idx];
                timer.due_ms += period;
                timer.seq = seq;
                Some(timer.event.clone())
            }
            None => Some(self.timers.swap_remove(idx).event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(timers: &mut TimerScheduler<&'static str>, dt: u64) -> Vec<(&'static str, u64)> {
        timers.advance(dt);
        let mut fired = Vec::new();
        while let Some(e) = timers.pop_due() {
            fired.push((e, timers.now_ms()));
        }
        fired
    }

    #[test]
    fn test_one_shot_fires_once() {
        let mut timers = TimerScheduler::new();
        timers.after(500, "drop");

        assert!(drain(&mut timers, 499).is_empty());
        assert_eq!(drain(&mut timers, 1), vec![("drop", 500)]);
        assert!(drain(&mut timers, 10_000).is_empty());
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn test_repeating_fires_each_period() {
        let mut timers = TimerScheduler::new();
        timers.every(1000, "second");

        let fired = drain(&mut timers, 3500);
        assert_eq!(fired, vec![("second", 1000), ("second", 2000), ("second", 3000)]);
        assert_eq!(timers.now_ms(), 3500);
        assert_eq!(timers.pending(), 1);
    }

    #[test]
    fn test_fire_order_by_due_then_schedule_order() {
        let mut timers = TimerScheduler::new();
        timers.after(200, "b");
        timers.after(100, "a");
        timers.after(200, "c");

        let names: Vec<_> = drain(&mut timers, 200).into_iter().map(|(e, _)| e).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut timers = TimerScheduler::new();
        let tick = timers.every(1000, "tick");
        assert!(timers.cancel(tick));
        assert!(!timers.cancel(tick));
        assert!(drain(&mut timers, 5000).is_empty());

        let once = timers.after(10, "once");
        drain(&mut timers, 10);
        assert!(!timers.cancel(once), "fired one-shot is gone");
    }

    #[test]
    fn test_scheduled_during_drain_is_relative_to_firing_time() {
        let mut timers = TimerScheduler::new();
        timers.after(100, "first");
        timers.advance(1000);

        assert_eq!(timers.pop_due(), Some("first"));
        assert_eq!(timers.now_ms(), 100);
        timers.after(200, "chained");
        assert_eq!(timers.pop_due(), Some("chained"));
        assert_eq!(timers.now_ms(), 300);
        assert_eq!(timers.pop_due(), None);
        assert_eq!(timers.now_ms(), 1000);
    }
}
