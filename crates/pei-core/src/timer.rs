//! Cancellable timers on a virtual clock.
//!
//! [`Timers`] never reads the wall clock. The owner moves time forward
//! explicitly and drains due timers one at a time with [`Timers::pop_due`],
//! which keeps every firing observable and the whole sequence
//! deterministic under test. A real-time driver only has to sleep for
//! [`Timers::until_next`] and then advance by the same amount.

use std::time::Duration;

/// Smallest interval a repeating timer may use.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Schedule {
    Once,
    Every(Duration),
}

#[derive(Debug, Clone)]
struct Entry {
    id: TimerId,
    due: Duration,
    schedule: Schedule,
}

/// A set of timers sharing one virtual clock.
#[derive(Debug, Default)]
pub struct Timers {
    now: Duration,
    entries: Vec<Entry>,
    next_id: u64,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time, measured from creation.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule a repeating timer. The first firing is one `interval` from
    /// now. Intervals shorter than [`MIN_INTERVAL`] are raised to it.
    pub fn every(&mut self, interval: Duration) -> TimerId {
        let interval = interval.max(MIN_INTERVAL);
        self.schedule(interval, Schedule::Every(interval))
    }

    /// Schedule a one-shot timer firing `delay` from now.
    pub fn once(&mut self, delay: Duration) -> TimerId {
        self.schedule(delay, Schedule::Once)
    }

    fn schedule(&mut self, delay: Duration, schedule: Schedule) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            due: self.now + delay,
            schedule,
        });
        id
    }

    /// Cancel a timer. Returns `false` if it already fired (one-shot) or
    /// was cancelled before.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Cancel every pending timer, returning how many were pending.
    pub fn cancel_all(&mut self) -> usize {
        let n = self.entries.len();
        self.entries.clear();
        n
    }

    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Absolute virtual time of the earliest pending firing.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.iter().map(|e| e.due).min()
    }

    /// Time left until the earliest pending firing.
    pub fn until_next(&self) -> Option<Duration> {
        self.next_deadline()
            .map(|due| due.saturating_sub(self.now))
    }

    /// Fire the earliest timer due at or before `until`.
    ///
    /// The clock moves to the firing time. Repeating timers are rescheduled
    /// one interval later; one-shot timers are removed. Ties fire in
    /// scheduling order.
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerId> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= until)
            .min_by_key(|(_, e)| (e.due, e.id))
            .map(|(i, _)| i)?;

        let due = self.entries[idx].due;
        if due > self.now {
            self.now = due;
        }

        let id = self.entries[idx].id;
        match self.entries[idx].schedule {
            Schedule::Every(interval) => self.entries[idx].due = due + interval,
            Schedule::Once => {
                self.entries.swap_remove(idx);
            }
        }
        Some(id)
    }

    /// Move the clock to `until` once nothing else is due before it.
    pub fn settle(&mut self, until: Duration) {
        if until > self.now {
            self.now = until;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn once_fires_exactly_once() {
        let mut timers = Timers::new();
        let id = timers.once(ms(100));

        assert_eq!(timers.pop_due(ms(99)), None);
        assert_eq!(timers.pop_due(ms(100)), Some(id));
        assert_eq!(timers.pop_due(ms(10_000)), None);
        assert_eq!(timers.now(), ms(100));
    }

    #[test]
    fn every_reschedules_after_firing() {
        let mut timers = Timers::new();
        let id = timers.every(ms(500));

        let mut fired = Vec::new();
        while let Some(t) = timers.pop_due(ms(1600)) {
            fired.push((t, timers.now()));
        }
        assert_eq!(fired, vec![(id, ms(500)), (id, ms(1000)), (id, ms(1500))]);
        assert_eq!(timers.until_next(), Some(ms(500)));
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut timers = Timers::new();
        let tick = timers.every(ms(10));
        let done = timers.once(ms(15));

        assert!(timers.cancel(tick));
        assert!(!timers.cancel(tick));
        assert_eq!(timers.pop_due(ms(100)), Some(done));
        assert_eq!(timers.pop_due(ms(100)), None);
    }

    #[test]
    fn cancel_all_clears_everything() {
        let mut timers = Timers::new();
        timers.every(ms(10));
        timers.once(ms(20));
        assert_eq!(timers.cancel_all(), 2);
        assert_eq!(timers.pending(), 0);
        assert_eq!(timers.next_deadline(), None);
    }

    #[test]
    fn ties_fire_in_scheduling_order() {
        let mut timers = Timers::new();
        let a = timers.once(ms(50));
        let b = timers.once(ms(50));
        assert_eq!(timers.pop_due(ms(50)), Some(a));
        assert_eq!(timers.pop_due(ms(50)), Some(b));
    }

    #[test]
    fn zero_interval_is_raised() {
        let mut timers = Timers::new();
        timers.every(Duration::ZERO);
        assert_eq!(timers.until_next(), Some(MIN_INTERVAL));
    }

    #[test]
    fn settle_never_moves_backwards() {
        let mut timers = Timers::new();
        timers.settle(ms(30));
        timers.settle(ms(10));
        assert_eq!(timers.now(), ms(30));
        timers.once(ms(5));
        assert_eq!(timers.next_deadline(), Some(ms(35)));
    }
}
