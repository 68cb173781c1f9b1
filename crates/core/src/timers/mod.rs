//! Timer system for scheduling delayed and repeating callbacks
//!
//! Timers are processed every game frame and can be configured to:
//! - Fire once after a delay
//! - Repeat at a fixed interval
//! - Be automatically cleaned up on map change
//!
//! Each callback receives the state it was registered against, so periodic
//! work (playtime flush, request sweep, bot cleanup) runs on the main thread
//! with exclusive access and no locking.
//!
//! # Example
//!
//! ```ignore
//! use std::time::{Duration, Instant};
//! use cs2prac_core::timers::{Timers, TimerFlags};
//!
//! let mut timers: Timers<u32> = Timers::new();
//! let key = timers.add_repeating("tick", Duration::from_millis(100), Instant::now(), |n| *n += 1);
//!
//! // In the frame hook
//! timers.process(Instant::now(), &mut counter);
//!
//! timers.remove(key);
//! ```

mod timer;

use std::time::{Duration, Instant};

use slotmap::SlotMap;

use timer::Timer;
pub use timer::{TimerFlags, TimerKey};

/// Timer registry owned by the main thread
pub struct Timers<S> {
    timers: SlotMap<TimerKey, Timer<S>>,
}

impl<S> Default for Timers<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Timers<S> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            timers: SlotMap::with_key(),
        }
    }

    /// Add a one-shot timer that fires after the specified delay
    pub fn add_timer<F>(&mut self, name: &'static str, delay: Duration, now: Instant, callback: F) -> TimerKey
    where
        F: FnMut(&mut S) + Send + 'static,
    {
        self.add_with_flags(name, delay, TimerFlags::empty(), now, callback)
    }

    /// Add a repeating timer that fires at the specified interval
    ///
    /// The timer will continue firing until cancelled via `remove`.
    pub fn add_repeating<F>(
        &mut self,
        name: &'static str,
        interval: Duration,
        now: Instant,
        callback: F,
    ) -> TimerKey
    where
        F: FnMut(&mut S) + Send + 'static,
    {
        self.add_with_flags(name, interval, TimerFlags::REPEAT, now, callback)
    }

    /// Add a timer with custom flags
    ///
    /// # Example
    ///
    /// ```ignore
    /// // Repeating timer that stops on map change
    /// let key = timers.add_with_flags(
    ///     "cleanup",
    ///     Duration::from_secs(1),
    ///     TimerFlags::REPEAT | TimerFlags::STOP_ON_MAPCHANGE,
    ///     Instant::now(),
    ///     |state| { /* ... */ },
    /// );
    /// ```
    pub fn add_with_flags<F>(
        &mut self,
        name: &'static str,
        interval: Duration,
        flags: TimerFlags,
        now: Instant,
        callback: F,
    ) -> TimerKey
    where
        F: FnMut(&mut S) + Send + 'static,
    {
        tracing::debug!(timer = name, ?interval, ?flags, "Timer added");
        self.timers
            .insert(Timer::new(name, interval, flags, now, callback))
    }

    /// Remove/cancel a timer
    ///
    /// Returns `true` if the timer was found and removed.
    pub fn remove(&mut self, key: TimerKey) -> bool {
        self.timers.remove(key).is_some()
    }

    /// Number of registered timers
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// Whether no timers are registered
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Fire every timer that is due at `now`
    ///
    /// One-shot timers are removed after firing, repeating timers are
    /// rescheduled one interval after `now`. Returns the number fired.
    pub fn process(&mut self, now: Instant, state: &mut S) -> usize {
        let mut fired = 0;
        let mut to_remove = Vec::new();

        for (key, timer) in self.timers.iter_mut() {
            if now < timer.next_fire {
                continue;
            }

            tracing::trace!(timer = timer.name, "Timer fired");
            (timer.callback)(state);
            fired += 1;

            if timer.repeats() {
                timer.next_fire = now + timer.interval;
            } else {
                to_remove.push(key);
            }
        }

        for key in to_remove {
            self.timers.remove(key);
        }

        fired
    }

    /// Remove all timers with the STOP_ON_MAPCHANGE flag
    pub fn remove_mapchange_timers(&mut self) -> usize {
        let before = self.timers.len();
        self.timers
            .retain(|_, timer| !timer.flags.contains(TimerFlags::STOP_ON_MAPCHANGE));
        let removed = before - self.timers.len();
        if removed > 0 {
            tracing::debug!("Removed {} timers on map change", removed);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_shot_fires_once() {
        let start = Instant::now();
        let mut timers: Timers<u32> = Timers::new();
        timers.add_timer("once", Duration::from_secs(5), start, |n| *n += 1);

        let mut count = 0;
        assert_eq!(timers.process(start + Duration::from_secs(4), &mut count), 0);
        assert_eq!(timers.process(start + Duration::from_secs(5), &mut count), 1);
        assert_eq!(timers.process(start + Duration::from_secs(20), &mut count), 0);
        assert_eq!(count, 1);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_repeating_reschedules() {
        let start = Instant::now();
        let mut timers: Timers<u32> = Timers::new();
        timers.add_repeating("tick", Duration::from_secs(60), start, |n| *n += 1);

        let mut count = 0;
        for minute in 1..=3 {
            timers.process(start + Duration::from_secs(60 * minute), &mut count);
        }
        assert_eq!(count, 3);
        assert_eq!(timers.len(), 1);
    }

    #[test]
    fn test_remove_timer() {
        let start = Instant::now();
        let mut timers: Timers<u32> = Timers::new();
        let key = timers.add_repeating("tick", Duration::from_secs(1), start, |n| *n += 1);

        assert!(timers.remove(key));
        assert!(!timers.remove(key));

        let mut count = 0;
        timers.process(start + Duration::from_secs(10), &mut count);
        assert_eq!(count, 0);
    }

    #[test]
    fn test_mapchange_timers_removed() {
        let start = Instant::now();
        let mut timers: Timers<()> = Timers::new();
        timers.add_with_flags(
            "map",
            Duration::from_secs(1),
            TimerFlags::REPEAT | TimerFlags::STOP_ON_MAPCHANGE,
            start,
            |_| {},
        );
        timers.add_repeating("global", Duration::from_secs(1), start, |_| {});

        assert_eq!(timers.remove_mapchange_timers(), 1);
        assert_eq!(timers.len(), 1);
    }
}
