//! Timer struct and flags

use std::time::{Duration, Instant};

use bitflags::bitflags;
use slotmap::new_key_type;

new_key_type! {
    /// Key for registered timers
    pub struct TimerKey;
}

bitflags! {
    /// Flags that control timer behavior
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TimerFlags: u32 {
        /// Timer repeats at the specified interval until cancelled
        const REPEAT = 0x01;
        /// Timer is automatically removed when the map changes
        const STOP_ON_MAPCHANGE = 0x02;
    }
}

/// Callback type run against state `S`
pub(crate) type TimerCallback<S> = Box<dyn FnMut(&mut S) + Send + 'static>;

/// A scheduled timer that fires a callback after a delay
pub(crate) struct Timer<S> {
    /// Human-readable name for logging
    pub name: &'static str,
    /// Time between executions (or delay for one-shot timers)
    pub interval: Duration,
    /// The callback to execute
    pub callback: TimerCallback<S>,
    /// Behavior flags
    pub flags: TimerFlags,
    /// When this timer should next fire
    pub next_fire: Instant,
}

impl<S> Timer<S> {
    /// Create a new timer scheduled relative to `now`
    pub fn new<F>(
        name: &'static str,
        interval: Duration,
        flags: TimerFlags,
        now: Instant,
        callback: F,
    ) -> Self
    where
        F: FnMut(&mut S) + Send + 'static,
    {
        Self {
            name,
            interval,
            callback: Box::new(callback),
            flags,
            next_fire: now + interval,
        }
    }

    /// Whether the timer repeats
    pub fn repeats(&self) -> bool {
        self.flags.contains(TimerFlags::REPEAT)
    }
}
