//! Monotonic clock tick computation

/// Number of 100-nanosecond ticks per second.
pub const TICKS_PER_SECOND: u64 = 10_000_000;

/// Mask applied to wall-clock ticks: keeps 60 bits and drops the lowest 4, which are below the
/// resolution the clock is trusted with.
pub const CLOCK_MASK: u64 = 0x0fff_ffff_ffff_fff0;

/// Number of same-tick collisions after which the generator waits for the clock to move instead
/// of synthesizing another tick.
pub const MAX_DRIFT: u32 = 10_000;

/// A trait that defines the minimum system clock interface for [`Generator`](crate::Generator).
pub trait TimeSource {
    /// Returns the current time as the number of 100-nanosecond intervals since the Unix epoch.
    fn now_ticks(&mut self) -> u64;
}

/// The default [`TimeSource`] that uses [`std::time::SystemTime`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct StdSystemTime;

impl TimeSource for StdSystemTime {
    fn now_ticks(&mut self) -> u64 {
        use std::time;
        let elapsed = time::SystemTime::now()
            .duration_since(time::UNIX_EPOCH)
            .expect("clock may have gone backwards");
        elapsed.as_secs() * TICKS_PER_SECOND + (elapsed.subsec_nanos() / 100) as u64
    }
}

/// Result of [`Clock::advance`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Advance {
    /// The tick to emit; it is now the last emitted tick.
    Ticked(u64),

    /// Too many collisions within the current tick; nothing changed and the caller should yield
    /// and read the clock again.
    Exhausted,

    /// The clock is behind the last emitted tick. The caller must roll the sequence number over
    /// and then call [`Clock::rewind`] with the carried tick.
    Rewound(u64),
}

/// Tracks the last emitted tick and the number of collisions within it.
///
/// # Examples
///
/// ```rust
/// use tuuid::clock::{Advance, Clock};
///
/// let mut clock = Clock::new(0);
/// let now = 0x01d4_ab4a_f4e2_3b60;
/// assert_eq!(clock.advance(now), Advance::Ticked(now));
/// assert_eq!(clock.advance(now), Advance::Ticked(now + 1));
/// assert_eq!(clock.advance(now), Advance::Rewound(now));
/// ```
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Clock {
    last: u64,
    drift: u32,
}

impl Clock {
    /// Creates a clock whose last emitted tick is `last`.
    pub const fn new(last: u64) -> Self {
        Self { last, drift: 0 }
    }

    /// Returns the last emitted tick.
    pub const fn last(&self) -> u64 {
        self.last
    }

    /// Computes the next tick from a wall-clock reading in 100-nanosecond intervals.
    pub fn advance(&mut self, now_ticks: u64) -> Advance {
        let tick = now_ticks & CLOCK_MASK;
        if tick > self.last {
            self.drift = 0;
            self.last = tick;
            Advance::Ticked(tick)
        } else if tick == self.last {
            self.drift += 1;
            if self.drift < MAX_DRIFT {
                self.last += 1;
                Advance::Ticked(self.last)
            } else {
                // saturate so that waiting does not overflow the counter
                self.drift = MAX_DRIFT;
                Advance::Exhausted
            }
        } else {
            Advance::Rewound(tick)
        }
    }

    /// Adopts `tick` as the last emitted tick after a sequence rollover.
    pub fn rewind(&mut self, tick: u64) {
        self.last = tick;
    }
}
