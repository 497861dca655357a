//! Time-based UUID generator and related types.

use std::{fmt, path::Path, sync, thread};

use crate::clock::{Advance, Clock, StdSystemTime, TimeSource, CLOCK_MASK};
use crate::node::{mac_string, NodeIdSource, MAX_NODE};
use crate::state::{StateFile, StateRecord};
use crate::{Config, Error, Format, Result, Uuid};

#[cfg(test)]
mod tests;

/// Represents a time-based UUID generator that combines a monotonic clock, a sequence number, and
/// a node identifier.
///
/// A generator is meant to be created once and shared: it is `Sync`, so it can be used from many
/// threads through a reference or an [`Arc`](sync::Arc). The clock and the sequence number are
/// guarded by an internal mutex.
///
/// # Examples
///
/// ```rust
/// use std::{sync, thread};
/// use tuuid::{node::FixedNode, Config, Format, Generator};
///
/// let g = sync::Arc::new(Generator::with_config(
///     Config::new().without_state_file(),
///     FixedNode(0x0123_4567_89ab),
/// )?);
/// thread::scope(|s| {
///     for i in 0..4 {
///         let g = sync::Arc::clone(&g);
///         s.spawn(move || {
///             for _ in 0..8 {
///                 println!("{} by thread {}", g.generate(Format::Teenie), i);
///                 thread::yield_now();
///             }
///         });
///     }
/// });
/// # Ok::<(), tuuid::Error>(())
/// ```
///
/// # Sequence number and state file
///
/// Unless disabled by [`Config`], the generator keeps its node identifier and sequence number in a
/// state file shared by all generators that point at the same path, in this and other processes.
/// Each new generator takes the next sequence number from the file, and so does a running
/// generator whenever it sees the clock behind its last emitted tick. If the file cannot be used,
/// the generator logs a warning and keeps the sequence number in memory.
#[derive(Debug)]
pub struct Generator<T = StdSystemTime> {
    node: u64,
    state_file: Option<StateFile>,
    inner: sync::Mutex<Inner<T>>,
}

#[derive(Debug)]
struct Inner<T> {
    sequence: u16,
    clock: Clock,
    time: T,
}

impl Generator {
    /// Creates a generator with the default configuration and the MAC address of this host as the
    /// node identifier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeIdentityUnavailable`] if a fresh node identifier is needed but no MAC
    /// address can be read.
    #[cfg(feature = "mac_address")]
    #[cfg_attr(docsrs, doc(cfg(feature = "mac_address")))]
    pub fn new() -> Result<Self> {
        Self::with_config(Config::default(), crate::node::HardwareNode)
    }

    /// Creates a generator that reads the system clock.
    ///
    /// `node_source` is consulted only if the state file does not hold a node identifier yet or
    /// persistence is unavailable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeIdentityUnavailable`] if a fresh node identifier is needed but
    /// `node_source` cannot provide one.
    pub fn with_config(config: Config, node_source: impl NodeIdSource) -> Result<Self> {
        Self::with_time_source(config, node_source, StdSystemTime)
    }
}

impl<T: TimeSource> Generator<T> {
    /// Creates a generator with a custom [`TimeSource`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeIdentityUnavailable`] if a fresh node identifier is needed but
    /// `node_source` cannot provide one.
    pub fn with_time_source(
        config: Config,
        mut node_source: impl NodeIdSource,
        time: T,
    ) -> Result<Self> {
        let mut fresh = || -> Result<StateRecord> {
            let node = node_source
                .resolve()
                .ok_or(Error::NodeIdentityUnavailable)?;
            Ok(StateRecord {
                node: node & MAX_NODE,
                sequence: rand::random(),
                last_clock: 0,
            })
        };

        let state_file = config
            .state_path
            .resolve()
            .map(|path| StateFile::new(path, config.file_mode));
        let (record, state_file) = match state_file {
            Some(state_file) => match state_file.initialize(&mut fresh) {
                Ok(record) => (record, Some(state_file)),
                Err(err @ Error::PersistenceUnavailable { .. }) => {
                    tracing::warn!("{err}; keeping sequence number in memory");
                    (fresh()?, None)
                }
                Err(err) => return Err(err),
            },
            None => (fresh()?, None),
        };

        Ok(Self {
            node: record.node,
            state_file,
            inner: sync::Mutex::new(Inner {
                sequence: record.sequence,
                clock: Clock::new(record.last_clock & CLOCK_MASK),
                time,
            }),
        })
    }

    /// Generates a new identifier and returns its string representation in `format`.
    pub fn generate(&self, format: Format) -> String {
        format.render(&self.generate_uuid())
    }

    /// Generates a new identifier in the format named by `token`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] if `token` is unknown. The generator state is not touched
    /// in that case.
    pub fn generate_as(&self, token: &str) -> Result<String> {
        let format = token.parse::<Format>()?;
        Ok(self.generate(format))
    }

    /// Generates a new identifier.
    pub fn generate_uuid(&self) -> Uuid {
        loop {
            {
                let mut inner = self.lock();
                let now = inner.time.now_ticks();
                match inner.clock.advance(now) {
                    Advance::Ticked(tick) => return self.assemble(tick, inner.sequence),
                    Advance::Rewound(tick) => {
                        tracing::trace!(tick, last = inner.clock.last(), "clock moved backwards");
                        self.roll_sequence(&mut inner);
                        inner.clock.rewind(tick);
                        return self.assemble(tick, inner.sequence);
                    }
                    Advance::Exhausted => {}
                }
            }
            thread::yield_now();
        }
    }

    /// Returns an infinite iterator that generates a new identifier for each call of `next()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tuuid::{node::FixedNode, Config, Generator};
    ///
    /// let g = Generator::with_config(Config::new().without_state_file(), FixedNode(1))?;
    /// g.iter()
    ///     .enumerate()
    ///     .skip(4)
    ///     .take(4)
    ///     .for_each(|(i, e)| println!("[{}] {}", i, e));
    /// # Ok::<(), tuuid::Error>(())
    /// ```
    pub fn iter(&self) -> impl Iterator<Item = Uuid> + '_ {
        std::iter::repeat_with(move || self.generate_uuid())
    }

    /// Takes a new sequence number, from the state file if there is one, and returns it.
    pub fn next_sequence(&self) -> u16 {
        let mut inner = self.lock();
        self.roll_sequence(&mut inner);
        inner.sequence
    }

    /// Converts `value` from the `from` format to the `to` format.
    ///
    /// This does not use the generator state; it is the same as [`crate::translate`].
    pub fn translate(&self, value: &str, from: Format, to: Format) -> Result<String> {
        crate::translate(value, from, to)
    }

    fn assemble(&self, tick: u64, sequence: u16) -> Uuid {
        Uuid::from_tick(tick & ((1 << 60) - 1), sequence, self.node)
    }

    fn roll_sequence(&self, inner: &mut Inner<T>) {
        if let Some(state_file) = &self.state_file {
            let current = StateRecord {
                node: self.node,
                sequence: inner.sequence,
                last_clock: inner.clock.last(),
            };
            match state_file.rollover(current) {
                Ok(record) => {
                    inner.sequence = record.sequence;
                    return;
                }
                Err(err) => tracing::warn!("{err}; incrementing sequence number in memory"),
            }
        }
        inner.sequence = inner.sequence.wrapping_add(1);
    }
}

impl<T> Generator<T> {
    /// Returns the 48-bit node identifier.
    pub fn node_id(&self) -> u64 {
        self.node
    }

    /// Returns the path of the state file, or `None` if the sequence number is kept in memory.
    pub fn state_file(&self) -> Option<&Path> {
        self.state_file.as_ref().map(StateFile::path)
    }

    /// Returns the current sequence number.
    pub fn sequence(&self) -> u16 {
        self.lock().sequence
    }

    fn lock(&self) -> sync::MutexGuard<'_, Inner<T>> {
        // the guarded fields are plain integers that are never left half-updated
        self.inner
            .lock()
            .unwrap_or_else(sync::PoisonError::into_inner)
    }
}

impl<T> fmt::Display for Generator<T> {
    /// Returns the node identifier as a MAC address and the current sequence number.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MAC: {}  Sequence: {}",
            mac_string(self.node),
            self.sequence()
        )
    }
}
