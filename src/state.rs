//! Generator state persisted across processes
//!
//! Every generator that points at the same state file takes a distinct sequence number from it.
//! Reads and writes happen under an exclusive advisory lock on the file, so concurrent processes
//! queue up instead of handing out the same number twice.
//!
//! # Record layout
//!
//! The record is 32 bytes long. All integers are big-endian:
//!
//! | Offset | Size | Field                          |
//! | ------ | ---- | ------------------------------ |
//! | 0      | 2    | upper 16 bits of node          |
//! | 2      | 4    | lower 32 bits of node          |
//! | 6      | 4    | sequence number                |
//! | 10     | 8    | last clock tick                |
//! | 18     | 14   | reserved, zero                 |
//!
//! Readers accept any record that holds at least the first 18 bytes.

use std::{
    fs, io,
    io::{Read, Seek, Write},
    path::{Path, PathBuf},
};

use fs2::FileExt;

use crate::{Error, Result};

/// Length of an encoded [`StateRecord`].
pub const RECORD_LEN: usize = 32;

/// Length of the meaningful prefix of an encoded [`StateRecord`].
const PACKED_LEN: usize = 18;

/// Node identifier, sequence number and last clock tick shared through a state file.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct StateRecord {
    /// 48-bit node identifier.
    pub node: u64,

    /// Next sequence number to hand out.
    pub sequence: u16,

    /// Last clock tick observed by the writer.
    pub last_clock: u64,
}

impl StateRecord {
    /// Encodes the record into its fixed-width binary layout.
    pub fn to_bytes(&self) -> [u8; RECORD_LEN] {
        let mut buffer = [0u8; RECORD_LEN];
        buffer[0..2].copy_from_slice(&((self.node >> 32) as u16).to_be_bytes());
        buffer[2..6].copy_from_slice(&(self.node as u32).to_be_bytes());
        buffer[6..10].copy_from_slice(&u32::from(self.sequence).to_be_bytes());
        buffer[10..18].copy_from_slice(&self.last_clock.to_be_bytes());
        buffer
    }

    /// Decodes a record, returning `None` if `src` is shorter than the packed fields.
    ///
    /// Only the lower 16 bits of the stored sequence number are kept.
    pub fn from_bytes(src: &[u8]) -> Option<Self> {
        let src: &[u8; PACKED_LEN] = src.get(..PACKED_LEN)?.try_into().ok()?;
        let [n0, n1, n2, n3, n4, n5, s0, s1, s2, s3, c @ ..] = *src;
        Some(Self {
            node: u64::from_be_bytes([0, 0, n0, n1, n2, n3, n4, n5]),
            sequence: u32::from_be_bytes([s0, s1, s2, s3]) as u16,
            last_clock: u64::from_be_bytes(c),
        })
    }
}

/// A state file shared by generators in one or more processes.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct StateFile {
    path: PathBuf,
    mode: u32,
}

impl StateFile {
    /// Creates a handle; the file itself is created on first use with the `mode` permission bits
    /// (ignored on non-Unix platforms).
    pub fn new(path: impl Into<PathBuf>, mode: u32) -> Self {
        Self {
            path: path.into(),
            mode,
        }
    }

    /// Returns the path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Prepares the state of a starting generator.
    ///
    /// If the file holds a record, this increments its sequence number like [`rollover`] does and
    /// returns the updated record. Otherwise it writes and returns the record built by `fresh`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PersistenceUnavailable`] if the file cannot be opened, locked, read or
    /// written, or if it holds a truncated record. Errors from `fresh` are passed through.
    ///
    /// [`rollover`]: StateFile::rollover
    pub fn initialize<F>(&self, fresh: F) -> Result<StateRecord>
    where
        F: FnOnce() -> Result<StateRecord>,
    {
        self.fetch_and_increment(0, fresh)
    }

    /// Takes the next sequence number from the file.
    ///
    /// The stored sequence number is incremented and written back together with the stored node
    /// identifier and the later of the stored and `current` clock ticks. If the file has
    /// disappeared, a fresh record with `current`'s sequence number plus one is written instead.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PersistenceUnavailable`] on I/O failure or a truncated record.
    pub fn rollover(&self, current: StateRecord) -> Result<StateRecord> {
        self.fetch_and_increment(current.last_clock, || {
            tracing::debug!(path = %self.path.display(), "state file vanished, recreating");
            Ok(StateRecord {
                sequence: current.sequence.wrapping_add(1),
                ..current
            })
        })
    }

    fn fetch_and_increment<F>(&self, last_clock: u64, fresh: F) -> Result<StateRecord>
    where
        F: FnOnce() -> Result<StateRecord>,
    {
        let mut file = self.open_locked()?;

        let mut buffer = Vec::with_capacity(RECORD_LEN);
        file.read_to_end(&mut buffer).map_err(|e| self.error(e))?;

        let record = if buffer.is_empty() {
            let record = fresh()?;
            tracing::debug!(path = %self.path.display(), sequence = record.sequence, "created state file");
            record
        } else {
            let stored = StateRecord::from_bytes(&buffer).ok_or_else(|| {
                self.error(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("truncated state record of {} bytes", buffer.len()),
                ))
            })?;
            let record = StateRecord {
                sequence: stored.sequence.wrapping_add(1),
                last_clock: stored.last_clock.max(last_clock),
                ..stored
            };
            tracing::debug!(path = %self.path.display(), sequence = record.sequence, "rolled over sequence");
            record
        };

        self.overwrite(&mut file, &record)
            .map_err(|e| self.error(e))?;
        FileExt::unlock(&file).map_err(|e| self.error(e))?;
        Ok(record)
    }

    fn open_locked(&self) -> Result<fs::File> {
        let mut options = fs::OpenOptions::new();
        options.read(true).write(true).create(true);
        #[cfg(unix)]
        std::os::unix::fs::OpenOptionsExt::mode(&mut options, self.mode);

        let file = options.open(&self.path).map_err(|e| self.error(e))?;
        file.lock_exclusive().map_err(|e| self.error(e))?;
        Ok(file)
    }

    fn overwrite(&self, file: &mut fs::File, record: &StateRecord) -> io::Result<()> {
        file.set_len(0)?;
        file.rewind()?;
        file.write_all(&record.to_bytes())?;
        file.sync_data()
    }

    fn error(&self, source: io::Error) -> Error {
        Error::PersistenceUnavailable {
            path: self.path.clone(),
            source,
        }
    }
}
