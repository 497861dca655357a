//! Time-based UUIDs with a persistent sequence number and a compact base-62 encoding
//!
//! ```rust
//! use tuuid::{node::FixedNode, Config, Format, Generator};
//!
//! let g = Generator::with_config(Config::new().without_state_file(), FixedNode(0x0123_4567_89ab))?;
//! println!("{}", g.generate(Format::Default)); // e.g. "6e3a45a0-5e2b-013e-a5f2-0123456789ab"
//! println!("{}", g.generate(Format::Teenie)); // e.g. "khW912pG6850C3BLj4OW1M00"
//! # Ok::<(), tuuid::Error>(())
//! ```
//!
//! [`Generator::new`] uses the MAC address of the host as the node identifier and keeps the
//! sequence number in a state file shared by every generator on the host; see [`Config`] for the
//! location of the file.
//!
//! # Field and bit layout
//!
//! This implementation produces identifiers with the following bit layout:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                           time_low                            |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |           time_mid            |      time_hi_and_version      |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |           clock_seq           |          node (0-1)           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                          node (2-5)                           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Where:
//!
//! - `time_low`, `time_mid` and the lower 12 bits of `time_hi_and_version` hold a 60-bit clock
//!   tick, the number of 100-nanosecond intervals since the Unix epoch with the lowest 4 bits
//!   cleared.
//! - [`VERSION_TAG`] (`0x0100`) is OR'd into `time_hi_and_version`.
//! - The 16-bit `clock_seq` field holds the sequence number of the generator.
//! - The 48-bit `node` field holds the node identifier, usually a MAC address.
//!
//! Identifiers requested within the same clock tick get the tick plus one; a tick that repeats or
//! goes backwards rolls the sequence number over instead. After
//! [`MAX_DRIFT`](clock::MAX_DRIFT) collisions within one tick the generator waits for the clock to
//! move.
//!
//! # Formats
//!
//! Identifiers are rendered in one of four [`Format`]s and can be converted between them:
//!
//! ```rust
//! use tuuid::{translate_str, validate, validate_teenie};
//!
//! let teenie = translate_str("urn:uuid:6e3a45a0-5e2b-013e-a5f2-0123456789ab", "urn", "teenie")?;
//! assert_eq!(teenie, "khW912pG6850C3BLj4OW1M00");
//! assert!(validate_teenie(&teenie));
//! assert!(validate(&translate_str(&teenie, "teenie", "compact")?));
//! # Ok::<(), tuuid::Error>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod base62;
pub mod clock;
pub mod node;
pub mod state;

mod config;
pub use config::{Config, StatePath, ENV_STATE_FILE};

mod error;
pub use error::{Error, Result};

mod format;
pub use format::{translate, translate_str, validate, validate_teenie, Format, TEENIE_LEN};

mod generator;
pub use generator::Generator;

#[doc(inline)]
pub use clock::{StdSystemTime, TimeSource};
#[doc(inline)]
pub use node::NodeIdSource;

mod uuid;
pub use uuid::{Uuid, VERSION_TAG};
