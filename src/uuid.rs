use std::{fmt, str};

use fstr::FStr;

use crate::Error;

/// Version tag OR'd into the `time_hi_and_version` field of every generated identifier.
pub const VERSION_TAG: u16 = 0x0100;

/// Represents a time-based Universally Unique IDentifier as its 16-byte big-endian layout.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Uuid([u8; 16]);

impl Uuid {
    /// Nil UUID (00000000-0000-0000-0000-000000000000)
    pub const NIL: Self = Self([0x00; 16]);

    /// Max UUID (ffffffff-ffff-ffff-ffff-ffffffffffff)
    pub const MAX: Self = Self([0xff; 16]);

    /// Returns a reference to the underlying byte array.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Creates a UUID from its five field values.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a 48-bit integer.
    pub const fn from_fields(
        time_low: u32,
        time_mid: u16,
        time_hi_and_version: u16,
        clock_seq: u16,
        node: u64,
    ) -> Self {
        if node >= 1 << 48 {
            panic!("invalid field value");
        }

        Self([
            (time_low >> 24) as u8,
            (time_low >> 16) as u8,
            (time_low >> 8) as u8,
            time_low as u8,
            (time_mid >> 8) as u8,
            time_mid as u8,
            (time_hi_and_version >> 8) as u8,
            time_hi_and_version as u8,
            (clock_seq >> 8) as u8,
            clock_seq as u8,
            (node >> 40) as u8,
            (node >> 32) as u8,
            (node >> 24) as u8,
            (node >> 16) as u8,
            (node >> 8) as u8,
            node as u8,
        ])
    }

    /// Creates a UUID from a 60-bit clock tick, a clock sequence, and a 48-bit node identifier,
    /// tagging the `time_hi_and_version` field with [`VERSION_TAG`].
    ///
    /// # Panics
    ///
    /// Panics if `tick` is not a 60-bit integer or `node` is not a 48-bit integer.
    pub const fn from_tick(tick: u64, clock_seq: u16, node: u64) -> Self {
        if tick >= 1 << 60 {
            panic!("invalid field value");
        }

        Self::from_fields(
            tick as u32,
            (tick >> 32) as u16,
            ((tick >> 48) as u16 & 0x0fff) | VERSION_TAG,
            clock_seq,
            node,
        )
    }

    /// Returns the `time_low` field.
    pub const fn time_low(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    /// Returns the `time_mid` field.
    pub const fn time_mid(&self) -> u16 {
        u16::from_be_bytes([self.0[4], self.0[5]])
    }

    /// Returns the `time_hi_and_version` field.
    pub const fn time_hi_and_version(&self) -> u16 {
        u16::from_be_bytes([self.0[6], self.0[7]])
    }

    /// Returns the `clock_seq` field.
    pub const fn clock_seq(&self) -> u16 {
        u16::from_be_bytes([self.0[8], self.0[9]])
    }

    /// Returns the 48-bit `node` field.
    pub const fn node(&self) -> u64 {
        let b = &self.0;
        u64::from_be_bytes([0, 0, b[10], b[11], b[12], b[13], b[14], b[15]])
    }

    /// Returns the five fields in layout order.
    pub const fn fields(&self) -> (u32, u16, u16, u16, u64) {
        (
            self.time_low(),
            self.time_mid(),
            self.time_hi_and_version(),
            self.clock_seq(),
            self.node(),
        )
    }

    /// Returns the 8-4-4-4-12 hexadecimal string representation stored in a stack-allocated
    /// string.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tuuid::Uuid;
    ///
    /// let x = "6e3a45a0-5e2b-013e-a5f2-0123456789ab".parse::<Uuid>()?;
    /// let y = x.encode();
    /// assert_eq!(&y as &str, "6e3a45a0-5e2b-013e-a5f2-0123456789ab");
    /// assert_eq!(format!("{}", y), "6e3a45a0-5e2b-013e-a5f2-0123456789ab");
    /// # Ok::<(), tuuid::Error>(())
    /// ```
    pub fn encode(&self) -> FStr<36> {
        let mut buffer = [0u8; 36];
        let mut buf_iter = buffer.iter_mut();
        for (i, e) in self.hex_digits().into_iter().enumerate() {
            if i == 8 || i == 12 || i == 16 || i == 20 {
                *buf_iter.next().unwrap() = b'-';
            }
            *buf_iter.next().unwrap() = e;
        }
        debug_assert!(buffer.is_ascii());
        // SAFETY: ok because buffer consists of ASCII code points
        unsafe { FStr::from_inner_unchecked(buffer) }
    }

    /// Returns the 32-digit hexadecimal string representation without hyphens.
    pub fn encode_compact(&self) -> FStr<32> {
        let buffer = self.hex_digits();
        debug_assert!(buffer.is_ascii());
        // SAFETY: ok because buffer consists of ASCII code points
        unsafe { FStr::from_inner_unchecked(buffer) }
    }

    fn hex_digits(&self) -> [u8; 32] {
        const DIGITS: &[u8; 16] = b"0123456789abcdef";

        let mut buffer = [0u8; 32];
        for (i, e) in self.0.iter().enumerate() {
            buffer[i * 2] = DIGITS[(e >> 4) as usize];
            buffer[i * 2 + 1] = DIGITS[(e & 15) as usize];
        }
        buffer
    }

    /// Parses 32 hexadecimal digits, with hyphens after the 8th, 12th, 16th and 20th digits if
    /// `hyphenated` is true. Digits are case-insensitive.
    pub(crate) fn parse_hex(src: &str, hyphenated: bool) -> Option<Self> {
        let mut dst = [0u8; 16];
        let mut iter = src.chars();
        for (i, e) in dst.iter_mut().enumerate() {
            let hi = iter.next()?.to_digit(16)? as u8;
            let lo = iter.next()?.to_digit(16)? as u8;
            *e = (hi << 4) | lo;
            if hyphenated && (i == 3 || i == 5 || i == 7 || i == 9) && iter.next()? != '-' {
                return None;
            }
        }
        if iter.next().is_none() {
            Some(Self(dst))
        } else {
            None
        }
    }
}

impl fmt::Display for Uuid {
    /// Returns the 8-4-4-4-12 hexadecimal string representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl str::FromStr for Uuid {
    type Err = Error;

    /// Creates an object from the 8-4-4-4-12 hexadecimal string representation.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(src, true).ok_or_else(|| Error::InvalidInput(src.to_owned()))
    }
}

impl From<Uuid> for [u8; 16] {
    fn from(src: Uuid) -> Self {
        src.0
    }
}

impl From<[u8; 16]> for Uuid {
    fn from(src: [u8; 16]) -> Self {
        Self(src)
    }
}

impl AsRef<[u8]> for Uuid {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<Uuid> for u128 {
    fn from(src: Uuid) -> Self {
        Self::from_be_bytes(src.0)
    }
}

impl From<u128> for Uuid {
    fn from(src: u128) -> Self {
        Self(src.to_be_bytes())
    }
}

impl From<Uuid> for String {
    fn from(src: Uuid) -> Self {
        src.to_string()
    }
}

impl TryFrom<String> for Uuid {
    type Error = Error;

    fn try_from(src: String) -> Result<Self, Self::Error> {
        src.parse()
    }
}

#[cfg(feature = "uuid")]
#[cfg_attr(docsrs, doc(cfg(feature = "uuid")))]
mod uuid_support {
    use super::Uuid;

    impl From<Uuid> for uuid::Uuid {
        fn from(src: Uuid) -> Self {
            uuid::Uuid::from_bytes(src.0)
        }
    }

    impl From<uuid::Uuid> for Uuid {
        fn from(src: uuid::Uuid) -> Self {
            Self(src.into_bytes())
        }
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::{fmt, Uuid};
    use serde::{de, Deserializer, Serializer};

    impl serde::Serialize for Uuid {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.encode())
            } else {
                serializer.serialize_bytes(self.as_bytes())
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for Uuid {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            if deserializer.is_human_readable() {
                deserializer.deserialize_str(VisitorImpl)
            } else {
                deserializer.deserialize_bytes(VisitorImpl)
            }
        }
    }

    struct VisitorImpl;

    impl<'de> de::Visitor<'de> for VisitorImpl {
        type Value = Uuid;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "a UUID representation")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            value.parse::<Self::Value>().map_err(de::Error::custom)
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            <[u8; 16]>::try_from(value)
                .map(Self::Value::from)
                .map_err(de::Error::custom)
        }
    }

}
