//! Base-62 codec used by the teenie format
//!
//! Digits are written least significant first, so appending `'0'` characters to an encoded value
//! does not change the number it represents. The teenie format relies on this to pad each column
//! on the right.
//!
//! ```rust
//! use tuuid::base62;
//!
//! assert_eq!(base62::encode(62), "01");
//! assert_eq!(base62::decode("01000")?, 62);
//! # Ok::<(), tuuid::Error>(())
//! ```

use crate::{Error, Result};

const DIGITS: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Returns the base-62 representation of `value`, least significant digit first.
pub fn encode(mut value: u64) -> String {
    let mut buffer = String::with_capacity(11);
    loop {
        buffer.push(DIGITS[(value % 62) as usize] as char);
        value /= 62;
        if value == 0 {
            break buffer;
        }
    }
}

/// Decodes a string produced by [`encode`], with or without trailing `'0'` padding.
///
/// # Errors
///
/// Returns [`Error::InvalidEncoding`] if `src` is empty, contains a character outside the
/// alphabet, or represents a number that does not fit in `u64`.
pub fn decode(src: &str) -> Result<u64> {
    let err = || Error::InvalidEncoding(src.to_owned());
    if src.is_empty() {
        return Err(err());
    }

    let mut value = 0u64;
    // `None` once the place value exceeds `u64`; only zero digits may follow
    let mut weight = Some(1u64);
    for c in src.bytes() {
        let digit = digit_value(c).ok_or_else(err)?;
        if digit != 0 {
            value = weight
                .and_then(|w| w.checked_mul(digit))
                .and_then(|d| value.checked_add(d))
                .ok_or_else(err)?;
        }
        weight = weight.and_then(|w| w.checked_mul(62));
    }
    Ok(value)
}

const fn digit_value(c: u8) -> Option<u64> {
    match c {
        b'0'..=b'9' => Some((c - b'0') as u64),
        b'A'..=b'Z' => Some((c - b'A') as u64 + 10),
        b'a'..=b'z' => Some((c - b'a') as u64 + 36),
        _ => None,
    }
}
