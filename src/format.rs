//! Textual formats of a [`Uuid`] and conversion between them
//!
//! | Format    | Example                                         |
//! | --------- | ----------------------------------------------- |
//! | `default` | `6e3a45a0-5e2b-013e-a5f2-0123456789ab`          |
//! | `compact` | `6e3a45a05e2b013ea5f20123456789ab`              |
//! | `urn`     | `urn:uuid:6e3a45a0-5e2b-013e-a5f2-0123456789ab` |
//! | `teenie`  | `khW912pG6850C3BLj4OW1M00`                      |
//!
//! The teenie format encodes each of the five fields in base 62 (see [`crate::base62`]) and pads
//! it on the right with `'0'` to a fixed column width of 6, 3, 3, 3 and 9 characters
//! respectively.

use std::{fmt, str};

use crate::{base62, Error, Result, Uuid};

const URN_PREFIX: &str = "urn:uuid:";

/// Column widths of the five fields in the teenie format.
const TEENIE_WIDTHS: [usize; 5] = [6, 3, 3, 3, 9];

/// Length of a teenie string.
pub const TEENIE_LEN: usize = 24;

/// Textual representation of a [`Uuid`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Format {
    /// 8-4-4-4-12 lower-case hexadecimal digits.
    #[default]
    Default,

    /// 32 lower-case hexadecimal digits without hyphens.
    Compact,

    /// `urn:uuid:` followed by the default representation.
    Urn,

    /// 24 base-62 characters in fixed-width columns.
    Teenie,
}

impl Format {
    /// All supported formats.
    pub const ALL: [Self; 4] = [Self::Default, Self::Compact, Self::Urn, Self::Teenie];

    /// Returns the token that names this format.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Compact => "compact",
            Self::Urn => "urn",
            Self::Teenie => "teenie",
        }
    }

    /// Returns the string representation of `uuid` in this format.
    pub fn render(self, uuid: &Uuid) -> String {
        match self {
            Self::Default => uuid.encode().to_string(),
            Self::Compact => uuid.encode_compact().to_string(),
            Self::Urn => format!("{}{}", URN_PREFIX, uuid.encode()),
            Self::Teenie => render_teenie(uuid),
        }
    }

    /// Parses a string representation in this format.
    ///
    /// Hexadecimal digits and the `urn:uuid:` prefix are case-insensitive; teenie characters are
    /// case-sensitive.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `src` does not have the shape of this format or, for the
    /// teenie format, if a column does not decode to a value that fits in its field.
    pub fn parse(self, src: &str) -> Result<Uuid> {
        let parsed = match self {
            Self::Default => Uuid::parse_hex(src, true),
            Self::Compact => Uuid::parse_hex(src, false),
            Self::Urn => src
                .get(..URN_PREFIX.len())
                .filter(|prefix| prefix.eq_ignore_ascii_case(URN_PREFIX))
                .and_then(|_| Uuid::parse_hex(&src[URN_PREFIX.len()..], true)),
            Self::Teenie => parse_teenie(src),
        };
        parsed.ok_or_else(|| Error::InvalidInput(src.to_owned()))
    }

    /// Returns true if `src` has the shape of this format.
    ///
    /// For the teenie format this is the loose check of [`validate_teenie`], which accepts some
    /// strings that [`Format::parse`] rejects.
    pub fn validate(self, src: &str) -> bool {
        match self {
            Self::Teenie => validate_teenie(src),
            _ => self.parse(src).is_ok(),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl str::FromStr for Format {
    type Err = Error;

    /// Resolves a format token: `default`, `compact`, `urn` or `teenie`.
    fn from_str(src: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|e| e.name() == src)
            .ok_or_else(|| Error::InvalidFormat(src.to_owned()))
    }
}

impl Uuid {
    /// Returns the string representation in `format`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tuuid::{Format, Uuid};
    ///
    /// let x = Uuid::from_fields(5, 1, 0x0100, 7, 62);
    /// assert_eq!(x.to_format(Format::Compact), "0000000500010100000700000000003e");
    /// assert_eq!(x.to_format(Format::Teenie), "500000100840700010000000");
    /// ```
    pub fn to_format(&self, format: Format) -> String {
        format.render(self)
    }

    /// Parses a string representation in `format`.
    pub fn parse_as(src: &str, format: Format) -> Result<Self> {
        format.parse(src)
    }
}

fn render_teenie(uuid: &Uuid) -> String {
    let (time_low, time_mid, time_hi_and_version, clock_seq, node) = uuid.fields();
    let fields = [
        time_low as u64,
        time_mid as u64,
        time_hi_and_version as u64,
        clock_seq as u64,
        node,
    ];

    let mut buffer = String::with_capacity(TEENIE_LEN);
    for (value, width) in fields.into_iter().zip(TEENIE_WIDTHS) {
        let digits = base62::encode(value);
        debug_assert!(digits.len() <= width);
        buffer.push_str(&digits);
        buffer.extend(std::iter::repeat('0').take(width - digits.len()));
    }
    buffer
}

fn parse_teenie(src: &str) -> Option<Uuid> {
    if src.len() != TEENIE_LEN || !src.is_ascii() {
        return None;
    }

    let mut fields = [0u64; 5];
    let mut start = 0;
    for (field, width) in fields.iter_mut().zip(TEENIE_WIDTHS) {
        *field = base62::decode(&src[start..start + width]).ok()?;
        start += width;
    }

    let [time_low, time_mid, time_hi_and_version, clock_seq, node] = fields;
    if node >= 1 << 48 {
        return None;
    }
    Some(Uuid::from_fields(
        time_low.try_into().ok()?,
        time_mid.try_into().ok()?,
        time_hi_and_version.try_into().ok()?,
        clock_seq.try_into().ok()?,
        node,
    ))
}

/// Returns true if `value` has the compact, default or URN shape.
///
/// # Examples
///
/// ```rust
/// assert!(tuuid::validate("6e3a45a0-5e2b-013e-a5f2-0123456789ab"));
/// assert!(tuuid::validate("6E3A45A05E2B013EA5F20123456789AB"));
/// assert!(tuuid::validate("urn:uuid:6e3a45a0-5e2b-013e-a5f2-0123456789ab"));
/// assert!(!tuuid::validate("6e3a45a05e2b013ea5f20123456789ab0"));
/// assert!(!tuuid::validate(""));
/// ```
pub fn validate(value: &str) -> bool {
    [Format::Compact, Format::Default, Format::Urn]
        .into_iter()
        .any(|e| e.validate(value))
}

/// Returns true if `value` consists of 24 word characters (`[0-9A-Za-z_]`).
///
/// This check is looser than the teenie format itself: it accepts `'_'`, and it does not check
/// that each column decodes to a value that fits in its field. Such strings pass validation but
/// fail [`Format::parse`]. The looseness is kept so that identifiers accepted in the past are still
/// accepted.
pub fn validate_teenie(value: &str) -> bool {
    value.len() == TEENIE_LEN
        && value
            .bytes()
            .all(|c| c.is_ascii_alphanumeric() || c == b'_')
}

/// Converts `value` from the `from` format to the `to` format.
///
/// # Errors
///
/// - [`Error::NoopTranslation`] if `from` and `to` are the same format.
/// - [`Error::InvalidInput`] if `value` is not a valid `from` representation.
///
/// # Examples
///
/// ```rust
/// use tuuid::{translate, Format};
///
/// let teenie = translate("6e3a45a0-5e2b-013e-a5f2-0123456789ab", Format::Default, Format::Teenie)?;
/// assert_eq!(teenie, "khW912pG6850C3BLj4OW1M00");
/// assert_eq!(
///     translate(&teenie, Format::Teenie, Format::Urn)?,
///     "urn:uuid:6e3a45a0-5e2b-013e-a5f2-0123456789ab"
/// );
/// # Ok::<(), tuuid::Error>(())
/// ```
pub fn translate(value: &str, from: Format, to: Format) -> Result<String> {
    if from == to {
        return Err(Error::NoopTranslation(from));
    }
    if !from.validate(value) {
        return Err(Error::InvalidInput(value.to_owned()));
    }
    Ok(to.render(&from.parse(value)?))
}

/// Converts `value` between formats named by their tokens.
///
/// # Errors
///
/// Returns [`Error::InvalidFormat`] if either token is unknown; otherwise the same errors as
/// [`translate`].
pub fn translate_str(value: &str, from: &str, to: &str) -> Result<String> {
    translate(value, from.parse()?, to.parse()?)
}
