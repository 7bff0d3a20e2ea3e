//! Text decoding for materialized streams.

use std::borrow::Cow;
use std::str::Utf8Error;

/// How stored bytes are turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextEncoding {
    /// Strict UTF-8; malformed input is an error.
    #[default]
    Utf8,
    /// UTF-8 with invalid sequences replaced by U+FFFD.
    Utf8Lossy,
}

impl TextEncoding {
    /// Decodes `bytes`, borrowing them when no replacement is needed.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Result<Cow<'a, str>, Utf8Error> {
        match self {
            TextEncoding::Utf8 => std::str::from_utf8(bytes).map(Cow::Borrowed),
            TextEncoding::Utf8Lossy => Ok(String::from_utf8_lossy(bytes)),
        }
    }
}
