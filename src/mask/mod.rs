//! Masking of sensitive header values.
//!
//! Credentials must not end up in logs, but being able to tell two requests
//! apart by their credential is useful. Values are replaced by their 32-bit
//! FNV-1a hash, which is stable across runs and says nothing about the input.

use http::header::{AUTHORIZATION, HeaderName};

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 16_777_619;

/// Computes the 32-bit FNV-1a hash of `value`.
///
/// The hash runs over UTF-16 code units, so every non-ASCII character
/// contributes one unit per UTF-16 code unit rather than per UTF-8 byte.
///
/// # Example
///
/// ```
/// assert_eq!(chunkstream::fnv1a("Lorem"), 1_789_342_528);
/// ```
pub fn fnv1a(value: &str) -> u32 {
    value.encode_utf16().fold(FNV_OFFSET_BASIS, |hash, unit| {
        (hash ^ u32::from(unit)).wrapping_mul(FNV_PRIME)
    })
}

/// Replaces `value` by a printable token derived from its hash.
///
/// # Example
///
/// ```
/// assert_eq!(chunkstream::mask("Lorem"), "<FNV-1a:1789342528>");
/// ```
pub fn mask(value: &str) -> String {
    format!("<FNV-1a:{}>", fnv1a(value))
}

/// Returns true if values of this header are masked in logs.
pub fn is_sensitive(name: &HeaderName) -> bool {
    *name == AUTHORIZATION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_hash() {
        assert_eq!(fnv1a("Lorem"), 1_789_342_528);
    }

    #[test]
    fn test_empty_is_offset_basis() {
        assert_eq!(fnv1a(""), FNV_OFFSET_BASIS);
    }

    #[test]
    fn test_non_ascii_uses_utf16_units() {
        // 'é' is one UTF-16 unit (0x00E9) but two UTF-8 bytes
        let expected = (FNV_OFFSET_BASIS ^ 0xE9).wrapping_mul(FNV_PRIME);
        assert_eq!(fnv1a("é"), expected);
    }

    #[test]
    fn test_mask_format() {
        let masked = mask("Bearer secret-token");
        assert!(masked.starts_with("<FNV-1a:"));
        assert!(!masked.contains("secret"));
    }

    #[test]
    fn test_only_authorization_is_sensitive() {
        assert!(is_sensitive(&AUTHORIZATION));
        assert!(!is_sensitive(&http::header::CONTENT_TYPE));
    }
}
