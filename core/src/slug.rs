//! Slug syntax.
//!
//! A slug is valid when it can be dropped into a URL path segment verbatim,
//! i.e. percent-escaping it as a path segment leaves it unchanged.
//!
//! # Examples
//!
//! ```
//! use textmeta_core::is_valid_slug;
//!
//! assert!(is_valid_slug("mistigris"));
//! assert!(is_valid_slug("acid+ice"));
//! assert!(!is_valid_slug("two words"));
//! assert!(!is_valid_slug("a/b"));
//! ```

use std::borrow::Cow;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Bytes escaped in a path segment.
///
/// Unreserved characters plus the reserved characters that carry no meaning
/// inside a single segment (`$ & + : = @`) pass through. Notably `/ ; , ?`
/// are escaped.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b':')
    .remove(b'=')
    .remove(b'@');

/// Percent-escapes `s` for use as a single URL path segment.
///
/// Returns the input unchanged (borrowed) when nothing needs escaping.
///
/// # Examples
///
/// ```
/// use textmeta_core::escape_path_segment;
///
/// assert_eq!(escape_path_segment("fire"), "fire");
/// assert_eq!(escape_path_segment("a b"), "a%20b");
/// assert_eq!(escape_path_segment("ü"), "%C3%BC");
/// ```
pub fn escape_path_segment(s: &str) -> Cow<'_, str> {
    utf8_percent_encode(s, PATH_SEGMENT).into()
}

/// Returns `true` if `slug` survives path-segment escaping byte-for-byte.
///
/// The empty string is accepted; callers that need a non-empty slug check
/// that separately.
pub fn is_valid_slug(slug: &str) -> bool {
    escape_path_segment(slug) == slug
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Strings built only from unreserved characters are valid slugs.
        #[test]
        fn unreserved_strings_are_valid(slug in "[A-Za-z0-9._~-]*") {
            prop_assert!(is_valid_slug(&slug));
        }

        /// One reserved character anywhere makes the slug invalid.
        #[test]
        fn reserved_character_is_invalid(
            head in "[A-Za-z0-9._~-]{0,8}",
            reserved in "[ /?#;,%]",
            tail in "\\PC{0,8}",
        ) {
            let slug = format!("{head}{reserved}{tail}");
            prop_assert!(!is_valid_slug(&slug));
        }

        /// Apart from the `%` markers, escaped output is made of safe bytes.
        #[test]
        fn escaped_output_is_safe(raw in "\\PC*") {
            let escaped = escape_path_segment(&raw);
            prop_assert!(is_valid_slug(&escaped.replace('%', "")));
        }
    }
}
