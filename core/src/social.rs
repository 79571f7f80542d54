//! Social network handle rules.
//!
//! Each supported platform maps to a regular expression describing the
//! shape of a handle on that platform. Platform keys are matched exactly and
//! case-sensitively.
//!
//! # Examples
//!
//! ```
//! use textmeta_core::{SocialError, check_handle};
//!
//! assert!(check_handle("pouet", "12345").is_ok());
//! assert!(matches!(
//!     check_handle("pouet", "abc"),
//!     Err(SocialError::InvalidHandle { .. })
//! ));
//! assert!(matches!(
//!     check_handle("myspace", "x"),
//!     Err(SocialError::InvalidPlatform { .. })
//! ));
//! ```

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Why a `(platform, handle)` pair was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SocialError {
    /// The platform is not in the registry.
    #[error("social site {platform:?} invalid")]
    InvalidPlatform { platform: String },
    /// The handle does not match the platform's rule.
    #[error("social site {platform} value {handle:?} invalid")]
    InvalidHandle { platform: String, handle: String },
}

const NUMERIC: &str = r"^[0-9]+$";
const NON_EMPTY: &str = r".+";
const WORD_OR_HYPHEN: &str = r"^[0-9A-Za-z_][-0-9A-Za-z_]*$";
const LETTER_THEN_WORD: &str = r"^[A-Za-z][0-9A-Za-z_]+$";

const RULES: &[(&str, &str)] = &[
    ("artcity", NUMERIC),
    ("behance", NON_EMPTY),
    ("csdb", NUMERIC),
    ("demozoo", NUMERIC),
    ("deviantart", NON_EMPTY),
    ("facebook", NON_EMPTY),
    ("flickr", r"^[0-9]+@N[0-9]+$"),
    ("github", WORD_OR_HYPHEN),
    ("google+", r"^(?:\+[0-9A-Za-z_]*|[0-9]+)$"),
    ("instagram", NON_EMPTY),
    ("linkedin", WORD_OR_HYPHEN),
    ("pinterest", NON_EMPTY),
    ("pouet", NUMERIC),
    ("twitter", NON_EMPTY),
    ("vimeo", LETTER_THEN_WORD),
    ("youtube", LETTER_THEN_WORD),
    ("youtube-channel", r"^[-A-Za-z0-9+/]+$"),
];

static REGISTRY: LazyLock<BTreeMap<&'static str, Regex>> = LazyLock::new(|| {
    RULES
        .iter()
        .map(|&(platform, rule)| {
            (
                platform,
                Regex::new(rule).expect("static social rule must compile"),
            )
        })
        .collect()
});

/// Checks `handle` against the rule registered for `platform`.
///
/// # Errors
///
/// Returns [`SocialError::InvalidPlatform`] for an unregistered platform and
/// [`SocialError::InvalidHandle`] when the handle does not match its rule.
pub fn check_handle(platform: &str, handle: &str) -> Result<(), SocialError> {
    let rule = REGISTRY
        .get(platform)
        .ok_or_else(|| SocialError::InvalidPlatform {
            platform: platform.to_string(),
        })?;

    if !rule.is_match(handle) {
        return Err(SocialError::InvalidHandle {
            platform: platform.to_string(),
            handle: handle.to_string(),
        });
    }

    Ok(())
}
