//! Filename glob syntax.
//!
//! Globs are translated to a regular expression by escaping every
//! metacharacter and then re-enabling the two wildcards: `?` matches exactly
//! one character and `*` matches any run of characters. The translation is
//! compiled once and discarded; only syntactic validity is checked.
//!
//! # Examples
//!
//! ```
//! use textmeta_core::{glob_to_regex, is_valid_glob};
//!
//! assert_eq!(glob_to_regex("*.diz"), r".*\.diz");
//! assert!(is_valid_glob("file?.txt"));
//! // Brackets are escaped to literals, so this is still a valid glob.
//! assert!(is_valid_glob("["));
//! ```

use regex::RegexBuilder;

/// Upper bound on the compiled size of a translated glob, in bytes.
pub const GLOB_SIZE_LIMIT: usize = 1 << 20;

/// Rewrites a glob into the regular expression source it stands for.
pub fn glob_to_regex(pattern: &str) -> String {
    regex::escape(pattern)
        .replace(r"\?", ".")
        .replace(r"\*", ".*")
}

/// Compiles the translated glob, returning the compiler's message on failure.
pub fn check_glob(pattern: &str) -> Result<(), String> {
    RegexBuilder::new(&glob_to_regex(pattern))
        .size_limit(GLOB_SIZE_LIMIT)
        .build()
        .map(|_| ())
        .map_err(|err| err.to_string())
}

/// Returns `true` if `pattern` translates to a compilable expression.
pub fn is_valid_glob(pattern: &str) -> bool {
    check_glob(pattern).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcards_are_translated() {
        assert_eq!(glob_to_regex("file?.txt"), r"file.\.txt");
        assert_eq!(glob_to_regex("*"), ".*");
        assert_eq!(glob_to_regex("a*b?c"), "a.*b.c");
    }

    #[test]
    fn test_metacharacters_stay_literal() {
        assert_eq!(glob_to_regex("(x)+"), r"\(x\)\+");
        assert!(is_valid_glob("[unbalanced"));
        assert!(is_valid_glob("{a,b}|c^$"));
    }

    #[test]
    fn test_common_archive_globs_are_valid() {
        for pattern in ["*.diz", "file?.txt", "us-*.ans", "*", "", "fire?? (1).gif"] {
            assert!(is_valid_glob(pattern), "{pattern:?} should be valid");
        }
    }

    #[test]
    fn test_oversized_translation_is_rejected() {
        let pattern = "*".repeat(100_000);
        let err = check_glob(&pattern).unwrap_err();
        assert!(!err.is_empty());
        assert!(!is_valid_glob(&pattern));
    }
}
