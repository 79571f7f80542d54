//! Field validation rules and record schemas for textmode archive metadata.
//!
//! The archive keeps three kinds of hand-written YAML records:
//!
//! - [`Artist`] — an artist profile with aliases and social handles.
//! - [`Group`] / [`LegacyGroup`] — a group (crew) profile, in the current
//!   and legacy schema revisions.
//! - [`Pack`] — a release manifest listing files, their fonts, and globs
//!   crediting files to artists.
//!
//! Records are checked by a small set of rules applied to selected fields:
//!
//! - [`is_valid_slug`] — aliases must be usable as URL path segments.
//! - [`check_handle`] — social handles must match their platform's shape.
//! - [`is_valid_glob`] — `match` keys must be well-formed filename globs.
//! - [`FontRegistry`] — file fonts must name a known font after
//!   normalization.
//!
//! [`Validator`] ties them together: it parses a document strictly against
//! its record's closed field set and reports the first failing field.
//!
//! # Example
//!
//! ```
//! use textmeta_core::*;
//!
//! let pack = b"\
//! name: fire-07
//! year: 1996
//! group: fire
//! files:
//!   intro.ans:
//!     font: Topaz_A500
//! match:
//!   \"*.ans\": maze
//! ";
//! assert!(validate_pack(pack).is_ok());
//!
//! let err = validate_pack(b"files:\n  intro.ans:\n    font: comic sans\n").unwrap_err();
//! assert_eq!(err.kind, ErrorKind::InvalidFont("comic sans".into()));
//! ```

mod font;
mod glob;
mod slug;
mod social;
mod strict;
mod types;
mod validate;

pub use font::{FontRegistry, IBM_VGA_CODE_PAGES, is_known_font, normalize_font_name};
pub use glob::{GLOB_SIZE_LIMIT, check_glob, glob_to_regex, is_valid_glob};
pub use slug::{escape_path_segment, is_valid_slug};
pub use social::{SocialError, check_handle};
pub use types::*;
pub use validate::{
    CauseKind, ErrorKind, RecordError, Validator, check_artist, check_group, check_legacy_group,
    check_pack, validate_artist, validate_group, validate_pack,
};
