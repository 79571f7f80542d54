//! Record validation.
//!
//! Each record kind is validated in two steps: the document is parsed
//! strictly against the kind's closed field set, then the typed record's
//! fields are run through the lexical and social rules. Validation stops at
//! the first failing check and reports it together with the field it was
//! found in.
//!
//! # Examples
//!
//! ```
//! use textmeta_core::*;
//!
//! let doc = b"name: Maze\naliases: [maze, lord-maze]\nsocial:\n  twitter: maze\n";
//! assert!(validate_artist(doc).is_ok());
//!
//! let doc = b"name: Maze\nsocial:\n  myspace: maze\n";
//! let err = validate_artist(doc).unwrap_err();
//! assert_eq!(err.field.as_deref(), Some("social.myspace"));
//! assert_eq!(err.kind.cause(), CauseKind::InvalidPlatform);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::font::FontRegistry;
use crate::glob::check_glob;
use crate::slug::is_valid_slug;
use crate::social::{SocialError, check_handle};
use crate::strict;
use crate::{Artist, File, Group, GroupRevision, LegacyGroup, Pack, PackRevision, RecordKind};

/// Why a record was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// The document is not well-formed YAML, has an unknown field, or a
    /// field holds a value of the wrong type.
    #[error("{0}")]
    Schema(String),
    /// A slug-typed value needs URL escaping.
    #[error("invalid slug {0:?}")]
    InvalidSlug(String),
    /// A social platform is not in the registry.
    #[error("social site {0:?} invalid")]
    InvalidPlatform(String),
    /// A social handle does not match its platform's rule.
    #[error("social site {platform} value {handle:?} invalid")]
    InvalidHandle { platform: String, handle: String },
    /// A `match` glob does not translate to a compilable pattern.
    #[error("invalid pattern {pattern:?}: {reason}")]
    InvalidGlob { pattern: String, reason: String },
    /// A font name is not in the registry after normalization.
    #[error("invalid font {0:?}")]
    InvalidFont(String),
}

impl ErrorKind {
    /// Stable tag for this error's category.
    pub fn cause(&self) -> CauseKind {
        match self {
            Self::Schema(_) => CauseKind::SchemaError,
            Self::InvalidSlug(_) => CauseKind::InvalidSlug,
            Self::InvalidPlatform(_) => CauseKind::InvalidPlatform,
            Self::InvalidHandle { .. } => CauseKind::InvalidHandle,
            Self::InvalidGlob { .. } => CauseKind::InvalidGlob,
            Self::InvalidFont(_) => CauseKind::InvalidFont,
        }
    }
}

impl From<SocialError> for ErrorKind {
    fn from(err: SocialError) -> Self {
        match err {
            SocialError::InvalidPlatform { platform } => Self::InvalidPlatform(platform),
            SocialError::InvalidHandle { platform, handle } => {
                Self::InvalidHandle { platform, handle }
            }
        }
    }
}

/// Category tag of an [`ErrorKind`], for structured reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CauseKind {
    SchemaError,
    InvalidSlug,
    InvalidPlatform,
    InvalidHandle,
    InvalidGlob,
    InvalidFont,
    /// The record file could not be read; never produced by validation.
    IoError,
}

impl CauseKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SchemaError => "schema_error",
            Self::InvalidSlug => "invalid_slug",
            Self::InvalidPlatform => "invalid_platform",
            Self::InvalidHandle => "invalid_handle",
            Self::InvalidGlob => "invalid_glob",
            Self::InvalidFont => "invalid_font",
            Self::IoError => "io_error",
        }
    }
}

impl fmt::Display for CauseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The first failure found in a record, with the field it was found in.
///
/// `field` is a dotted path such as `aliases[2]`, `social.twitter` or
/// `files.intro.ans.font`; it is `None` when the failure concerns the
/// document as a whole (unparseable YAML, a root that is not a mapping).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordError {
    pub field: Option<String>,
    pub kind: ErrorKind,
}

impl RecordError {
    pub fn new(field: Option<String>, kind: ErrorKind) -> Self {
        Self { field, kind }
    }

    fn at(field: impl Into<String>, kind: impl Into<ErrorKind>) -> Self {
        Self::new(Some(field.into()), kind.into())
    }
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{field}: {}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for RecordError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

/// Record validator with selectable schema revisions and font registry.
///
/// The default validator checks the current group and pack revisions
/// against the current font registry.
///
/// # Examples
///
/// ```
/// use textmeta_core::*;
///
/// let legacy = Validator::new()
///     .with_pack_revision(PackRevision::Legacy)
///     .with_fonts(FontRegistry::Legacy);
///
/// let doc = b"files:\n  a.ans:\n    font: cp437\n";
/// assert!(legacy.validate(RecordKind::Pack, doc).is_ok());
///
/// let dated = b"files:\n  a.ans:\n    date: 1996-08-01\n";
/// assert!(legacy.validate(RecordKind::Pack, dated).is_err());
/// assert!(Validator::new().validate(RecordKind::Pack, dated).is_ok());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Validator {
    pub group: GroupRevision,
    pub pack: PackRevision,
    pub fonts: FontRegistry,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the group schema revision.
    pub fn with_group_revision(mut self, revision: GroupRevision) -> Self {
        self.group = revision;
        self
    }

    /// Selects the pack schema revision.
    pub fn with_pack_revision(mut self, revision: PackRevision) -> Self {
        self.pack = revision;
        self
    }

    /// Selects the font registry used for pack files.
    pub fn with_fonts(mut self, fonts: FontRegistry) -> Self {
        self.fonts = fonts;
        self
    }

    /// Validates one serialized document of the given kind.
    pub fn validate(&self, kind: RecordKind, bytes: &[u8]) -> Result<(), RecordError> {
        let result = match kind {
            RecordKind::Artist => self.validate_artist(bytes),
            RecordKind::Group => self.validate_group(bytes),
            RecordKind::Pack => self.validate_pack(bytes),
        };
        if let Err(err) = &result {
            tracing::debug!(
                kind = %kind,
                field = err.field.as_deref().unwrap_or("-"),
                cause = %err.kind.cause(),
                "Record rejected"
            );
        }
        result
    }

    pub fn validate_artist(&self, bytes: &[u8]) -> Result<(), RecordError> {
        let mut mapping = strict::load_mapping(bytes)?;
        strict::check_fields(&mapping, Artist::FIELDS, "")?;
        strict::strip_nulls(&mut mapping);
        check_artist(&strict::into_record(mapping)?)
    }

    pub fn validate_group(&self, bytes: &[u8]) -> Result<(), RecordError> {
        let mut mapping = strict::load_mapping(bytes)?;
        strict::check_fields(&mapping, self.group.fields(), "")?;
        strict::strip_nulls(&mut mapping);
        match self.group {
            GroupRevision::Legacy => check_legacy_group(&strict::into_record(mapping)?),
            GroupRevision::Current => check_group(&strict::into_record(mapping)?),
        }
    }

    pub fn validate_pack(&self, bytes: &[u8]) -> Result<(), RecordError> {
        let mut mapping = strict::load_mapping(bytes)?;
        strict::check_fields(&mapping, Pack::FIELDS, "")?;
        strict::strip_nulls(&mut mapping);
        strict::check_file_entries(&mut mapping, self.pack.file_fields())?;
        check_pack(&strict::into_record(mapping)?, self.fonts)
    }
}

/// Validates an artist document with the default [`Validator`].
pub fn validate_artist(bytes: &[u8]) -> Result<(), RecordError> {
    Validator::default().validate_artist(bytes)
}

/// Validates a group document with the default [`Validator`].
pub fn validate_group(bytes: &[u8]) -> Result<(), RecordError> {
    Validator::default().validate_group(bytes)
}

/// Validates a pack document with the default [`Validator`].
pub fn validate_pack(bytes: &[u8]) -> Result<(), RecordError> {
    Validator::default().validate_pack(bytes)
}

/// Checks the aliases and social handles of a parsed artist.
pub fn check_artist(artist: &Artist) -> Result<(), RecordError> {
    check_slugs("aliases", artist.aliases.as_deref())?;
    check_social(artist.social.as_ref())
}

/// Checks the aliases and social handles of a parsed group.
pub fn check_group(group: &Group) -> Result<(), RecordError> {
    check_slugs("aliases", group.aliases.as_deref())?;
    check_social(group.social.as_ref())
}

/// Checks the aliases of a parsed legacy group.
///
/// Leader and member references are only required to be text.
pub fn check_legacy_group(group: &LegacyGroup) -> Result<(), RecordError> {
    check_slugs("aliases", group.aliases.as_deref())
}

/// Checks the `match` globs and file fonts of a parsed pack.
pub fn check_pack(pack: &Pack, fonts: FontRegistry) -> Result<(), RecordError> {
    if let Some(matches) = &pack.matches {
        for pattern in matches.keys() {
            check_glob(pattern).map_err(|reason| {
                RecordError::at(
                    format!("match.{pattern}"),
                    ErrorKind::InvalidGlob {
                        pattern: pattern.clone(),
                        reason,
                    },
                )
            })?;
        }
    }

    if let Some(files) = &pack.files {
        for (name, file) in files {
            check_font(name, file, fonts)?;
        }
    }

    Ok(())
}

fn check_font(name: &str, file: &File, fonts: FontRegistry) -> Result<(), RecordError> {
    if file.font.is_empty() || fonts.is_known(&file.font) {
        return Ok(());
    }
    Err(RecordError::at(
        format!("files.{name}.font"),
        ErrorKind::InvalidFont(file.font.clone()),
    ))
}

fn check_slugs(field: &str, slugs: Option<&[String]>) -> Result<(), RecordError> {
    for (index, slug) in slugs.unwrap_or_default().iter().enumerate() {
        if !is_valid_slug(slug) {
            return Err(RecordError::at(
                format!("{field}[{index}]"),
                ErrorKind::InvalidSlug(slug.clone()),
            ));
        }
    }
    Ok(())
}

fn check_social(social: Option<&BTreeMap<String, String>>) -> Result<(), RecordError> {
    let Some(social) = social else {
        return Ok(());
    };
    for (platform, handle) in social {
        check_handle(platform, handle)
            .map_err(|err| RecordError::at(format!("social.{platform}"), err))?;
    }
    Ok(())
}
