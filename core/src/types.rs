//! Record type definitions for archive metadata.
//!
//! This module defines the three record kinds kept in the archive: artist
//! profiles, group (crew) profiles and release pack manifests. Each record
//! is a flat YAML mapping with a closed set of fields, listed in the
//! `FIELDS` constant of its type.
//!
//! Groups and packs exist in two schema revisions. [`GroupRevision`] and
//! [`PackRevision`] select which one a document is checked against.
//!
//! Scalars are read leniently where the field holds text: an unquoted
//! `pouet: 12345` is the handle `"12345"`, not a type error.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// The kind of record a document describes.
///
/// # Examples
///
/// ```
/// use textmeta_core::RecordKind;
///
/// assert_eq!(RecordKind::Pack.to_string(), "pack");
/// assert_eq!(RecordKind::ALL.len(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// An artist profile.
    Artist,
    /// A group (crew) profile.
    Group,
    /// A release pack manifest.
    Pack,
}

impl RecordKind {
    /// Every record kind, in display order.
    pub const ALL: [RecordKind; 3] = [Self::Artist, Self::Group, Self::Pack];

    /// Lowercase identifier used in reports and configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Artist => "artist",
            Self::Group => "group",
            Self::Pack => "pack",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Group schema revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupRevision {
    /// No `social`; leaders and members are lists of artist slugs.
    Legacy,
    /// Adds `social`; leaders and members are free-form.
    #[default]
    Current,
}

impl GroupRevision {
    /// Allowed top-level fields for this revision.
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            Self::Legacy => LegacyGroup::FIELDS,
            Self::Current => Group::FIELDS,
        }
    }
}

/// Pack schema revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackRevision {
    /// File entries carry no modification timestamp.
    Legacy,
    /// File entries may carry a `date` modification timestamp.
    #[default]
    Current,
}

impl PackRevision {
    /// Allowed fields of a `files` entry for this revision.
    pub fn file_fields(self) -> &'static [&'static str] {
        match self {
            Self::Legacy => File::LEGACY_FIELDS,
            Self::Current => File::FIELDS,
        }
    }
}

/// An artist profile.
///
/// # Examples
///
/// ```
/// use textmeta_core::Artist;
///
/// let artist: Artist = serde_yaml::from_str("name: Maze\naliases: [maze]\n").unwrap();
/// assert_eq!(artist.aliases.as_deref(), Some(&["maze".to_string()][..]));
/// assert!(artist.social.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Artist {
    /// Display name.
    #[serde(deserialize_with = "text")]
    pub name: String,
    /// Alternative slugs the artist is known under.
    #[serde(deserialize_with = "text_seq")]
    pub aliases: Option<Vec<String>>,
    /// Free-form country.
    #[serde(deserialize_with = "text")]
    pub country: String,
    /// Free-form biography.
    #[serde(deserialize_with = "text")]
    pub biography: String,
    /// Website URL (not validated).
    #[serde(deserialize_with = "text")]
    pub website: String,
    /// Social network handles keyed by platform.
    #[serde(deserialize_with = "text_map")]
    pub social: Option<BTreeMap<String, String>>,
}

impl Artist {
    /// Closed set of top-level fields.
    pub const FIELDS: &'static [&'static str] =
        &["name", "aliases", "country", "biography", "website", "social"];
}

/// A group profile, legacy revision.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LegacyGroup {
    #[serde(deserialize_with = "text")]
    pub name: String,
    #[serde(deserialize_with = "text_seq")]
    pub aliases: Option<Vec<String>>,
    /// Artist slugs of the group's leaders.
    #[serde(deserialize_with = "text_seq")]
    pub leaders: Option<Vec<String>>,
    /// Artist slugs of the group's members.
    #[serde(deserialize_with = "text_seq")]
    pub members: Option<Vec<String>>,
    #[serde(deserialize_with = "text")]
    pub about: String,
    #[serde(deserialize_with = "text")]
    pub website: String,
}

impl LegacyGroup {
    /// Closed set of top-level fields.
    pub const FIELDS: &'static [&'static str] =
        &["name", "aliases", "leaders", "members", "about", "website"];
}

/// A group profile, current revision.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Group {
    #[serde(deserialize_with = "text")]
    pub name: String,
    #[serde(deserialize_with = "text_seq")]
    pub aliases: Option<Vec<String>>,
    /// Leaders, in whatever shape the record author chose.
    pub leaders: Option<serde_yaml::Value>,
    /// Members, in whatever shape the record author chose.
    pub members: Option<serde_yaml::Value>,
    #[serde(deserialize_with = "text")]
    pub about: String,
    #[serde(deserialize_with = "text")]
    pub website: String,
    #[serde(deserialize_with = "text_map")]
    pub social: Option<BTreeMap<String, String>>,
}

impl Group {
    /// Closed set of top-level fields.
    pub const FIELDS: &'static [&'static str] = &[
        "name", "aliases", "leaders", "members", "about", "website", "social",
    ];
}

/// A release pack manifest.
///
/// `group`/`groups` and `artist`/`artists` coexist while records migrate
/// from a single slug to a list; use [`group_slugs`](Pack::group_slugs) and
/// [`artist_slugs`](Pack::artist_slugs) to read them merged.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Pack {
    /// Base name.
    #[serde(deserialize_with = "text")]
    pub name: String,
    /// Year of publication.
    pub year: i64,
    #[serde(deserialize_with = "text")]
    pub group: String,
    #[serde(deserialize_with = "text_seq")]
    pub groups: Option<Vec<String>>,
    #[serde(deserialize_with = "text")]
    pub artist: String,
    #[serde(deserialize_with = "text_seq")]
    pub artists: Option<Vec<String>>,
    /// Directory contents keyed by file name.
    #[serde(deserialize_with = "text_keyed")]
    pub files: Option<BTreeMap<String, File>>,
    /// Filename globs mapped to the artist slug they credit.
    #[serde(rename = "match", deserialize_with = "text_map")]
    pub matches: Option<BTreeMap<String, String>>,
}

impl Pack {
    /// Closed set of top-level fields.
    pub const FIELDS: &'static [&'static str] = &[
        "name", "year", "group", "groups", "artist", "artists", "files", "match",
    ];

    /// Group slugs from `groups` followed by `group`, without duplicates.
    ///
    /// # Examples
    ///
    /// ```
    /// use textmeta_core::Pack;
    ///
    /// let pack: Pack = serde_yaml::from_str("group: fire\ngroups: [acid, fire]\n").unwrap();
    /// assert_eq!(pack.group_slugs(), vec!["acid", "fire"]);
    /// ```
    pub fn group_slugs(&self) -> Vec<&str> {
        merge_slugs(&self.group, self.groups.as_deref())
    }

    /// Artist slugs from `artists` followed by `artist`, without duplicates.
    pub fn artist_slugs(&self) -> Vec<&str> {
        merge_slugs(&self.artist, self.artists.as_deref())
    }
}

fn merge_slugs<'a>(single: &'a str, many: Option<&'a [String]>) -> Vec<&'a str> {
    let mut slugs: Vec<&str> = Vec::new();
    let candidates = many
        .unwrap_or_default()
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(single));
    for slug in candidates {
        if !slug.is_empty() && !slugs.contains(&slug) {
            slugs.push(slug);
        }
    }
    slugs
}

/// A file inside a pack.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct File {
    #[serde(deserialize_with = "text")]
    pub name: String,
    /// Modification time; current pack revision only.
    pub date: Option<ModTime>,
    #[serde(deserialize_with = "text")]
    pub artist: String,
    #[serde(deserialize_with = "text_seq")]
    pub artists: Option<Vec<String>>,
    /// Font the file is meant to be rendered with; empty when unspecified.
    #[serde(deserialize_with = "text")]
    pub font: String,
}

impl File {
    /// Closed set of fields in the current pack revision.
    pub const FIELDS: &'static [&'static str] = &["name", "date", "artist", "artists", "font"];
    /// Closed set of fields in the legacy pack revision.
    pub const LEGACY_FIELDS: &'static [&'static str] = &["name", "artist", "artists", "font"];
}

/// A file modification timestamp.
///
/// Accepts RFC 3339 (`2019-04-01T12:00:00Z`), a space-separated UTC
/// date-time (`2019-04-01 12:00:00`) or a bare date (`2019-04-01`).
///
/// # Examples
///
/// ```
/// use textmeta_core::ModTime;
///
/// let time: ModTime = "1996-08-01".parse().unwrap();
/// assert_eq!(time.0.to_rfc3339(), "1996-08-01T00:00:00+00:00");
/// assert!("yesterday".parse::<ModTime>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ModTime(pub DateTime<Utc>);

impl std::str::FromStr for ModTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(time) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self(time.with_timezone(&Utc)));
        }
        if let Ok(time) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
            return Ok(Self(time.and_utc()));
        }
        if let Some(time) = NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
        {
            return Ok(Self(time.and_utc()));
        }
        Err(format!("invalid timestamp {s:?}"))
    }
}

impl<'de> Deserialize<'de> for ModTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A YAML scalar read as text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Text(String);

impl<'de> Deserialize<'de> for Text {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match serde_yaml::Value::deserialize(deserializer)? {
            serde_yaml::Value::String(s) => Ok(Text(s)),
            serde_yaml::Value::Number(n) => Ok(Text(n.to_string())),
            serde_yaml::Value::Bool(b) => Ok(Text(b.to_string())),
            serde_yaml::Value::Null => Ok(Text(String::new())),
            other => Err(serde::de::Error::custom(format!(
                "invalid type: {}, expected a string",
                describe(&other)
            ))),
        }
    }
}

fn describe(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "boolean",
        serde_yaml::Value::Number(_) => "number",
        serde_yaml::Value::String(_) => "string",
        serde_yaml::Value::Sequence(_) => "sequence",
        serde_yaml::Value::Mapping(_) => "mapping",
        serde_yaml::Value::Tagged(_) => "tagged value",
    }
}

fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Text::deserialize(deserializer).map(|t| t.0)
}

fn text_seq<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<String>>, D::Error> {
    let seq: Option<Vec<Text>> = Option::deserialize(deserializer)?;
    Ok(seq.map(|items| items.into_iter().map(|t| t.0).collect()))
}

fn text_map<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<BTreeMap<String, String>>, D::Error> {
    let map: Option<BTreeMap<Text, Text>> = Option::deserialize(deserializer)?;
    Ok(map.map(|entries| entries.into_iter().map(|(k, v)| (k.0, v.0)).collect()))
}

fn text_keyed<'de, D, V>(deserializer: D) -> Result<Option<BTreeMap<String, V>>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    let map: Option<BTreeMap<Text, V>> = Option::deserialize(deserializer)?;
    Ok(map.map(|entries| entries.into_iter().map(|(k, v)| (k.0, v)).collect()))
}
