//! Checker configuration.
//!
//! Selects the schema revisions and font registry records are checked
//! against, and how many threads batch validation may use. Every section is
//! optional; missing values fall back to the current revisions.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! schema:
//!   group: legacy
//!   pack: current
//!   fonts: current
//! batch:
//!   jobs: 4
//! ```

use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use textmeta_core::{FontRegistry, GroupRevision, PackRevision, Validator};

use crate::error::Result;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".textmeta.yml";

/// Schema revision and font registry selection.
///
/// # Examples
///
/// ```
/// # use textmeta_loader::SchemaConfig;
/// use textmeta_core::{GroupRevision, PackRevision};
///
/// let schema: SchemaConfig = serde_yaml::from_str("group: legacy").unwrap();
/// assert_eq!(schema.group, GroupRevision::Legacy);
/// assert_eq!(schema.pack, PackRevision::Current);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchemaConfig {
    /// Group schema revision.
    pub group: GroupRevision,
    /// Pack schema revision.
    pub pack: PackRevision,
    /// Font registry for pack files.
    pub fonts: FontRegistry,
}

/// Settings controlling batch validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchConfig {
    /// Number of validation threads; `None` uses rayon's global pool.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jobs: Option<usize>,
}

/// Top-level checker configuration.
///
/// # Examples
///
/// ```no_run
/// use textmeta_loader::Config;
///
/// let config = Config::load(".textmeta.yml").unwrap();
/// let validator = config.validator();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Configuration format version (e.g., `"1.0"`).
    pub version: String,
    /// Record schema selection.
    pub schema: SchemaConfig,
    /// Batch settings.
    pub batch: BatchConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            schema: SchemaConfig::default(),
            batch: BatchConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::LoaderError::IoError) if the file cannot be read, or
    /// [`YamlError`](crate::LoaderError::YamlError) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Renders the configuration as YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Builds the record validator this configuration describes.
    pub fn validator(&self) -> Validator {
        Validator::new()
            .with_group_revision(self.schema.group)
            .with_pack_revision(self.schema.pack)
            .with_fonts(self.schema.fonts)
    }
}
