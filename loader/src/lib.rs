//! File loading, configuration and batch validation for archive records.
//!
//! This crate wraps [`textmeta_core`] with the plumbing a checker needs:
//! expanding input paths, loading a YAML [`Config`] that selects schema
//! revisions, and validating many files in parallel into a [`BatchReport`].
//!
//! # Quick start
//!
//! ```no_run
//! use textmeta_core::RecordKind;
//! use textmeta_loader::{Config, collect_record_paths, validate_batch};
//!
//! let config = Config::load_or_default(".textmeta.yml").unwrap();
//! let paths = collect_record_paths(&["packs/".into()]).unwrap();
//! let report = validate_batch(&config.validator(), RecordKind::Pack, &paths, config.batch.jobs)
//!     .unwrap();
//!
//! for outcome in report.failures() {
//!     eprintln!("FAIL {}", outcome.source.display());
//! }
//! ```

mod config;
mod error;
mod loader;

pub use config::{BatchConfig, Config, DEFAULT_CONFIG_FILE, SchemaConfig};
pub use error::{LoaderError, Result};
pub use loader::{
    BatchReport, Failure, Outcome, RECORD_EXTENSIONS, collect_record_paths, validate_batch,
    validate_file,
};
