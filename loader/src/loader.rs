//! Reading record files and validating them in batches.
//!
//! Each input file is read and validated on its own; a file that cannot be
//! read or fails validation is recorded as a failed [`Outcome`] and never
//! stops the rest of the batch. Validation is pure, so batches run in
//! parallel on rayon's pool and results are returned in input order.
//!
//! ```no_run
//! use textmeta_core::{RecordKind, Validator};
//! use textmeta_loader::{collect_record_paths, validate_batch};
//!
//! let paths = collect_record_paths(&["artists/".into()]).unwrap();
//! let report = validate_batch(&Validator::default(), RecordKind::Artist, &paths, None).unwrap();
//! println!("{} passed, {} failed", report.passed(), report.failed());
//! ```

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;
use textmeta_core::{CauseKind, RecordError, RecordKind, Validator};
use tracing::{debug, info, warn};

use crate::error::{LoaderError, Result};

/// File extensions picked up when expanding a directory.
pub const RECORD_EXTENSIONS: &[&str] = &["yml", "yaml"];

/// Why a record was rejected, flattened for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    /// Offending field path, when the failure concerns one field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Stable cause tag (`schema_error`, `invalid_slug`, ..., `io_error`).
    pub cause: CauseKind,
    /// Human-readable detail including the offending raw value.
    pub detail: String,
}

impl From<RecordError> for Failure {
    fn from(err: RecordError) -> Self {
        Self {
            field: err.field,
            cause: err.kind.cause(),
            detail: err.kind.to_string(),
        }
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{field}: {}", self.detail),
            None => f.write_str(&self.detail),
        }
    }
}

/// Result of validating one record file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub kind: RecordKind,
    /// Path the record was read from.
    pub source: PathBuf,
    /// `None` when the record was accepted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Failure>,
}

impl Outcome {
    /// Returns `true` if the record was accepted.
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

/// Outcomes of a batch, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub outcomes: Vec<Outcome>,
}

impl BatchReport {
    /// Number of accepted records.
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_valid()).count()
    }

    /// Number of rejected records.
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }

    /// Returns `true` if every record was accepted.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(Outcome::is_valid)
    }

    /// Iterates rejected records.
    pub fn failures(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes.iter().filter(|o| !o.is_valid())
    }
}

/// Expands `inputs` into the record files to validate.
///
/// Files are taken as given regardless of extension; a path that is not a
/// directory is passed through even if it does not exist, so it is reported
/// as an unreadable record instead of stopping the batch. Directories are
/// expanded (non-recursively) to their `*.yml` and `*.yaml` entries. The
/// result is sorted and free of duplicates.
///
/// # Errors
///
/// Returns [`LoaderError::InvalidInput`] if `inputs` is empty, and
/// [`LoaderError::IoError`] if a directory cannot be read.
pub fn collect_record_paths(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    if inputs.is_empty() {
        return Err(LoaderError::InvalidInput(
            "No record paths were provided".to_string(),
        ));
    }

    let mut paths = BTreeSet::new();

    for input in inputs {
        if input.is_dir() {
            for entry in fs::read_dir(input)? {
                let path = entry?.path();
                let is_record = path
                    .extension()
                    .and_then(OsStr::to_str)
                    .is_some_and(|ext| RECORD_EXTENSIONS.contains(&ext));
                if is_record && path.is_file() {
                    paths.insert(path);
                }
            }
            continue;
        }

        if !input.exists() {
            warn!(path = %input.display(), "Record path does not exist");
        }
        paths.insert(input.clone());
    }

    Ok(paths.into_iter().collect())
}

/// Reads and validates one record file.
pub fn validate_file(validator: &Validator, kind: RecordKind, path: &Path) -> Outcome {
    let error = match fs::read(path) {
        Ok(bytes) => validator.validate(kind, &bytes).err().map(Failure::from),
        Err(err) => Some(Failure {
            field: None,
            cause: CauseKind::IoError,
            detail: err.to_string(),
        }),
    };

    match &error {
        None => debug!(kind = %kind, path = %path.display(), "Record accepted"),
        Some(failure) => warn!(
            kind = %kind,
            path = %path.display(),
            field = failure.field.as_deref().unwrap_or("-"),
            cause = %failure.cause,
            "Record rejected"
        ),
    }

    Outcome {
        kind,
        source: path.to_path_buf(),
        error,
    }
}

/// Validates every path in parallel.
///
/// With `jobs` set, a dedicated pool of that many threads is used; otherwise
/// rayon's global pool.
///
/// # Errors
///
/// Returns [`LoaderError::ThreadPool`] if the dedicated pool cannot be
/// built. Individual record failures are reported in the [`BatchReport`].
pub fn validate_batch(
    validator: &Validator,
    kind: RecordKind,
    paths: &[PathBuf],
    jobs: Option<usize>,
) -> Result<BatchReport> {
    let run = || -> Vec<Outcome> {
        paths
            .par_iter()
            .map(|path| validate_file(validator, kind, path))
            .collect()
    };

    let outcomes = match jobs {
        Some(jobs) => rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()?
            .install(run),
        None => run(),
    };

    let report = BatchReport { outcomes };
    info!(
        kind = %kind,
        total = report.outcomes.len(),
        passed = report.passed(),
        failed = report.failed(),
        "Batch validated"
    );
    Ok(report)
}
