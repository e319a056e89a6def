//! Metadata directory scanning.
//!
//! Both pipelines start here. [`scan`] checks that the source directory
//! exists and hands back a lazy iterator over the metadata files in it:
//!
//! ```text
//! garden_596/metadata/
//! ├── ember-tale.json        # scanned
//! ├── river-song.json        # scanned
//! ├── notes.txt              # wrong extension, ignored
//! ├── .draft.json            # scanned, dotfiles included
//! └── archive/               # not a *.json name, ignored
//! ```
//!
//! ## Matching
//!
//! A file matches when its name ends in `.` plus the configured extension,
//! compared case-sensitively. Names starting with a dot are not special, so
//! `.draft.json` is a record like any other. Subdirectories are not
//! descended into.
//!
//! ## Ordering
//!
//! Files come out in whatever order the filesystem lists them. No sorting.
//!
//! ## Failures
//!
//! A missing source directory is reported up front as
//! [`ScanError::SourceMissing`], before any pipeline has created anything.
//! Everything after that is per-file: an unreadable or malformed file yields
//! a [`ScannedRecord`] carrying a [`RecordError`], and the iterator moves on.

use crate::metadata::MetadataRecord;
use crate::naming::UNTITLED;
use crate::types::RecordFailure;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Source folder '{}' not found", .0.display())]
    SourceMissing(PathBuf),
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Why a single metadata file was skipped.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// One metadata file and the result of parsing it.
#[derive(Debug)]
pub struct ScannedRecord {
    pub source: PathBuf,
    pub record: Result<MetadataRecord, RecordError>,
}

impl ScannedRecord {
    /// Split into the parsed record or a reportable failure.
    pub fn into_result(self) -> Result<(PathBuf, MetadataRecord), RecordFailure> {
        match self.record {
            Ok(record) => Ok((self.source, record)),
            Err(e) => Err(RecordFailure {
                source: self.source,
                reason: e.to_string(),
            }),
        }
    }
}

/// Lazy iterator over the matching files of one directory.
///
/// Consumes the underlying directory listing; it cannot be restarted.
#[derive(Debug)]
pub struct Records {
    dir: PathBuf,
    entries: fs::ReadDir,
    extension: String,
}

impl Iterator for Records {
    type Item = ScannedRecord;

    fn next(&mut self) -> Option<ScannedRecord> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    return Some(ScannedRecord {
                        source: self.dir.clone(),
                        record: Err(e.into()),
                    });
                }
            };
            let path = entry.path();
            if !matches_extension(&path, &self.extension) {
                continue;
            }
            log::debug!("reading {}", path.display());
            let record = read_record(&path);
            return Some(ScannedRecord {
                source: path,
                record,
            });
        }
    }
}

/// Open `dir` for scanning files ending in `.{extension}`.
pub fn scan(dir: &Path, extension: &str) -> Result<Records, ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::SourceMissing(dir.to_path_buf()));
    }
    let entries = fs::read_dir(dir).map_err(|source| ScanError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    Ok(Records {
        dir: dir.to_path_buf(),
        entries,
        extension: extension.to_string(),
    })
}

/// Read and parse a single metadata file.
pub fn read_record(path: &Path) -> Result<MetadataRecord, RecordError> {
    let text = fs::read_to_string(path)?;
    Ok(MetadataRecord::from_json(&text)?)
}

/// Result of [`check`]: files that parsed and files that did not.
#[derive(Debug, Default)]
pub struct CheckReport {
    /// `(file name, title)` of every record that parsed.
    pub valid: Vec<(String, String)>,
    pub failures: Vec<RecordFailure>,
}

/// Parse every metadata file in `dir` without writing anything.
///
/// Records come back sorted by file name so repeated checks read the same.
pub fn check(dir: &Path, extension: &str) -> Result<CheckReport, ScanError> {
    let mut report = CheckReport::default();
    for scanned in scan(dir, extension)? {
        match scanned.into_result() {
            Ok((source, record)) => {
                let name = source
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let title = record.title_or(UNTITLED).to_string();
                report.valid.push((name, title));
            }
            Err(failure) => report.failures.push(failure),
        }
    }
    report.valid.sort();
    report.failures.sort_by(|a, b| a.source.cmp(&b.source));
    Ok(report)
}

fn matches_extension(path: &Path, extension: &str) -> bool {
    let suffix = format!(".{extension}");
    path.file_name()
        .is_some_and(|n| n.to_string_lossy().ends_with(&suffix))
}
