//! Regeneration manifest log.
//!
//! Every regen run writes one log file into the target root, named after the
//! time the run started:
//!
//! ```text
//! garden_597/manifest_20261019_143000.log
//! ```
//!
//! The file starts empty on every run, even when a log with the same name is
//! already there. Each successfully placed record then adds one line as soon
//! as its file is written:
//!
//! ```text
//! ember-tale.json → garden_597/Eldenwood/Shay_Na/lore/Ember_Tale.txt
//! ```
//!
//! The log is write-only from this crate's point of view. It is for people
//! auditing a run, not an input to any later stage.

use chrono::NaiveDateTime;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, LineWriter, Write};
use std::path::{Path, PathBuf};

use crate::clock::MANIFEST_TIMESTAMP_FORMAT;

/// File name for the manifest of a run started at `started`.
pub fn manifest_file_name(started: NaiveDateTime) -> String {
    format!("manifest_{}.log", started.format(MANIFEST_TIMESTAMP_FORMAT))
}

/// One source-to-destination mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestEntry {
    /// File name of the metadata file, without its directory.
    pub source_name: String,
    pub destination: PathBuf,
}

impl ManifestEntry {
    pub fn new(source: &Path, destination: &Path) -> Self {
        let source_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| source.display().to_string());
        Self {
            source_name,
            destination: destination.to_path_buf(),
        }
    }
}

impl fmt::Display for ManifestEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.source_name, self.destination.display())
    }
}

/// Open manifest log for the duration of one run.
///
/// Creating the writer truncates any existing file. Lines are flushed as they
/// are written. Dropping the writer closes it, so an early `?` return never leaks the handle; call
/// [`ManifestWriter::finish`] on the success path to surface flush errors.
#[derive(Debug)]
pub struct ManifestWriter {
    path: PathBuf,
    out: LineWriter<File>,
}

impl ManifestWriter {
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        log::debug!("opened manifest {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            out: LineWriter::new(file),
        })
    }

    pub fn append(&mut self, entry: &ManifestEntry) -> io::Result<()> {
        writeln!(self.out, "{entry}")
    }

    /// Flush and close, returning the log's path.
    pub fn finish(mut self) -> io::Result<PathBuf> {
        self.out.flush()?;
        self.out.get_ref().sync_all()?;
        Ok(self.path)
    }
}
