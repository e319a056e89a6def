//! World-tree regeneration.
//!
//! Rebuilds a directory tree from metadata, one placeholder file per record:
//!
//! ```text
//! garden_597/
//! ├── manifest_20261019_143000.log
//! └── Eldenwood/                 # sanitize(world)       or "unassigned"
//!     └── Shay_Na/               # sanitize(author.name) or "unknown"
//!         └── lore/              # sanitize(type)        or "misc"
//!             └── My_Card_.txt   # sanitize(title)       or "untitled"
//! ```
//!
//! Every run is a full rebuild on top of whatever is already there: existing
//! placeholders are overwritten, nothing is deleted.
//!
//! ## Run Order
//!
//! 1. Check the source directory exists. If not, stop: no target directory,
//!    no manifest.
//! 2. Create the target root and open `manifest_<start time>.log` in it.
//! 3. For each metadata file: parse, create the destination directory,
//!    write the placeholder, append the manifest line. A file that fails to
//!    parse is reported and skipped; nothing is retried.
//! 4. Close the manifest and resolve the target root to an absolute path
//!    for the summary.

use crate::clock::Clock;
use crate::config::GardenConfig;
use crate::manifest::{ManifestEntry, ManifestWriter, manifest_file_name};
use crate::metadata::MetadataRecord;
use crate::naming::{SanitizedName, UNTITLED};
use crate::scan::{self, ScanError};
use crate::types::{Collision, RecordEvent, RecordFailure, Tally};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegenError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

trait IoContext<T> {
    fn at(self, path: &Path) -> Result<T, RegenError>;
}

impl<T> IoContext<T> for io::Result<T> {
    fn at(self, path: &Path) -> Result<T, RegenError> {
        self.map_err(|source| RegenError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// What a completed regeneration run produced.
#[derive(Debug)]
pub struct RegenSummary {
    /// Records placed, including ones later overwritten in the same run.
    pub processed: usize,
    /// Absolute path of the target root.
    pub target_root: PathBuf,
    pub manifest_path: PathBuf,
    pub failures: Vec<RecordFailure>,
    pub collisions: Vec<Collision>,
}

impl RegenSummary {
    pub fn manifest_name(&self) -> String {
        self.manifest_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Where the placeholder for `record` goes under `target_root`.
pub fn placement(record: &MetadataRecord, target_root: &Path) -> PathBuf {
    let world = SanitizedName::new(record.world_or("unassigned"));
    let author = SanitizedName::new(record.author_name_or("unknown"));
    let category = SanitizedName::new(record.kind_or("misc"));
    let title = SanitizedName::new(record.title_or(UNTITLED));
    target_root
        .join(world)
        .join(author)
        .join(category)
        .join(title.with_extension("txt"))
}

/// Rebuild the world tree under `config.regen.target_dir`.
///
/// `on_event` is called once per metadata file, after its manifest line has
/// been written.
pub fn regenerate(
    config: &GardenConfig,
    clock: &dyn Clock,
    mut on_event: impl FnMut(&RecordEvent),
) -> Result<RegenSummary, RegenError> {
    let records = scan::scan(&config.source_dir, &config.extension)?;

    let target = &config.regen.target_dir;
    fs::create_dir_all(target).at(target)?;
    let manifest_path = target.join(manifest_file_name(clock.now()));
    let mut manifest = ManifestWriter::create(&manifest_path).at(&manifest_path)?;

    let mut tally = Tally::default();
    for scanned in records {
        let event = match scanned.into_result() {
            Ok((source, record)) => {
                let destination = placement(&record, target);
                if let Some(dir) = destination.parent() {
                    fs::create_dir_all(dir).at(dir)?;
                }
                fs::write(&destination, &config.regen.placeholder_text).at(&destination)?;
                manifest
                    .append(&ManifestEntry::new(&source, &destination))
                    .at(&manifest_path)?;
                log::debug!("placed {}", destination.display());
                tally.written(&source, &destination)
            }
            Err(failure) => tally.skipped(failure),
        };
        on_event(&event);
    }

    let manifest_path = manifest.finish().at(&manifest_path)?;
    let target_root = fs::canonicalize(target).at(target)?;

    Ok(RegenSummary {
        processed: tally.count(),
        target_root,
        manifest_path,
        failures: tally.failures,
        collisions: tally.collisions,
    })
}
