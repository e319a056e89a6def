//! Per-record outcomes shared by both pipelines.
//!
//! Each pipeline reports progress through [`RecordEvent`]s as it goes and
//! keeps a [`Tally`] that ends up in its run summary.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A metadata file that could not be turned into a record.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordFailure {
    pub source: PathBuf,
    /// Human-readable cause (I/O or JSON error message).
    pub reason: String,
}

/// Two records in one run mapped to the same output file.
#[derive(Debug, Clone, PartialEq)]
pub struct Collision {
    pub destination: PathBuf,
    /// Source whose output was replaced.
    pub previous: PathBuf,
    /// Source that replaced it.
    pub current: PathBuf,
}

/// Progress notification for one input file.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordEvent {
    Written {
        source: PathBuf,
        destination: PathBuf,
        /// Earlier source from this run whose output was overwritten.
        overwrote: Option<PathBuf>,
    },
    Skipped(RecordFailure),
}

/// Running totals for one pipeline run.
#[derive(Debug, Default)]
pub struct Tally {
    written: HashMap<PathBuf, PathBuf>,
    count: usize,
    pub failures: Vec<RecordFailure>,
    pub collisions: Vec<Collision>,
}

impl Tally {
    /// Record a successful write and return the event for it.
    ///
    /// Writing the same destination twice counts twice; the second write is
    /// reported as a collision.
    pub fn written(&mut self, source: &Path, destination: &Path) -> RecordEvent {
        self.count += 1;
        let overwrote = self
            .written
            .insert(destination.to_path_buf(), source.to_path_buf());
        if let Some(previous) = &overwrote {
            log::warn!(
                "{} overwrites output of {} at {}",
                source.display(),
                previous.display(),
                destination.display()
            );
            self.collisions.push(Collision {
                destination: destination.to_path_buf(),
                previous: previous.clone(),
                current: source.to_path_buf(),
            });
        }
        RecordEvent::Written {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            overwrote,
        }
    }

    pub fn skipped(&mut self, failure: RecordFailure) -> RecordEvent {
        self.failures.push(failure.clone());
        RecordEvent::Skipped(failure)
    }

    /// Number of successful writes, collisions included.
    pub fn count(&self) -> usize {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_writes() {
        let mut tally = Tally::default();
        tally.written(Path::new("a.json"), Path::new("out/a.md"));
        tally.written(Path::new("b.json"), Path::new("out/b.md"));
        assert_eq!(tally.count(), 2);
        assert!(tally.collisions.is_empty());
    }

    #[test]
    fn second_write_to_same_destination_is_collision() {
        let mut tally = Tally::default();
        tally.written(Path::new("a.json"), Path::new("out/x.md"));
        let event = tally.written(Path::new("b.json"), Path::new("out/x.md"));

        assert_eq!(tally.count(), 2);
        assert_eq!(
            tally.collisions,
            vec![Collision {
                destination: PathBuf::from("out/x.md"),
                previous: PathBuf::from("a.json"),
                current: PathBuf::from("b.json"),
            }]
        );
        assert!(matches!(
            event,
            RecordEvent::Written { overwrote: Some(ref p), .. } if p == Path::new("a.json")
        ));
    }

    #[test]
    fn skipped_records_failure() {
        let mut tally = Tally::default();
        let failure = RecordFailure {
            source: PathBuf::from("bad.json"),
            reason: "invalid JSON".into(),
        };
        let event = tally.skipped(failure.clone());
        assert_eq!(event, RecordEvent::Skipped(failure.clone()));
        assert_eq!(tally.failures, vec![failure]);
        assert_eq!(tally.count(), 0);
    }
}
