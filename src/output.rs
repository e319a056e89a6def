//! CLI output formatting for both pipelines.
//!
//! # Output Format
//!
//! ## Progress (one line per metadata file)
//!
//! ```text
//! ember.json → docs/flowcards/Ember_Tale.md
//! broken.json: skipped (invalid JSON: EOF while parsing an object at line 1 column 9)
//! twin.json → docs/flowcards/Twin.md
//!     overwrites output of other-twin.json
//! ```
//!
//! ## Flowcards summary
//!
//! ```text
//! Generated 2 flowcards → docs/flowcards
//!     Skipped: 1
//! ```
//!
//! ## Regen summary
//!
//! ```text
//! Regenerated 2 records
//!     Target: /home/me/garden_597
//!     Manifest: manifest_20261019_143000.log
//!     Skipped: 1
//! ```
//!
//! # Architecture
//!
//! Each piece of output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions do no I/O.

use crate::flowcard::FlowcardSummary;
use crate::regen::RegenSummary;
use crate::scan::CheckReport;
use crate::types::{Collision, RecordEvent, RecordFailure};
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

fn failure_line(failure: &RecordFailure) -> String {
    format!("{}: skipped ({})", file_name(&failure.source), failure.reason)
}

/// Shared tail of both summaries: skip and collision counts, when non-zero.
fn problem_lines(failures: &[RecordFailure], collisions: &[Collision]) -> Vec<String> {
    let mut lines = Vec::new();
    if !failures.is_empty() {
        lines.push(format!("{}Skipped: {}", indent(1), failures.len()));
    }
    if !collisions.is_empty() {
        lines.push(format!(
            "{}Overwritten in this run: {}",
            indent(1),
            collisions.len()
        ));
    }
    lines
}

// ============================================================================
// Progress
// ============================================================================

pub fn format_record_event(event: &RecordEvent) -> Vec<String> {
    match event {
        RecordEvent::Written {
            source,
            destination,
            overwrote,
        } => {
            let mut lines = vec![format!(
                "{} → {}",
                file_name(source),
                destination.display()
            )];
            if let Some(previous) = overwrote {
                lines.push(format!(
                    "{}overwrites output of {}",
                    indent(1),
                    file_name(previous)
                ));
            }
            lines
        }
        RecordEvent::Skipped(failure) => vec![failure_line(failure)],
    }
}

pub fn print_record_event(event: &RecordEvent) {
    for line in format_record_event(event) {
        println!("{}", line);
    }
}

/// Diagnostic for a run that found no source directory.
pub fn format_source_missing(source_dir: &Path) -> Vec<String> {
    vec![format!(
        "Source folder '{}' not found, nothing to do",
        source_dir.display()
    )]
}

pub fn print_source_missing(source_dir: &Path) {
    for line in format_source_missing(source_dir) {
        println!("{}", line);
    }
}

// ============================================================================
// Summaries
// ============================================================================

pub fn format_flowcard_summary(summary: &FlowcardSummary) -> Vec<String> {
    let mut lines = vec![format!(
        "Generated {} → {}",
        plural(summary.written, "flowcard", "flowcards"),
        summary.output_dir.display()
    )];
    lines.extend(problem_lines(&summary.failures, &summary.collisions));
    lines
}

pub fn print_flowcard_summary(summary: &FlowcardSummary) {
    for line in format_flowcard_summary(summary) {
        println!("{}", line);
    }
}

pub fn format_regen_summary(summary: &RegenSummary) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Regenerated {}",
            plural(summary.processed, "record", "records")
        ),
        format!("{}Target: {}", indent(1), summary.target_root.display()),
        format!("{}Manifest: {}", indent(1), summary.manifest_name()),
    ];
    lines.extend(problem_lines(&summary.failures, &summary.collisions));
    lines
}

pub fn print_regen_summary(summary: &RegenSummary) {
    for line in format_regen_summary(summary) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format check output: one line per valid record (file name and title),
/// then the failures, then a count.
///
/// ```text
/// ember.json  Ember Tale
/// blank.json  untitled
/// broken.json: skipped (invalid JSON: ...)
/// 2 valid, 1 invalid
/// ```
pub fn format_check_output(report: &CheckReport) -> Vec<String> {
    let mut lines: Vec<String> = report
        .valid
        .iter()
        .map(|(name, title)| format!("{name}  {title}"))
        .collect();
    lines.extend(report.failures.iter().map(failure_line));
    lines.push(format!(
        "{} valid, {} invalid",
        report.valid.len(),
        report.failures.len()
    ));
    lines
}

pub fn print_check_output(report: &CheckReport) {
    for line in format_check_output(report) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn failure(name: &str) -> RecordFailure {
        RecordFailure {
            source: PathBuf::from("meta").join(name),
            reason: "invalid JSON: expected value at line 1 column 1".into(),
        }
    }

    #[test]
    fn written_event_shows_source_name_and_destination() {
        let event = RecordEvent::Written {
            source: PathBuf::from("garden/meta/card.json"),
            destination: PathBuf::from("out/My_Card_.md"),
            overwrote: None,
        };
        assert_eq!(format_record_event(&event), vec!["card.json → out/My_Card_.md"]);
    }

    #[test]
    fn overwrite_gets_context_line() {
        let event = RecordEvent::Written {
            source: PathBuf::from("meta/b.json"),
            destination: PathBuf::from("out/x.md"),
            overwrote: Some(PathBuf::from("meta/a.json")),
        };
        assert_eq!(
            format_record_event(&event),
            vec!["b.json → out/x.md", "    overwrites output of a.json"]
        );
    }

    #[test]
    fn skipped_event_names_file_and_reason() {
        let lines = format_record_event(&RecordEvent::Skipped(failure("bad.json")));
        assert_eq!(
            lines,
            vec!["bad.json: skipped (invalid JSON: expected value at line 1 column 1)"]
        );
    }

    #[test]
    fn source_missing_line() {
        assert_eq!(
            format_source_missing(Path::new("garden_596/metadata")),
            vec!["Source folder 'garden_596/metadata' not found, nothing to do"]
        );
    }

    #[test]
    fn flowcard_summary_clean_run() {
        let summary = FlowcardSummary {
            output_dir: PathBuf::from("docs/flowcards"),
            written: 1,
            failures: vec![],
            collisions: vec![],
        };
        assert_eq!(
            format_flowcard_summary(&summary),
            vec!["Generated 1 flowcard → docs/flowcards"]
        );
    }

    #[test]
    fn flowcard_summary_with_problems() {
        let summary = FlowcardSummary {
            output_dir: PathBuf::from("docs/flowcards"),
            written: 3,
            failures: vec![failure("bad.json")],
            collisions: vec![Collision {
                destination: PathBuf::from("docs/flowcards/x.md"),
                previous: PathBuf::from("a.json"),
                current: PathBuf::from("b.json"),
            }],
        };
        assert_eq!(
            format_flowcard_summary(&summary),
            vec![
                "Generated 3 flowcards → docs/flowcards",
                "    Skipped: 1",
                "    Overwritten in this run: 1",
            ]
        );
    }

    #[test]
    fn regen_summary_lines() {
        let summary = RegenSummary {
            processed: 0,
            target_root: PathBuf::from("/abs/garden_597"),
            manifest_path: PathBuf::from("/abs/garden_597/manifest_20261019_143000.log"),
            failures: vec![],
            collisions: vec![],
        };
        assert_eq!(
            format_regen_summary(&summary),
            vec![
                "Regenerated 0 records",
                "    Target: /abs/garden_597",
                "    Manifest: manifest_20261019_143000.log",
            ]
        );
    }

    #[test]
    fn check_output_lists_valid_then_invalid() {
        let report = CheckReport {
            valid: vec![("card.json".into(), "My Card!".into())],
            failures: vec![failure("bad.json")],
        };
        let lines = format_check_output(&report);
        assert_eq!(lines[0], "card.json  My Card!");
        assert!(lines[1].starts_with("bad.json: skipped"));
        assert_eq!(lines[2], "1 valid, 1 invalid");
    }
}
