//! Flowcard generation.
//!
//! Renders every metadata record into a Markdown card:
//!
//! ```text
//! garden_596/metadata/ember.json   →   docs/flowcards/Ember_Tale.md
//! ```
//!
//! The card file is named after the sanitized title (`untitled` when the
//! record has none) and overwritten on every run. Cards carry a generation
//! timestamp, so two runs differ in that line and nowhere else.
//!
//! ## Run Order
//!
//! 1. Check the source directory exists; if not, nothing is created.
//! 2. Create the output directory (and parents).
//! 3. Load and parse the template once.
//! 4. For each metadata file: parse, render, write. A file that fails to
//!    parse is reported and skipped.

use crate::clock::Clock;
use crate::config::GardenConfig;
use crate::naming::{SanitizedName, UNTITLED};
use crate::scan::{self, ScanError};
use crate::template::{Template, TemplateError};
use crate::types::{Collision, RecordEvent, RecordFailure, Tally};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlowcardError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),
    #[error("IO error writing {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What a completed flowcard run produced.
#[derive(Debug)]
pub struct FlowcardSummary {
    pub output_dir: PathBuf,
    /// Cards written, including ones later overwritten in the same run.
    pub written: usize,
    pub failures: Vec<RecordFailure>,
    pub collisions: Vec<Collision>,
}

/// Path of the card for a record titled `title`.
pub fn card_path(output_dir: &Path, title: &str) -> PathBuf {
    output_dir.join(SanitizedName::new(title).with_extension("md"))
}

/// Render every record under `config.source_dir` into `config.flowcards.output_dir`.
///
/// `on_event` is called once per metadata file, as soon as it is handled.
pub fn generate_flowcards(
    config: &GardenConfig,
    clock: &dyn Clock,
    mut on_event: impl FnMut(&RecordEvent),
) -> Result<FlowcardSummary, FlowcardError> {
    let records = scan::scan(&config.source_dir, &config.extension)?;

    let output_dir = &config.flowcards.output_dir;
    fs::create_dir_all(output_dir).map_err(|source| FlowcardError::Write {
        path: output_dir.clone(),
        source,
    })?;
    let template = Template::load(&config.flowcards.template)?;

    let mut tally = Tally::default();
    for scanned in records {
        let event = match scanned.into_result() {
            Ok((source, record)) => {
                let body = template.render(&record, clock.now());
                let path = card_path(output_dir, record.title_or(UNTITLED));
                fs::write(&path, body).map_err(|source| FlowcardError::Write {
                    path: path.clone(),
                    source,
                })?;
                log::debug!("wrote {}", path.display());
                tally.written(&source, &path)
            }
            Err(failure) => tally.skipped(failure),
        };
        on_event(&event);
    }

    Ok(FlowcardSummary {
        output_dir: output_dir.clone(),
        written: tally.count(),
        failures: tally.failures,
        collisions: tally.collisions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn run(config: &GardenConfig) -> (FlowcardSummary, Vec<RecordEvent>) {
        let mut events = Vec::new();
        let summary =
            generate_flowcards(config, &fixed_clock(), |e| events.push(e.clone())).unwrap();
        (summary, events)
    }

    #[test]
    fn card_path_uses_sanitized_title() {
        assert_eq!(
            card_path(Path::new("out"), "My Card!"),
            PathBuf::from("out/My_Card_.md")
        );
        assert_eq!(card_path(Path::new("out"), ""), PathBuf::from("out/.md"));
    }

    #[test]
    fn renders_sample_record() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path());
        write_record(&config.source_dir, "card.json", &sample_json());

        let (summary, events) = run(&config);

        let card = config.flowcards.output_dir.join("My_Card_.md");
        let body = fs::read_to_string(&card).unwrap();
        assert!(body.contains("Shay Na"));
        assert!(body.contains("*Type:* lore"));
        assert!(body.contains("No summary."));
        assert!(body.contains("2026-10-19 14:30:00"));
        assert_eq!(summary.written, 1);
        assert_eq!(
            events,
            vec![RecordEvent::Written {
                source: config.source_dir.join("card.json"),
                destination: card,
                overwrote: None,
            }]
        );
    }

    #[test]
    fn missing_source_creates_nothing() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path());
        fs::remove_dir(&config.source_dir).unwrap();

        let result = generate_flowcards(&config, &fixed_clock(), |_| {});
        assert!(matches!(
            result,
            Err(FlowcardError::Scan(ScanError::SourceMissing(_)))
        ));
        assert!(!config.flowcards.output_dir.exists());
    }

    #[test]
    fn malformed_record_skipped_and_run_continues() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path());
        write_record(&config.source_dir, "bad.json", "{ nope");
        write_record(&config.source_dir, "good.json", &sample_json());

        let (summary, events) = run(&config);

        assert_eq!(summary.written, 1);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].source, config.source_dir.join("bad.json"));
        assert_eq!(events.len(), 2);
        assert!(config.flowcards.output_dir.join("My_Card_.md").exists());
    }

    #[test]
    fn untitled_record_named_lowercase_but_rendered_capitalized() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path());
        write_record(&config.source_dir, "blank.json", "{}");

        run(&config);

        let body = fs::read_to_string(config.flowcards.output_dir.join("untitled.md")).unwrap();
        assert!(body.starts_with("# Untitled\n"));
    }

    #[test]
    fn template_override_is_used() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path());
        fs::write(&config.flowcards.template, "{title}|{world}|{timestamp}").unwrap();
        write_record(&config.source_dir, "card.json", &sample_json());

        run(&config);

        let body = fs::read_to_string(config.flowcards.output_dir.join("My_Card_.md")).unwrap();
        assert_eq!(body, "My Card!|Eldenwood|2026-10-19 14:30:00");
    }

    #[test]
    fn broken_template_fails_before_any_card() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path());
        fs::write(&config.flowcards.template, "{title} {nope}").unwrap();
        write_record(&config.source_dir, "card.json", &sample_json());

        let result = generate_flowcards(&config, &fixed_clock(), |_| {});
        assert!(matches!(result, Err(FlowcardError::Template(_))));
        assert_eq!(
            fs::read_dir(&config.flowcards.output_dir).unwrap().count(),
            0
        );
    }

    #[test]
    fn colliding_titles_overwrite_and_are_reported() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path());
        write_record(&config.source_dir, "a.json", r#"{"title": "Same?", "world": "A"}"#);
        write_record(&config.source_dir, "b.json", r#"{"title": "Same!", "world": "B"}"#);

        let (summary, _) = run(&config);

        assert_eq!(summary.written, 2);
        assert_eq!(summary.collisions.len(), 1);
        assert_eq!(
            summary.collisions[0].destination,
            config.flowcards.output_dir.join("Same_.md")
        );
        let outputs = fs::read_dir(&config.flowcards.output_dir).unwrap().count();
        assert_eq!(outputs, 1);
    }

    #[test]
    fn rerun_is_byte_identical_with_fixed_clock() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path());
        write_record(&config.source_dir, "card.json", &sample_json());
        let card = config.flowcards.output_dir.join("My_Card_.md");

        run(&config);
        let first = fs::read(&card).unwrap();
        run(&config);
        assert_eq!(fs::read(&card).unwrap(), first);
    }
}
