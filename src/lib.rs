//! # Garden Tools
//!
//! Tooling for a Garden metadata archive: a directory of JSON files, one per
//! creative-world entity (a story, a map, a song), each naming its world,
//! author, type, tags and links.
//!
//! # Two Pipelines
//!
//! The crate runs two independent pipelines over the same archive:
//!
//! ```text
//! flowcards   metadata/*.json  →  docs/flowcards/<title>.md
//! regen       metadata/*.json  →  garden_597/<world>/<author>/<type>/<title>.txt
//!                                 garden_597/manifest_<timestamp>.log
//! ```
//!
//! Both share one shape, executed once per metadata file with no state
//! carried between records beyond a running tally:
//!
//! ```text
//! scan  →  sanitize  →  render / place  →  write
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Enumerates and parses metadata files; a bad file is a per-record failure |
//! | [`metadata`] | The `MetadataRecord` shape, with every field optional |
//! | [`naming`] | `sanitize`: any string → `[A-Za-z0-9_-]{0,64}` |
//! | [`template`] | Flowcard template parsing and placeholder substitution |
//! | [`flowcard`] | Card pipeline: render each record to `<title>.md` |
//! | [`regen`] | World-tree pipeline: place each record under `world/author/type` |
//! | [`manifest`] | Per-run source → destination log for a regen run |
//! | [`config`] | Layered `garden.toml` loading, validation, overrides |
//! | [`clock`] | Injected wall clock, so output can be pinned in tests |
//! | [`types`] | Per-record events and the run tally shared by both pipelines |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Soft and Hard Failures
//!
//! Exactly two things are soft. A missing source directory ends the run
//! before anything is created, and the CLI still exits successfully. A
//! metadata file that cannot be read or parsed is skipped and reported while
//! the run continues. Everything else (a failed write, an unreadable or
//! malformed template, a bad config) is a typed error returned to the caller.
//!
//! ## Collisions Overwrite
//!
//! Sanitizing is lossy, so two titles can land on the same file. The later
//! record wins. The run logs a warning and counts the collision in its
//! summary.
//!
//! ## Full Rebuilds
//!
//! There is no incremental mode. Every run rewrites every output it derives.
//! With a fixed clock, two runs over the same archive produce byte-identical
//! cards and trees.

pub mod clock;
pub mod config;
pub mod flowcard;
pub mod manifest;
pub mod metadata;
pub mod naming;
pub mod output;
pub mod regen;
pub mod scan;
pub mod template;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
