//! Shared test utilities for the garden-tools test suite.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let config = test_config(tmp.path());
//! write_record(&config.source_dir, "card.json", &sample_json());
//! let summary = regenerate(&config, &fixed_clock(), |_| {}).unwrap();
//! ```

use chrono::{NaiveDate, NaiveDateTime};
use std::path::{Path, PathBuf};

use crate::clock::FixedClock;
use crate::config::{FlowcardConfig, GardenConfig, RegenConfig};

// =========================================================================
// Fixtures
// =========================================================================

/// The record used throughout the docs: `{"title":"My Card!", ...}`.
pub fn sample_json() -> String {
    r#"{"title":"My Card!","world":"Eldenwood","author":{"name":"Shay Na"},"type":"lore"}"#
        .to_string()
}

/// Write `contents` to `dir/name`, creating `dir` if needed.
pub fn write_record(dir: &Path, name: &str, contents: &str) -> PathBuf {
    std::fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

/// Config rooted in `root`: the source directory exists (empty), the
/// output and target directories and the template override do not.
pub fn test_config(root: &Path) -> GardenConfig {
    let source_dir = root.join("metadata");
    std::fs::create_dir_all(&source_dir).unwrap();
    GardenConfig {
        source_dir,
        extension: "json".to_string(),
        flowcards: FlowcardConfig {
            output_dir: root.join("flowcards"),
            template: root.join("flowcard_template.md"),
        },
        regen: RegenConfig {
            target_dir: root.join("world"),
            ..RegenConfig::default()
        },
    }
}

// =========================================================================
// Time
// =========================================================================

/// 2026-10-19 14:30:00, the instant every test clock is pinned to.
pub fn fixed_instant() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 19)
        .unwrap()
        .and_hms_opt(14, 30, 0)
        .unwrap()
}

pub fn fixed_clock() -> FixedClock {
    FixedClock(fixed_instant())
}
