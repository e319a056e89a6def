//! Tool configuration.
//!
//! Every path the pipelines touch comes from one [`GardenConfig`], built once
//! at startup and passed by reference into each entry point.
//!
//! ## Layers
//!
//! Later layers override earlier ones, key by key:
//!
//! ```text
//! 1. stock defaults           (GardenConfig::default)
//! 2. garden.toml              (or the file named by --config)
//! 3. command-line flags       (--source, --output, --target, --template)
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! source_dir = "garden_596/metadata"   # Directory of metadata files
//! extension = "json"                   # Metadata file extension (no dot)
//!
//! [flowcards]
//! output_dir = "docs/flowcards"                       # Rendered cards go here
//! template = "docs/templates/flowcard_template.md"    # Override, if it exists
//!
//! [regen]
//! target_dir = "garden_597"                            # Root of the world tree
//! placeholder_text = "Placeholder for actual file or link."
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "garden.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GardenConfig {
    /// Directory holding the metadata files.
    pub source_dir: PathBuf,
    /// Extension of metadata files, without the leading dot.
    pub extension: String,
    pub flowcards: FlowcardConfig,
    pub regen: RegenConfig,
}

impl Default for GardenConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("garden_596/metadata"),
            extension: "json".to_string(),
            flowcards: FlowcardConfig::default(),
            regen: RegenConfig::default(),
        }
    }
}

/// Flowcard rendering settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FlowcardConfig {
    /// Directory the `.md` cards are written to (created if absent).
    pub output_dir: PathBuf,
    /// Template override; the built-in template is used when this file
    /// does not exist.
    pub template: PathBuf,
}

impl Default for FlowcardConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("docs/flowcards"),
            template: PathBuf::from("docs/templates/flowcard_template.md"),
        }
    }
}

/// World-tree regeneration settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegenConfig {
    /// Root of the regenerated tree; also receives the manifest log.
    pub target_dir: PathBuf,
    /// Body written into every placeholder file.
    pub placeholder_text: String,
}

impl Default for RegenConfig {
    fn default() -> Self {
        Self {
            target_dir: PathBuf::from("garden_597"),
            placeholder_text: "Placeholder for actual file or link.".to_string(),
        }
    }
}

impl GardenConfig {
    /// Validate values that serde alone cannot check.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.extension.is_empty() {
            return Err(ConfigError::Validation(
                "extension must not be empty".into(),
            ));
        }
        if self.extension.starts_with('.') {
            return Err(ConfigError::Validation(
                "extension must not start with '.' (write \"json\", not \".json\")".into(),
            ));
        }
        if self.extension.contains(['/', '\\']) {
            return Err(ConfigError::Validation(
                "extension must not contain path separators".into(),
            ));
        }
        Ok(())
    }
}

/// Path overrides taken from the command line. `None` leaves a key alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub source_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub target_dir: Option<PathBuf>,
    pub template: Option<PathBuf>,
}

impl Overrides {
    /// Express the overrides as a sparse TOML table for merging.
    pub fn to_toml(&self) -> toml::Value {
        fn path_value(p: &Path) -> toml::Value {
            toml::Value::String(p.to_string_lossy().into_owned())
        }

        let mut root = toml::Table::new();
        if let Some(p) = &self.source_dir {
            root.insert("source_dir".into(), path_value(p));
        }
        let mut flowcards = toml::Table::new();
        if let Some(p) = &self.output_dir {
            flowcards.insert("output_dir".into(), path_value(p));
        }
        if let Some(p) = &self.template {
            flowcards.insert("template".into(), path_value(p));
        }
        if !flowcards.is_empty() {
            root.insert("flowcards".into(), toml::Value::Table(flowcards));
        }
        if let Some(p) = &self.target_dir {
            let mut regen = toml::Table::new();
            regen.insert("target_dir".into(), path_value(p));
            root.insert("regen".into(), toml::Value::Table(regen));
        }
        toml::Value::Table(root)
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(GardenConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge overlays onto a base value in order, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlays: impl IntoIterator<Item = toml::Value>,
) -> Result<GardenConfig, ConfigError> {
    let merged = overlays.into_iter().fold(base, merge_toml);
    let config: GardenConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Build the effective config: stock defaults, then `path` if it exists,
/// then the command-line `overrides`.
pub fn load_config(path: &Path, overrides: &Overrides) -> Result<GardenConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let file = load_raw_config(path)?;
    if file.is_some() {
        log::debug!("loaded config from {}", path.display());
    }
    resolve_config(base, file.into_iter().chain([overrides.to_toml()]))
}

/// Returns a fully-commented stock `garden.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Garden Tools Configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Command-line flags (--source, --output, --target, --template) override
# the values in this file. Unknown keys will cause an error.

# Directory holding the metadata files.
source_dir = "garden_596/metadata"

# Extension of metadata files, without the leading dot.
extension = "json"

# ---------------------------------------------------------------------------
# Flowcards (garden flowcards)
# ---------------------------------------------------------------------------
[flowcards]
# Rendered Markdown cards are written here, one per record.
output_dir = "docs/flowcards"

# Template override. When this file does not exist the built-in template is
# used; print it with `garden print-template`.
template = "docs/templates/flowcard_template.md"

# ---------------------------------------------------------------------------
# World tree (garden regen)
# ---------------------------------------------------------------------------
[regen]
# Root of the regenerated <world>/<author>/<type>/<title>.txt tree.
# Each run also writes manifest_<timestamp>.log here.
target_dir = "garden_597"

# Body of every placeholder file.
placeholder_text = "Placeholder for actual file or link."
"##
}
