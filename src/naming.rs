//! Filesystem-safe names for titles, worlds, authors and types.
//!
//! Every path component the pipelines derive from metadata goes through
//! [`sanitize`]. The mapping is deliberately blunt:
//!
//! - ASCII letters, digits, `-` and `_` are kept as-is
//! - every other character (including each non-ASCII scalar) becomes `_`
//! - the result is cut to [`MAX_NAME_LEN`] characters
//!
//! ```text
//! "My Card!"      → "My_Card_"
//! "Shay Na"       → "Shay_Na"
//! "Ærø/../etc"    → "_r_____etc"
//! ""              → ""
//! ```
//!
//! There is no collapsing of repeated underscores and no uniqueness
//! guarantee: `"a b"` and `"a?b"` both become `"a_b"`. Collisions are
//! detected by the pipelines (see [`crate::types::Tally`]), not here.

use std::fmt;
use std::path::Path;

/// Maximum length of a sanitized name, in characters.
pub const MAX_NAME_LEN: usize = 64;

/// Stand-in for a missing title wherever a file name is derived from it.
pub const UNTITLED: &str = "untitled";

/// Map an arbitrary string to a token matching `[A-Za-z0-9_-]{0,64}`.
pub fn sanitize(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(MAX_NAME_LEN)
        .collect()
}

/// A name that has already been through [`sanitize`].
///
/// Only constructible via [`SanitizedName::new`], so holding one is proof the
/// character-set and length invariants hold.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SanitizedName(String);

impl SanitizedName {
    pub fn new(raw: &str) -> Self {
        Self(sanitize(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name with the given extension appended, e.g. `My_Card_.md`.
    pub fn with_extension(&self, ext: &str) -> String {
        format!("{}.{}", self.0, ext)
    }
}

impl fmt::Display for SanitizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<Path> for SanitizedName {
    fn as_ref(&self) -> &Path {
        Path::new(&self.0)
    }
}
