//! Flowcard templates.
//!
//! A template is Markdown text with named placeholders in braces:
//!
//! ```text
//! # {title}
//! *World:* {world}
//! ```
//!
//! ## Placeholders
//!
//! | Placeholder | Source | Default |
//! |-------------|--------|---------|
//! | `{title}` | `title` | `Untitled` |
//! | `{world}` | `world` | `unknown` |
//! | `{type}` | `type` | `misc` |
//! | `{author}` | `author.name` | `unknown` |
//! | `{role}` | `author.role` | empty |
//! | `{created}` | `created` | empty |
//! | `{updated}` | `updated` | empty |
//! | `{summary}` | `metadata.summary` | `No summary.` |
//! | `{tags}` | `metadata.tags`, joined with `", "` | empty |
//! | `{notion_url}` | `links.notion_url` | `#` |
//! | `{github_url}` | `links.github_url` | `#` |
//! | `{timestamp}` | render time, `YYYY-MM-DD HH:MM:SS` | |
//!
//! `{{` and `}}` produce literal braces. Values are inserted verbatim in a
//! single pass: a summary that happens to contain `{title}` stays as typed.
//!
//! ## Parsing
//!
//! The template is parsed once, when loaded. An unknown placeholder or an
//! unbalanced brace is a [`TemplateError`] before any card is rendered, so a
//! broken override file never produces half a run of output.

use crate::clock::CARD_TIMESTAMP_FORMAT;
use crate::metadata::MetadataRecord;
use chrono::NaiveDateTime;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The built-in flowcard layout, used when no override file exists.
pub const DEFAULT_TEMPLATE: &str = concat!(
    "# {title}\n",
    "*World:* {world}  \n",
    "*Type:* {type}  \n",
    "*Author:* {author} ({role})  \n",
    "*Created:* {created}  \n",
    "*Last Updated:* {updated}  \n",
    "\n",
    "---\n",
    "\n",
    "### 🌿 Summary\n",
    "{summary}\n",
    "\n",
    "### 🧩 Tags\n",
    "{tags}\n",
    "\n",
    "### 🔗 Links\n",
    "- [Notion]({notion_url})\n",
    "- [GitHub]({github_url})\n",
    "\n",
    "---\n",
    "*(Generated automatically by Flowcard Engine on {timestamp})*\n",
);

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("IO error reading template {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Unknown placeholder '{{{name}}}' at byte {offset}")]
    UnknownPlaceholder { name: String, offset: usize },
    #[error("Unclosed '{{' at byte {offset}")]
    UnclosedBrace { offset: usize },
    #[error("Single '}}' at byte {offset} (write '}}}}' for a literal brace)")]
    StrayCloseBrace { offset: usize },
}

/// A value a template can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Title,
    World,
    Type,
    Author,
    Role,
    Created,
    Updated,
    Summary,
    Tags,
    NotionUrl,
    GithubUrl,
    Timestamp,
}

impl Placeholder {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "title" => Self::Title,
            "world" => Self::World,
            "type" => Self::Type,
            "author" => Self::Author,
            "role" => Self::Role,
            "created" => Self::Created,
            "updated" => Self::Updated,
            "summary" => Self::Summary,
            "tags" => Self::Tags,
            "notion_url" => Self::NotionUrl,
            "github_url" => Self::GithubUrl,
            "timestamp" => Self::Timestamp,
            _ => return None,
        })
    }

    fn resolve(self, record: &MetadataRecord, timestamp: &str) -> String {
        let text = |value: &Option<String>, default: &str| {
            value.as_deref().unwrap_or(default).to_string()
        };
        match self {
            Self::Title => text(&record.title, "Untitled"),
            Self::World => text(&record.world, "unknown"),
            Self::Type => text(&record.kind, "misc"),
            Self::Author => text(&record.author.name, "unknown"),
            Self::Role => text(&record.author.role, ""),
            Self::Created => text(&record.created, ""),
            Self::Updated => text(&record.updated, ""),
            Self::Summary => text(&record.metadata.summary, "No summary."),
            Self::Tags => record.metadata.tags.join(", "),
            Self::NotionUrl => text(&record.links.notion_url, "#"),
            Self::GithubUrl => text(&record.links.github_url, "#"),
            Self::Timestamp => timestamp.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Field(Placeholder),
}

/// A parsed template, ready to render any number of records.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Load the override at `path`, or the built-in default if there is none.
    ///
    /// A missing file is not an error. Any other read failure is.
    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        match fs::read_to_string(path) {
            Ok(text) => {
                log::debug!("using template override {}", path.display());
                Self::parse(&text)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Self::parse(DEFAULT_TEMPLATE),
            Err(source) => Err(TemplateError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn parse(text: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = text.char_indices().peekable();

        while let Some((offset, c)) = chars.next() {
            match c {
                '{' if chars.peek().is_some_and(|&(_, n)| n == '{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek().is_some_and(|&(_, n)| n == '}') => {
                    chars.next();
                    literal.push('}');
                }
                '}' => return Err(TemplateError::StrayCloseBrace { offset }),
                '{' => {
                    let start = offset + 1;
                    let end = loop {
                        match chars.next() {
                            Some((i, '}')) => break i,
                            Some(_) => {}
                            None => return Err(TemplateError::UnclosedBrace { offset }),
                        }
                    };
                    let name = &text[start..end];
                    let field = Placeholder::from_name(name).ok_or_else(|| {
                        TemplateError::UnknownPlaceholder {
                            name: name.to_string(),
                            offset,
                        }
                    })?;
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Field(field));
                }
                _ => literal.push(c),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Ok(Self { segments })
    }

    /// Substitute `record` into the template, stamped with `generated_at`.
    pub fn render(&self, record: &MetadataRecord, generated_at: NaiveDateTime) -> String {
        let timestamp = generated_at.format(CARD_TIMESTAMP_FORMAT).to_string();
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(s) => out.push_str(s),
                Segment::Field(p) => out.push_str(&p.resolve(record, &timestamp)),
            }
        }
        out
    }

    /// Placeholders used by this template, in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = Placeholder> + '_ {
        self.segments.iter().filter_map(|s| match s {
            Segment::Field(p) => Some(*p),
            Segment::Literal(_) => None,
        })
    }
}
