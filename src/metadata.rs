//! Garden metadata records.
//!
//! One JSON file in the metadata archive describes one entity:
//!
//! ```json
//! {
//!   "title": "My Card!",
//!   "world": "Eldenwood",
//!   "type": "lore",
//!   "author": { "name": "Shay Na", "role": "keeper" },
//!   "created": "2024-03-01",
//!   "updated": "2024-04-12",
//!   "metadata": { "summary": "A short note.", "tags": ["river", "myth"] },
//!   "links": { "notion_url": "https://notion.so/x", "github_url": "#" }
//! }
//! ```
//!
//! ## Missing Fields
//!
//! Every field is optional. A record is never rejected because something is
//! absent: each consumer supplies its own default at the point of use
//! (flowcards say "Untitled" and "unknown", the world tree says "untitled"
//! and "unassigned"). That is why the record keeps `Option`s rather than
//! baking defaults in at parse time.
//!
//! `null` is treated exactly like an absent key. Unknown keys are ignored.
//!
//! ## Loose Scalars
//!
//! Text fields accept numbers and booleans as well as strings, so a record
//! with `"created": 2024` still loads and renders `2024`. Arrays and objects
//! in a text field make the record malformed.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One parsed metadata file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MetadataRecord {
    #[serde(deserialize_with = "loose_text")]
    pub title: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub world: Option<String>,
    #[serde(rename = "type", deserialize_with = "loose_text")]
    pub kind: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub author: Author,
    #[serde(deserialize_with = "loose_text")]
    pub created: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub updated: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub metadata: Details,
    #[serde(deserialize_with = "null_as_default")]
    pub links: Links,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Author {
    #[serde(deserialize_with = "loose_text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub role: Option<String>,
}

/// The nested `metadata` object: free-text summary and tags.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Details {
    #[serde(deserialize_with = "loose_text")]
    pub summary: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Links {
    #[serde(deserialize_with = "loose_text")]
    pub notion_url: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub github_url: Option<String>,
}

impl MetadataRecord {
    /// Parse a record from JSON text. The top-level value must be an object.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        // Structs also deserialize from sequences; only objects are records.
        match serde_json::from_str::<Value>(text)? {
            value @ Value::Object(_) => serde_json::from_value(value),
            other => Err(serde::de::Error::custom(format!(
                "expected a JSON object, found {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn title_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.title.as_deref().unwrap_or(default)
    }

    pub fn world_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.world.as_deref().unwrap_or(default)
    }

    pub fn kind_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.kind.as_deref().unwrap_or(default)
    }

    pub fn author_name_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.author.name.as_deref().unwrap_or(default)
    }
}

/// Accept a string, number or boolean; `null` becomes `None`.
fn loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(serde::de::Error::custom(format!(
            "expected text, found {}",
            json_kind(&other)
        ))),
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_record() {
        let record = MetadataRecord::from_json(
            r#"{
                "title": "My Card!",
                "world": "Eldenwood",
                "type": "lore",
                "author": {"name": "Shay Na", "role": "keeper"},
                "created": "2024-03-01",
                "updated": "2024-04-12",
                "metadata": {"summary": "A note.", "tags": ["river", "myth"]},
                "links": {"notion_url": "https://notion.so/x", "github_url": "https://github.com/x"}
            }"#,
        )
        .unwrap();

        assert_eq!(record.title.as_deref(), Some("My Card!"));
        assert_eq!(record.kind.as_deref(), Some("lore"));
        assert_eq!(record.author.role.as_deref(), Some("keeper"));
        assert_eq!(record.metadata.tags, vec!["river", "myth"]);
        assert_eq!(
            record.links.github_url.as_deref(),
            Some("https://github.com/x")
        );
    }

    #[test]
    fn empty_object_is_valid() {
        let record = MetadataRecord::from_json("{}").unwrap();
        assert_eq!(record, MetadataRecord::default());
        assert_eq!(record.title_or("untitled"), "untitled");
        assert_eq!(record.world_or("unassigned"), "unassigned");
        assert_eq!(record.kind_or("misc"), "misc");
        assert_eq!(record.author_name_or("unknown"), "unknown");
    }

    #[test]
    fn null_fields_behave_like_missing() {
        let record = MetadataRecord::from_json(
            r#"{"title": null, "author": null, "metadata": {"tags": null}, "links": null}"#,
        )
        .unwrap();
        assert_eq!(record, MetadataRecord::default());
    }

    #[test]
    fn empty_string_is_kept_not_defaulted() {
        let record = MetadataRecord::from_json(r#"{"title": ""}"#).unwrap();
        assert_eq!(record.title_or("untitled"), "");
    }

    #[test]
    fn numbers_and_booleans_become_text() {
        let record =
            MetadataRecord::from_json(r#"{"title": 42, "created": 2024, "world": true}"#).unwrap();
        assert_eq!(record.title.as_deref(), Some("42"));
        assert_eq!(record.created.as_deref(), Some("2024"));
        assert_eq!(record.world.as_deref(), Some("true"));
    }

    #[test]
    fn unknown_fields_ignored() {
        let record =
            MetadataRecord::from_json(r#"{"title": "t", "extra": {"deep": [1, 2]}}"#).unwrap();
        assert_eq!(record.title.as_deref(), Some("t"));
    }

    #[test]
    fn object_in_text_field_is_malformed() {
        let err = MetadataRecord::from_json(r#"{"title": {"en": "x"}}"#).unwrap_err();
        assert!(err.to_string().contains("expected text, found object"));
    }

    #[test]
    fn non_object_top_level_is_malformed() {
        let err = MetadataRecord::from_json("[1, 2, 3]").unwrap_err();
        assert!(err.to_string().contains("expected a JSON object, found array"));
        assert!(MetadataRecord::from_json("\"title\"").is_err());
    }

    #[test]
    fn truncated_json_is_malformed() {
        assert!(MetadataRecord::from_json(r#"{"title": "half"#).is_err());
    }
}
