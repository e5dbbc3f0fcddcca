//! A ready-made item type for data that arrives as records.

use super::{FeedItem, ItemValue};
use crate::log;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, de::IgnoredAny};
use std::collections::BTreeMap;
use thiserror::Error;

/// An item deserialized from a record (TOML table, JSON object).
///
/// Keys other than the four fixed ones are kept in `extra` and can be
/// mapped with `Accessor::Field`. Scalar extras (strings, numbers, booleans,
/// TOML datetimes) are stored as text; arrays and tables are skipped with a
/// warning.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawEntry")]
pub struct Entry {
    pub title: String,
    pub description: String,
    pub link: String,
    pub published_at: DateTime<FixedOffset>,
    pub extra: BTreeMap<String, String>,
}

#[derive(Debug, Error)]
pub enum EntryError {
    #[error("`{0}` is not a date with a UTC offset")]
    NotADate(String),
}

#[derive(Deserialize)]
struct RawEntry {
    title: String,
    #[serde(default)]
    description: String,
    link: String,
    #[serde(alias = "pubDate", alias = "date")]
    published_at: DateInput,
    #[serde(flatten)]
    extra: BTreeMap<String, ExtraValue>,
}

/// RFC 3339 text, or a TOML datetime literal.
#[derive(Deserialize)]
#[serde(untagged)]
enum DateInput {
    Text(String),
    Toml(toml::value::Datetime),
}

impl DateInput {
    fn parse(self) -> Result<DateTime<FixedOffset>, EntryError> {
        let text = match self {
            Self::Text(text) => text,
            Self::Toml(datetime) => datetime.to_string(),
        };
        text.trim().parse().map_err(|_| EntryError::NotADate(text))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ExtraValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Date(toml::value::Datetime),
    Other(IgnoredAny),
}

impl ExtraValue {
    fn into_text(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            Self::Integer(n) => Some(n.to_string()),
            Self::Float(n) => Some(n.to_string()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Date(datetime) => Some(datetime.to_string()),
            Self::Other(_) => None,
        }
    }
}

impl TryFrom<RawEntry> for Entry {
    type Error = EntryError;

    fn try_from(raw: RawEntry) -> Result<Self, Self::Error> {
        let published_at = raw.published_at.parse()?;

        let mut extra = BTreeMap::new();
        for (key, value) in raw.extra {
            match value.into_text() {
                Some(text) => {
                    extra.insert(key, text);
                }
                None => {
                    log!("warning"; "item `{}`: ignoring field `{}`, not a scalar", raw.title, key)
                }
            }
        }

        Ok(Self {
            title: raw.title,
            description: raw.description,
            link: raw.link,
            published_at,
            extra,
        })
    }
}

impl Entry {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        link: impl Into<String>,
        published_at: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            link: link.into(),
            published_at,
            extra: BTreeMap::new(),
        }
    }

    /// Attach an extra named value.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

impl FeedItem for Entry {
    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn link(&self) -> &str {
        &self.link
    }

    fn published_at(&self) -> DateTime<FixedOffset> {
        self.published_at
    }

    fn field(&self, name: &str) -> Option<ItemValue<'_>> {
        self.extra.get(name).map(|v| ItemValue::text(v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_toml_entry() {
        let entry: Entry = toml::from_str(
            r#"
            title = "Hello"
            description = "World"
            link = "http://x.test/1"
            published_at = "2024-01-01T00:00:00Z"
            author = "jane"
            "#,
        )
        .unwrap();

        assert_eq!(entry.title, "Hello");
        assert_eq!(entry.published_at.to_rfc3339(), "2024-01-01T00:00:00+00:00");
        assert_eq!(entry.field("author"), Some(ItemValue::text("jane")));
        assert_eq!(entry.field("missing"), None);
    }

    #[test]
    fn test_deserialize_json_alias() {
        let entry: Entry = serde_json::from_str(
            r#"{"title":"T","link":"/t","pubDate":"2024-05-01T10:00:00+02:00"}"#,
        )
        .unwrap();

        assert_eq!(entry.description, "");
        assert_eq!(entry.published_at.offset().local_minus_utc(), 7200);
    }

    #[test]
    fn test_native_toml_datetime() {
        let entry: Entry = toml::from_str(
            r#"
            title = "Hello"
            link = "/1"
            published_at = 2024-01-01T10:30:00+02:00
            "#,
        )
        .unwrap();
        assert_eq!(entry.published_at.to_rfc3339(), "2024-01-01T10:30:00+02:00");

        let entry: Entry =
            toml::from_str("title = \"a\"\nlink = \"/a\"\ndate = 2024-01-01T00:00:00Z").unwrap();
        assert_eq!(entry.published_at.offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_local_datetime_rejected() {
        let err = toml::from_str::<Entry>(
            "title = \"a\"\nlink = \"/a\"\npublished_at = 2024-01-01T00:00:00",
        )
        .unwrap_err();
        assert!(err.to_string().contains("UTC offset"));
        assert!(toml::from_str::<Entry>("title = \"a\"\nlink = \"/a\"\ndate = \"soon\"").is_err());
    }

    #[test]
    fn test_scalar_extras_become_text() {
        let entry: Entry = toml::from_str(
            r#"
            title = "Hello"
            link = "/1"
            published_at = "2024-01-01T00:00:00Z"
            id = 3
            score = 4.5
            draft = false
            updated = 2024-02-01T00:00:00Z
            tags = ["a", "b"]
            "#,
        )
        .unwrap();

        assert_eq!(entry.field("id"), Some(ItemValue::text("3")));
        assert_eq!(entry.field("score"), Some(ItemValue::text("4.5")));
        assert_eq!(entry.field("draft"), Some(ItemValue::text("false")));
        assert_eq!(entry.field("updated"), Some(ItemValue::text("2024-02-01T00:00:00Z")));
        assert_eq!(entry.field("tags"), None);
    }

    #[test]
    fn test_json_extras() {
        let entry: Entry = serde_json::from_str(
            r#"{"title":"T","link":"/t","date":"2024-05-01T10:00:00Z","id":42,"meta":{"a":1},"n":null}"#,
        )
        .unwrap();
        assert_eq!(entry.field("id"), Some(ItemValue::text("42")));
        assert_eq!(entry.extra.len(), 1);
    }

    #[test]
    fn test_builder() {
        let date = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap();
        let entry = Entry::new("a", "b", "c", date).with("guid", "42");
        assert_eq!(entry.link(), "c");
        assert_eq!(entry.field("guid"), Some(ItemValue::text("42")));
    }
}
