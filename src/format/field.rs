//! Declarative field tables.
//!
//! A [`FieldMapping`] says how one child element of an item is derived from
//! the item: which capability to read and how to render the value. Formatters
//! own a fixed table of mappings and apply it to every item in order.

use crate::feed::{FeedItem, ItemValue};
use chrono::{DateTime, FixedOffset, format::Item, format::StrftimeItems};
use serde::Deserialize;
use std::fmt::{self, Write};

/// RFC-822 date layout required by RSS 2.0 (`Mon, 01 Jan 2024 00:00:00 +0000`).
pub const RSS_DATE: &str = "%a, %d %b %Y %H:%M:%S %z";

// ============================================================================
// FieldMapping
// ============================================================================

/// One element of an item, derived from one item capability.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldMapping {
    /// Target element name, may carry a namespace prefix (`dc:creator`).
    pub element: String,
    pub accessor: Accessor,
    #[serde(flatten)]
    pub options: FieldOptions,
}

impl FieldMapping {
    pub fn new(element: impl Into<String>, accessor: Accessor) -> Self {
        Self {
            element: element.into(),
            accessor,
            options: FieldOptions::default(),
        }
    }

    /// Wrap the value in CDATA.
    pub fn cdata(mut self) -> Self {
        self.options.cdata = true;
        self
    }

    /// Render the value as a date.
    pub fn date_format(mut self, format: DateFormat) -> Self {
        self.options.date_format = Some(format);
        self
    }

    /// Write the value into an attribute of an empty element.
    pub fn attribute(mut self, name: impl Into<String>) -> Self {
        self.options.attribute = Some(name.into());
        self
    }

    /// Resolve relative URLs against the feed link.
    pub fn absolute(mut self) -> Self {
        self.options.absolute = true;
        self
    }
}

/// Formatting directives of a [`FieldMapping`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FieldOptions {
    pub cdata: bool,
    pub date_format: Option<DateFormat>,
    pub attribute: Option<String>,
    pub absolute: bool,
}

// ============================================================================
// Accessor
// ============================================================================

/// The item capability a field reads.
///
/// The four fixed capabilities are part of [`FeedItem`] and always resolve.
/// `Field` looks a name up at runtime through [`FeedItem::field`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Accessor {
    Title,
    Description,
    Link,
    PublishedAt,
    Field(String),
}

impl Accessor {
    /// Read the value from an item, `None` if the item lacks the field.
    pub fn resolve<'i>(&self, item: &'i dyn FeedItem) -> Option<ItemValue<'i>> {
        match self {
            Self::Title => Some(ItemValue::text(item.title())),
            Self::Description => Some(ItemValue::text(item.description())),
            Self::Link => Some(ItemValue::text(item.link())),
            Self::PublishedAt => Some(ItemValue::Date(item.published_at())),
            Self::Field(name) => item.field(name),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Link => "link",
            Self::PublishedAt => "published_at",
            Self::Field(name) => name,
        }
    }
}

impl From<&str> for Accessor {
    fn from(name: &str) -> Self {
        match name {
            "title" => Self::Title,
            "description" => Self::Description,
            "link" => Self::Link,
            "published_at" | "pub_date" | "pubDate" | "date" => Self::PublishedAt,
            other => Self::Field(other.to_string()),
        }
    }
}

impl From<String> for Accessor {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

impl fmt::Display for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// DateFormat
// ============================================================================

/// How a date value is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum DateFormat {
    /// RFC-822 as used by RSS 2.0.
    Rss,
    /// RFC 3339, as used by Atom.
    Rfc3339,
    /// A validated `strftime` pattern.
    Pattern(String),
}

impl DateFormat {
    /// Build a custom pattern, rejecting unknown specifiers.
    pub fn pattern(pattern: impl Into<String>) -> Result<Self, String> {
        let pattern = pattern.into();
        if StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
            return Err(format!("invalid date pattern `{pattern}`"));
        }
        Ok(Self::Pattern(pattern))
    }

    pub fn format(&self, date: &DateTime<FixedOffset>) -> String {
        match self {
            Self::Rss => date.format(RSS_DATE).to_string(),
            Self::Rfc3339 => date.to_rfc3339(),
            Self::Pattern(pattern) => {
                let mut out = String::new();
                // Patterns are checked on construction; a failure here leaves
                // whatever was written so far.
                let _ = write!(out, "{}", date.format(pattern));
                out
            }
        }
    }
}

impl TryFrom<String> for DateFormat {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "rss" | "rfc822" | "rfc2822" => Ok(Self::Rss),
            "rfc3339" | "atom" | "iso8601" => Ok(Self::Rfc3339),
            _ => Self::pattern(value),
        }
    }
}
