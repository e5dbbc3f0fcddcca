//! Feed definitions and their items.
//!
//! - [`FeedDefinition`]: validated feed-level metadata, immutable once built
//! - [`Feed`]: a definition paired with the items of one formatting pass
//! - [`FeedItem`]: the capability interface items implement
//! - [`FeedRegistry`]: name → definition resolution, memoized

mod entry;
mod item;
pub mod registry;

pub use entry::{Entry, EntryError};
pub use item::{FeedItem, ItemValue};
pub use registry::{FeedRegistry, RegistryError};

use crate::{
    config::{ConfigDiagnostics, FeedSettings, FieldPath, UpdatePeriod},
    format::{FeedFormat, FieldMapping},
};
use regex::Regex;
use std::sync::LazyLock;

// ============================================================================
// FeedDefinition
// ============================================================================

/// Feed-level metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedDefinition {
    /// Name the feed is configured under.
    pub name: String,
    pub title: String,
    pub description: String,
    pub link: String,
    /// Encoding written to the XML declaration.
    pub encoding: String,
    pub language: String,
    pub update_period: UpdatePeriod,
    pub update_frequency: u32,
    pub format: FeedFormat,
    pub author: Option<String>,
    /// Extra item fields appended to the format's default table.
    pub fields: Vec<FieldMapping>,
}

impl FeedDefinition {
    /// A UTF-8 RSS definition with default hints.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        let defaults = FeedSettings::default();
        Self {
            name: String::new(),
            title: title.into(),
            description: description.into(),
            link: link.into(),
            encoding: "UTF-8".to_string(),
            language: defaults.language,
            update_period: defaults.update_period,
            update_frequency: defaults.update_frequency,
            format: defaults.format,
            author: None,
            fields: Vec::new(),
        }
    }

    /// Build a validated definition from config settings.
    pub fn from_settings(name: &str, settings: &FeedSettings) -> Result<Self, ConfigDiagnostics> {
        let definition = Self {
            name: name.to_string(),
            title: settings.title.clone(),
            description: settings.description.clone(),
            link: settings.link.clone(),
            encoding: settings.encoding.clone(),
            language: settings.language.clone(),
            update_period: settings.update_period,
            update_frequency: settings.update_frequency,
            format: settings.format,
            author: settings.author.clone(),
            fields: settings.fields.clone(),
        };
        definition.validate()?;
        Ok(definition)
    }

    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    pub fn with_format(mut self, format: FeedFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_field(mut self, field: FieldMapping) -> Self {
        self.fields.push(field);
        self
    }

    /// Check that the definition can be rendered.
    pub fn validate(&self) -> Result<(), ConfigDiagnostics> {
        /// XML `EncName` production.
        static RE_ENCODING: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9._-]*$").unwrap());

        let name = if self.name.is_empty() { "_" } else { &self.name };
        let mut diag = ConfigDiagnostics::new();

        for (key, value) in [
            ("title", &self.title),
            ("description", &self.description),
            ("link", &self.link),
            ("encoding", &self.encoding),
        ] {
            if value.trim().is_empty() {
                diag.error(FieldPath::feed(name, key), format!("`{key}` is required"));
            }
        }

        if !self.encoding.is_empty() && !RE_ENCODING.is_match(&self.encoding) {
            diag.error_with_hint(
                FieldPath::feed(name, "encoding"),
                format!("`{}` is not a valid XML encoding name", self.encoding),
                "use a name such as UTF-8 or ISO-8859-1",
            );
        }

        if self.update_frequency == 0 {
            diag.error(
                FieldPath::feed(name, "update_frequency"),
                "must be at least 1",
            );
        }

        for (i, field) in self.fields.iter().enumerate() {
            if field.element.trim().is_empty() {
                diag.error(
                    FieldPath::feed(name, &format!("fields[{i}].element")),
                    "element name must not be empty",
                );
            }
        }

        diag.into_result()
    }
}

// ============================================================================
// Feed
// ============================================================================

/// A definition and the ordered items of one formatting pass.
///
/// Items are borrowed; the feed never outlives the caller's collection.
pub struct Feed<'a> {
    definition: &'a FeedDefinition,
    items: Vec<&'a dyn FeedItem>,
}

impl<'a> Feed<'a> {
    pub fn new(definition: &'a FeedDefinition) -> Self {
        Self {
            definition,
            items: Vec::new(),
        }
    }

    /// Feed over a homogeneous slice of items.
    pub fn with_items<T: FeedItem>(definition: &'a FeedDefinition, items: &'a [T]) -> Self {
        let mut feed = Self::new(definition);
        feed.extend(items);
        feed
    }

    /// Append one item (items of different types may be mixed).
    pub fn push(&mut self, item: &'a dyn FeedItem) {
        self.items.push(item);
    }

    pub fn extend<T: FeedItem>(&mut self, items: &'a [T]) {
        self.items
            .extend(items.iter().map(|item| item as &'a dyn FeedItem));
    }

    pub fn definition(&self) -> &'a FeedDefinition {
        self.definition
    }

    pub fn items(&self) -> &[&'a dyn FeedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Accessor;
    use chrono::DateTime;

    fn blog() -> FeedDefinition {
        FeedDefinition::new("Blog", "My blog", "http://x.test")
    }

    #[test]
    fn test_new_is_valid() {
        let def = blog();
        assert_eq!(def.encoding, "UTF-8");
        assert_eq!(def.language, "en-US");
        assert!(def.validate().is_ok());
    }

    #[test]
    fn test_missing_required_fields() {
        let def = FeedDefinition::new("", " ", "").with_encoding("");
        let diag = def.validate().unwrap_err();
        assert_eq!(diag.len(), 4);
        assert!(diag.mentions("feeds._.title"));
        assert!(diag.mentions("feeds._.encoding"));
    }

    #[test]
    fn test_invalid_encoding() {
        for bad in ["utf 8", "8bit", "UTF-8\""] {
            let diag = blog().with_encoding(bad).validate().unwrap_err();
            assert!(diag.mentions("feeds._.encoding"), "{bad} should be rejected");
        }
        for good in ["UTF-8", "ISO-8859-1", "windows-1252", "Shift_JIS"] {
            assert!(blog().with_encoding(good).validate().is_ok(), "{good}");
        }
    }

    #[test]
    fn test_zero_frequency() {
        let mut def = blog();
        def.update_frequency = 0;
        assert!(def.validate().unwrap_err().mentions("feeds._.update_frequency"));
    }

    #[test]
    fn test_empty_extra_element() {
        let def = blog().with_field(FieldMapping::new("", Accessor::Title));
        assert!(def.validate().unwrap_err().mentions("feeds._.fields[0].element"));
    }

    #[test]
    fn test_from_settings_uses_name() {
        let settings = FeedSettings {
            title: "T".into(),
            description: "D".into(),
            link: "http://x.test".into(),
            ..FeedSettings::default()
        };
        let diag = FeedDefinition::from_settings("news", &settings).unwrap_err();
        assert!(diag.mentions("feeds.news.encoding"));

        let settings = FeedSettings {
            encoding: "UTF-8".into(),
            ..settings
        };
        let def = FeedDefinition::from_settings("news", &settings).unwrap();
        assert_eq!(def.name, "news");
        assert_eq!(def.title, "T");
    }

    #[test]
    fn test_feed_keeps_item_order() {
        let date = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap();
        let entries = vec![
            Entry::new("first", "", "/1", date),
            Entry::new("second", "", "/2", date),
        ];
        let extra = Entry::new("third", "", "/3", date);

        let def = blog();
        let mut feed = Feed::with_items(&def, &entries);
        feed.push(&extra);

        let titles: Vec<_> = feed.items().iter().map(|i| i.title()).collect();
        assert_eq!(titles, ["first", "second", "third"]);
        assert_eq!(feed.len(), 3);
        assert_eq!(feed.definition().title, "Blog");
    }
}
