//! Feed formatters (RSS 2.0, Atom 1.0).
//!
//! Every formatter is a [`TableFormatter`]: it owns a list of
//! [`FieldMapping`]s and turns each item into one element by applying the
//! table in order through [`build_item`]. A new output format only supplies a
//! [`Layout`]: its default table, its root with header and namespaces, and
//! where items go.
//!
//! ```ignore
//! let feed = Feed::with_items(&definition, &posts);
//! let mut formatter = RssFormatter::new(&feed)?;
//! formatter.initialize("https://example.com/feed.rss")?;
//! let xml = formatter.render()?;
//! ```

pub mod atom;
mod field;
pub mod rss;

pub use atom::{Atom, AtomFormatter};
pub use field::{Accessor, DateFormat, FieldMapping, FieldOptions, RSS_DATE};
pub use rss::{Rss, RssFormatter};

use crate::{
    config::ConfigDiagnostics,
    debug,
    feed::{Feed, FeedDefinition, FeedItem, ItemValue},
    xml::{Document, Element, XmlError},
};
use chrono::{DateTime, FixedOffset, Utc};
use serde::Deserialize;
use std::{fmt, marker::PhantomData};
use thiserror::Error;
use url::Url;

// ============================================================================
// FeedFormat
// ============================================================================

/// Feed output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedFormat {
    /// RSS 2.0 format (default).
    #[default]
    Rss,
    /// Atom 1.0 format.
    Atom,
}

impl FeedFormat {
    /// Formatter for this format over `feed`.
    pub fn formatter<'a>(self, feed: &'a Feed<'a>) -> Result<Box<dyn Formatter + 'a>, FormatError> {
        Ok(match self {
            Self::Rss => Box::new(RssFormatter::new(feed)?),
            Self::Atom => Box::new(AtomFormatter::new(feed)?),
        })
    }

    /// MIME type used for the self link.
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Rss => "application/rss+xml",
            Self::Atom => "application/atom+xml",
        }
    }
}

impl fmt::Display for FeedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Rss => "rss",
            Self::Atom => "atom",
        })
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Formatting errors. Any of them aborts the whole pass.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("invalid feed definition")]
    Configuration(#[source] ConfigDiagnostics),

    #[error("item does not provide `{accessor}` required by <{element}>")]
    Resolution { element: String, accessor: String },

    #[error("value `{value}` for <{element}> is not a date")]
    NotADate { element: String, value: String },

    #[error("formatter is not initialized")]
    NotInitialized,

    #[error(transparent)]
    Xml(#[from] XmlError),
}

// ============================================================================
// Formatter
// ============================================================================

/// A feed output format.
///
/// `initialize` builds the document (root, container, header) and adds every
/// item of the feed; `add_item` can be called afterwards to stream further
/// items into the same document.
pub trait Formatter {
    /// Item field table, applied to each item in order.
    fn fields(&self) -> &[FieldMapping];

    /// Fix the build time written to the header instead of "now".
    fn set_build_time(&mut self, at: DateTime<FixedOffset>);

    /// Start a fresh document for `current_url` and add all feed items.
    fn initialize(&mut self, current_url: &str) -> Result<(), FormatError>;

    /// Append one item element built from the field table.
    fn add_item(&mut self, item: &dyn FeedItem) -> Result<(), FormatError>;

    /// The document built so far, `None` before `initialize`.
    fn document(&self) -> Option<&Document>;

    /// Serialize the document (indented).
    fn render(&self) -> Result<String, FormatError> {
        let doc = self.document().ok_or(FormatError::NotInitialized)?;
        Ok(doc.to_xml()?)
    }

    /// Serialize the document without indentation.
    fn render_compact(&self) -> Result<String, FormatError> {
        let doc = self.document().ok_or(FormatError::NotInitialized)?;
        Ok(doc.to_xml_compact()?)
    }
}

// ============================================================================
// TableFormatter
// ============================================================================

/// The parts of a feed format that differ between formats.
pub trait Layout {
    const FORMAT: FeedFormat;

    /// Element name of one item (`item`, `entry`).
    const ITEM_TAG: &'static str;

    /// Item table every feed of this format starts from.
    fn default_fields() -> Vec<FieldMapping>;

    /// Root element with namespaces and the feed header, without items.
    fn root(
        definition: &FeedDefinition,
        current_url: &str,
        built_at: &DateTime<FixedOffset>,
    ) -> Element;

    /// Element items are appended to.
    fn container(root: &mut Element) -> Option<&mut Element>;
}

/// Table-driven formatter for any [`Layout`].
pub struct TableFormatter<'a, L> {
    feed: &'a Feed<'a>,
    fields: Vec<FieldMapping>,
    context: FormatContext,
    built_at: Option<DateTime<FixedOffset>>,
    document: Option<Document>,
    layout: PhantomData<L>,
}

impl<'a, L: Layout> TableFormatter<'a, L> {
    /// Formatter over a validated feed definition.
    ///
    /// The table is the layout's defaults followed by the definition's extra
    /// fields.
    pub fn new(feed: &'a Feed<'a>) -> Result<Self, FormatError> {
        let definition = feed.definition();
        definition.validate().map_err(FormatError::Configuration)?;

        let mut fields = L::default_fields();
        fields.extend(definition.fields.iter().cloned());

        Ok(Self {
            feed,
            fields,
            context: FormatContext::new(&definition.link),
            built_at: None,
            document: None,
            layout: PhantomData,
        })
    }

    pub fn with_build_time(mut self, at: DateTime<FixedOffset>) -> Self {
        self.set_build_time(at);
        self
    }
}

impl<L: Layout> Formatter for TableFormatter<'_, L> {
    fn fields(&self) -> &[FieldMapping] {
        &self.fields
    }

    fn set_build_time(&mut self, at: DateTime<FixedOffset>) {
        self.built_at = Some(at);
    }

    fn initialize(&mut self, current_url: &str) -> Result<(), FormatError> {
        let feed = self.feed;
        let definition = feed.definition();
        let built_at = self.built_at.unwrap_or_else(|| Utc::now().fixed_offset());

        let root = L::root(definition, current_url, &built_at);
        self.document = Some(Document::new(&definition.encoding, root));

        for item in feed.items() {
            if let Err(err) = self.add_item(*item) {
                self.document = None;
                return Err(err);
            }
        }

        debug!("render"; "{} `{}`: {} items", L::FORMAT, definition.name, feed.len());
        Ok(())
    }

    fn add_item(&mut self, item: &dyn FeedItem) -> Result<(), FormatError> {
        let node = build_item(L::ITEM_TAG, &self.fields, item, &self.context)?;
        self.document
            .as_mut()
            .and_then(|doc| L::container(doc.root_mut()))
            .ok_or(FormatError::NotInitialized)?
            .push(node);
        Ok(())
    }

    fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }
}

/// Render `feed` in its configured format.
pub fn render_feed(feed: &Feed<'_>, current_url: &str) -> Result<String, FormatError> {
    let mut formatter = feed.definition().format.formatter(feed)?;
    formatter.initialize(current_url)?;
    formatter.render()
}

// ============================================================================
// Table-driven item formatting
// ============================================================================

/// Per-feed state needed while formatting fields.
#[derive(Debug, Clone, Default)]
pub struct FormatContext {
    base: Option<Url>,
}

impl FormatContext {
    pub fn new(feed_link: &str) -> Self {
        Self {
            base: Url::parse(feed_link).ok(),
        }
    }

    /// Resolve a relative URL against the feed link.
    pub fn absolutize(&self, value: String) -> String {
        if Url::parse(&value).is_ok() {
            return value;
        }
        match self.base.as_ref().map(|base| base.join(&value)) {
            Some(Ok(url)) => url.into(),
            _ => value,
        }
    }
}

/// Build one item element by applying `fields` in order.
///
/// The element is complete or not built at all.
pub fn build_item(
    tag: &str,
    fields: &[FieldMapping],
    item: &dyn FeedItem,
    ctx: &FormatContext,
) -> Result<Element, FormatError> {
    fields.iter().try_fold(Element::new(tag), |node, field| {
        Ok(node.child(format_field(field, item, ctx)?))
    })
}

/// Resolve one field of one item into an element.
pub fn format_field(
    field: &FieldMapping,
    item: &dyn FeedItem,
    ctx: &FormatContext,
) -> Result<Element, FormatError> {
    let value = field
        .accessor
        .resolve(item)
        .ok_or_else(|| FormatError::Resolution {
            element: field.element.clone(),
            accessor: field.accessor.to_string(),
        })?;

    let options = &field.options;
    let text = match (&options.date_format, value) {
        (Some(format), ItemValue::Date(date)) => format.format(&date),
        (Some(format), ItemValue::Text(text)) => {
            let date = parse_date(&text).ok_or_else(|| FormatError::NotADate {
                element: field.element.clone(),
                value: text.to_string(),
            })?;
            format.format(&date)
        }
        (None, ItemValue::Date(date)) => date.to_rfc3339(),
        (None, ItemValue::Text(text)) => text.into_owned(),
    };
    let text = if options.absolute {
        ctx.absolutize(text)
    } else {
        text
    };

    let element = Element::new(field.element.as_str());
    Ok(match &options.attribute {
        Some(attribute) => element.attr(attribute.as_str(), text),
        None if options.cdata => element.cdata(text),
        None => element.text(text),
    })
}

/// Parse RFC 3339, then RFC 2822.
fn parse_date(text: &str) -> Option<DateTime<FixedOffset>> {
    let text = text.trim();
    DateTime::parse_from_rfc3339(text)
        .or_else(|_| DateTime::parse_from_rfc2822(text))
        .ok()
}
