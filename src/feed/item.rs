//! The capability interface every feed entry implements.
//!
//! Formatters only see items through [`FeedItem`], so any type (a blog post,
//! a database row, a scraped article) can be rendered once it can answer the
//! four fixed questions. Data that is only known at runtime can be exposed
//! through [`FeedItem::field`] and read with `Accessor::Field`.

use chrono::{DateTime, FixedOffset};
use std::borrow::Cow;

/// A single syndicated entry.
///
/// ```ignore
/// struct Post { title: String, body: String, url: String, date: DateTime<FixedOffset> }
///
/// impl FeedItem for Post {
///     fn title(&self) -> &str { &self.title }
///     fn description(&self) -> &str { &self.body }
///     fn link(&self) -> &str { &self.url }
///     fn published_at(&self) -> DateTime<FixedOffset> { self.date }
/// }
/// ```
pub trait FeedItem {
    fn title(&self) -> &str;

    fn description(&self) -> &str;

    /// Absolute or feed-relative URL of the entry.
    fn link(&self) -> &str;

    /// Publication time with an explicit offset.
    fn published_at(&self) -> DateTime<FixedOffset>;

    /// Additional named value, `None` when the item has no such field.
    fn field(&self, _name: &str) -> Option<ItemValue<'_>> {
        None
    }
}

/// A value read from an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValue<'a> {
    Text(Cow<'a, str>),
    Date(DateTime<FixedOffset>),
}

impl<'a> ItemValue<'a> {
    pub fn text(value: impl Into<Cow<'a, str>>) -> Self {
        Self::Text(value.into())
    }
}

impl<T: FeedItem + ?Sized> FeedItem for &T {
    fn title(&self) -> &str {
        (**self).title()
    }

    fn description(&self) -> &str {
        (**self).description()
    }

    fn link(&self) -> &str {
        (**self).link()
    }

    fn published_at(&self) -> DateTime<FixedOffset> {
        (**self).published_at()
    }

    fn field(&self, name: &str) -> Option<ItemValue<'_>> {
        (**self).field(name)
    }
}
