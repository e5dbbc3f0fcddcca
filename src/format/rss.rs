//! RSS 2.0 formatting.
//!
//! The root declares the namespaces used by common RSS extensions so extra
//! fields can use `dc:`, `content:` and friends without further setup.

use super::{Accessor, DateFormat, FeedFormat, FieldMapping, Layout, TableFormatter};
use crate::{feed::FeedDefinition, xml::Element};
use chrono::{DateTime, FixedOffset};

/// Namespace prefixes declared on `<rss>`, in output order.
pub const RSS_NAMESPACES: [(&str, &str); 6] = [
    ("content", "http://purl.org/rss/1.0/modules/content/"),
    ("wfw", "http://wellformedweb.org/CommentAPI/"),
    ("dc", "http://purl.org/dc/elements/1.1/"),
    ("atom", "http://www.w3.org/2005/Atom"),
    ("sy", "http://purl.org/rss/1.0/modules/syndication/"),
    ("slash", "http://purl.org/rss/1.0/modules/slash/"),
];

/// Builds an RSS 2.0 document.
pub type RssFormatter<'a> = TableFormatter<'a, Rss>;

/// RSS 2.0: `<rss>` root, one `<channel>` holding the header and items.
#[derive(Debug, Clone, Copy)]
pub struct Rss;

impl Layout for Rss {
    const FORMAT: FeedFormat = FeedFormat::Rss;
    const ITEM_TAG: &'static str = "item";

    fn default_fields() -> Vec<FieldMapping> {
        vec![
            FieldMapping::new("title", Accessor::Title).cdata(),
            FieldMapping::new("description", Accessor::Description).cdata(),
            FieldMapping::new("link", Accessor::Link),
            FieldMapping::new("pubDate", Accessor::PublishedAt).date_format(DateFormat::Rss),
        ]
    }

    fn root(
        def: &FeedDefinition,
        current_url: &str,
        built_at: &DateTime<FixedOffset>,
    ) -> Element {
        let channel = Element::new("channel")
            .child(Element::new("title").text(&def.title))
            .child(Element::new("description").text(&def.description))
            .child(Element::new("link").text(&def.link))
            .child(
                Element::new("atom:link")
                    .attr("href", current_url)
                    .attr("rel", "self")
                    .attr("type", Self::FORMAT.content_type()),
            )
            .child(Element::new("language").text(&def.language))
            .child(Element::new("sy:updatePeriod").text(def.update_period.as_str()))
            .child(Element::new("sy:updateFrequency").text(def.update_frequency.to_string()))
            .child(Element::new("lastBuildDate").text(DateFormat::Rss.format(built_at)));

        RSS_NAMESPACES
            .iter()
            .fold(Element::new("rss"), |root, (prefix, uri)| {
                root.attr(format!("xmlns:{prefix}"), *uri)
            })
            .attr("version", "2.0")
            .child(channel)
    }

    fn container(root: &mut Element) -> Option<&mut Element> {
        root.last_element_mut()
    }
}
