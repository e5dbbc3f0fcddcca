//! Atom 1.0 formatting.
//!
//! Entries are children of the `<feed>` root itself; there is no channel.

use super::{Accessor, DateFormat, FeedFormat, FieldMapping, Layout, TableFormatter};
use crate::{feed::FeedDefinition, xml::Element};
use chrono::{DateTime, FixedOffset};

pub const ATOM_NAMESPACE: &str = "http://www.w3.org/2005/Atom";

const GENERATOR: &str = env!("CARGO_PKG_NAME");

/// Builds an Atom 1.0 document.
pub type AtomFormatter<'a> = TableFormatter<'a, Atom>;

/// Atom 1.0: `<feed>` root holding the header and the entries.
#[derive(Debug, Clone, Copy)]
pub struct Atom;

impl Layout for Atom {
    const FORMAT: FeedFormat = FeedFormat::Atom;
    const ITEM_TAG: &'static str = "entry";

    fn default_fields() -> Vec<FieldMapping> {
        vec![
            FieldMapping::new("title", Accessor::Title).cdata(),
            FieldMapping::new("id", Accessor::Link).absolute(),
            FieldMapping::new("link", Accessor::Link)
                .attribute("href")
                .absolute(),
            FieldMapping::new("updated", Accessor::PublishedAt).date_format(DateFormat::Rfc3339),
            FieldMapping::new("summary", Accessor::Description).cdata(),
        ]
    }

    fn root(
        def: &FeedDefinition,
        current_url: &str,
        built_at: &DateTime<FixedOffset>,
    ) -> Element {
        let mut root = Element::new("feed")
            .attr("xmlns", ATOM_NAMESPACE)
            .attr("xml:lang", def.language.as_str())
            .child(Element::new("title").text(&def.title))
            .child(Element::new("subtitle").text(&def.description))
            .child(Element::new("id").text(&def.link))
            .child(
                Element::new("link")
                    .attr("rel", "alternate")
                    .attr("href", def.link.as_str()),
            )
            .child(
                Element::new("link")
                    .attr("rel", "self")
                    .attr("type", Self::FORMAT.content_type())
                    .attr("href", current_url),
            )
            .child(Element::new("updated").text(DateFormat::Rfc3339.format(built_at)));

        if let Some(author) = &def.author {
            root.push(Element::new("author").child(Element::new("name").text(author)));
        }
        root.child(
            Element::new("generator")
                .attr("version", env!("CARGO_PKG_VERSION"))
                .text(GENERATOR),
        )
    }

    fn container(root: &mut Element) -> Option<&mut Element> {
        Some(root)
    }
}
