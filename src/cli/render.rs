//! `render`: one feed to stdout or a file.

use super::{RenderArgs, items::load_items, write_output};
use anyhow::Result;
use feedforge::{
    feed::{Entry, Feed, FeedDefinition, FeedRegistry},
    format::FormatError,
    log,
};
use std::io::{Write, stdout};

pub fn render_one(registry: &FeedRegistry, args: &RenderArgs) -> Result<()> {
    let definition = registry.get(&args.name)?;
    let config = registry.config();

    let items_path = match (&args.items, config.get(&args.name).and_then(|s| s.items.as_ref())) {
        (Some(path), _) => Some(path.clone()),
        (None, Some(path)) => Some(config.root_join(path)),
        (None, None) => None,
    };
    let items = match items_path {
        Some(path) => load_items(&path)?,
        None => Vec::new(),
    };

    let xml = render_xml(&definition, &items, &args.url, args.compact)?;
    match &args.output {
        Some(path) => {
            write_output(path, &xml)?;
            log!("render"; "{} ({} items)", path.display(), items.len());
        }
        None => {
            let mut out = stdout().lock();
            writeln!(out, "{xml}")?;
        }
    }
    Ok(())
}

/// Render `items` with the formatter of the definition's format.
pub fn render_xml(
    definition: &FeedDefinition,
    items: &[Entry],
    current_url: &str,
    compact: bool,
) -> Result<String, FormatError> {
    let feed = Feed::with_items(definition, items);
    let mut formatter = definition.format.formatter(&feed)?;
    formatter.initialize(current_url)?;
    if compact {
        formatter.render_compact()
    } else {
        formatter.render()
    }
}
