//! `build`: render every feed that names an item source.
//!
//! Feeds are independent, so each one is rendered on its own rayon task with
//! its own formatter. Every feed must be valid before anything is written,
//! and the first rendering failure aborts the build.

use super::{BuildArgs, items::load_items, render::render_xml, write_output};
use anyhow::{Context, Result};
use feedforge::{
    config::{FeedSettings, FeedsConfig},
    feed::FeedRegistry,
    log,
};
use rayon::prelude::*;
use std::path::{Component, Path, PathBuf};

pub fn build_all(registry: &FeedRegistry, args: &BuildArgs) -> Result<Vec<PathBuf>> {
    let config = registry.config();
    config.validate()?;

    let targets: Vec<_> = config
        .feeds
        .iter()
        .filter(|(_, settings)| settings.items.is_some())
        .collect();

    if targets.is_empty() {
        log!("build"; "no feed has an `items` source, nothing to do");
        return Ok(Vec::new());
    }

    let base_url = args.base_url.trim_end_matches('/');
    let written = targets
        .par_iter()
        .map(|(name, settings)| build_feed(registry, &config, name, settings, base_url, args))
        .collect::<Result<Vec<_>>>()?;

    log!("build"; "{} feeds written to {}", written.len(), args.output.display());
    Ok(written)
}

fn build_feed(
    registry: &FeedRegistry,
    config: &FeedsConfig,
    name: &str,
    settings: &FeedSettings,
    base_url: &str,
    args: &BuildArgs,
) -> Result<PathBuf> {
    let definition = registry.get(name)?;
    let items = match &settings.items {
        Some(path) => load_items(&config.root_join(path))?,
        None => Vec::new(),
    };

    let file = output_file(name, settings);
    let url = format!("{base_url}/{}", url_path(&file));
    let xml = render_xml(&definition, &items, &url, args.compact)
        .with_context(|| format!("failed to render feed `{name}`"))?;

    let path = args.output.join(&file);
    write_output(&path, &xml)?;
    log!("build"; "{} ({} items)", file.display(), items.len());
    Ok(path)
}

/// Output file relative to the output directory, `<name>.xml` by default.
///
/// `FeedsConfig::validate` has already rejected paths that leave it.
fn output_file(name: &str, settings: &FeedSettings) -> PathBuf {
    settings
        .path
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{name}.xml")))
}

fn url_path(file: &Path) -> String {
    file.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
