//! Item source files.
//!
//! - TOML: `[[items]]` tables
//! - JSON: a top-level array, or an object with an `items` array
//!
//! Dates are RFC 3339 strings (`published_at = "2024-01-01T00:00:00Z"`) or,
//! in TOML, datetime literals with an offset.

use anyhow::{Context, Result, bail};
use feedforge::{debug, feed::Entry};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::{ffi::OsStr, fs, path::Path};

#[derive(Debug, Deserialize)]
struct ItemFile {
    #[serde(default)]
    items: Vec<Entry>,
}

/// Load every item from `path`, keeping file order.
pub fn load_items(path: &Path) -> Result<Vec<Entry>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read items from {}", path.display()))?;

    let items = match path.extension().and_then(OsStr::to_str) {
        Some("json") => parse_json(&content),
        _ => toml::from_str::<ItemFile>(&content)
            .map(|file| file.items)
            .map_err(Into::into),
    }
    .with_context(|| format!("invalid item file {}", path.display()))?;

    debug!("items"; "{}: {} items", path.display(), items.len());
    Ok(items)
}

fn parse_json(content: &str) -> Result<Vec<Entry>> {
    let value: JsonValue = serde_json::from_str(content)?;
    Ok(match value {
        JsonValue::Array(_) => serde_json::from_value(value)?,
        JsonValue::Object(_) => serde_json::from_value::<ItemFile>(value)?.items,
        _ => bail!("expected an array of items or an object with `items`"),
    })
}
