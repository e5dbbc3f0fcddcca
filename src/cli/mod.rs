//! Command-line interface module.

mod args;
pub mod build;
pub mod items;
pub mod render;

pub use args::{BuildArgs, Cli, Commands, RenderArgs};

use anyhow::{Context, Result};
use feedforge::feed::FeedRegistry;
use owo_colors::OwoColorize;
use std::{
    fs,
    io::{Write, stdout},
    path::Path,
};

/// Print every configured feed with its format, marking invalid ones.
pub fn list_feeds(registry: &FeedRegistry) -> Result<()> {
    let mut out = stdout().lock();
    for name in registry.names() {
        match registry.get(&name) {
            Ok(def) => writeln!(out, "{} [{}] {}", name.bold(), def.format, def.title)?,
            Err(err) => writeln!(out, "{} {}", name.bold(), err.red())?,
        }
    }
    Ok(())
}

/// Write `content` to `path`, creating parent directories.
pub fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_output_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a/b/feed.xml");
        write_output(&path, "<rss/>").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "<rss/>");
    }
}
