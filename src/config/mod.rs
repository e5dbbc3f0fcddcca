//! Feed configuration (`feeds.toml`).
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section.rs     # [feeds.<name>] settings
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   └── field      # FieldPath
//! └── mod.rs         # FeedsConfig (this file)
//! ```
//!
//! # Example
//!
//! ```toml
//! [feeds.blog]
//! title = "Blog"
//! description = "My blog"
//! link = "http://x.test"
//! encoding = "UTF-8"
//! ```

mod section;
pub mod types;

pub use section::{FeedSettings, UpdatePeriod};
pub use types::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, FieldPath};

use crate::{feed::FeedDefinition, log};
use serde::Deserialize;
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration: every feed known to the application, by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FeedsConfig {
    /// Directory of the config file, relative paths resolve against it
    /// (internal use only).
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub feeds: BTreeMap<String, FeedSettings>,
}

impl FeedsConfig {
    /// Parse configuration from TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a file, warning about unknown fields.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (mut config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        config.root = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    pub fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            log!("warning"; "- {}", field);
        }
    }

    /// Validate every feed, collecting all problems at once.
    ///
    /// Covers the definition itself and the CLI output `path`.
    pub fn validate(&self) -> Result<(), ConfigDiagnostics> {
        let mut diagnostics = ConfigDiagnostics::new();
        for (name, settings) in &self.feeds {
            if let Err(errors) = FeedDefinition::from_settings(name, settings) {
                diagnostics.extend(errors);
            }
            settings.check_output_path(name, &mut diagnostics);
        }
        diagnostics.into_result()
    }

    pub fn get(&self, name: &str) -> Option<&FeedSettings> {
        self.feeds.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.feeds.contains_key(name)
    }

    /// Feed names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.feeds.keys().map(String::as_str)
    }

    /// Join a path with the config directory.
    pub fn root_join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const BLOG: &str = r#"
[feeds.blog]
title = "Blog"
description = "My blog"
link = "http://x.test"
encoding = "UTF-8"
"#;

    #[test]
    fn test_from_str_empty() {
        let config = FeedsConfig::from_str("").unwrap();
        assert!(config.feeds.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_error() {
        let err = FeedsConfig::from_str("[feeds.blog\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_names_sorted() {
        let config = FeedsConfig::from_str("[feeds.z]\n[feeds.a]\n[feeds.m]\n").unwrap();
        assert_eq!(config.names().collect::<Vec<_>>(), ["a", "m", "z"]);
        assert!(config.contains("m"));
        assert!(config.get("q").is_none());
    }

    #[test]
    fn test_parse_with_ignored() {
        let content = format!("{BLOG}colour = \"red\"\n");
        let (config, ignored) = FeedsConfig::parse_with_ignored(&content).unwrap();
        assert!(config.contains("blog"));
        assert_eq!(ignored, ["feeds.blog.colour"]);
    }

    #[test]
    fn test_validate_reports_every_feed() {
        let config = FeedsConfig::from_str(
            r#"
            [feeds.one]
            title = "One"
            [feeds.two]
            description = "Two"
            "#,
        )
        .unwrap();

        let diag = config.validate().unwrap_err();
        assert!(diag.mentions("feeds.one.description"));
        assert!(diag.mentions("feeds.two.title"));
        assert!(diag.mentions("feeds.two.encoding"));
    }

    #[test]
    fn test_validate_rejects_escaping_path() {
        let config = FeedsConfig::from_str(&format!("{BLOG}path = \"../../etc/blog.xml\"\n")).unwrap();
        let diag = config.validate().unwrap_err();
        assert!(diag.mentions("feeds.blog.path"));
        assert_eq!(diag.len(), 1);
    }

    #[test]
    fn test_load_sets_root() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("feeds.toml");
        fs::write(&path, BLOG).unwrap();

        let config = FeedsConfig::load(&path).unwrap();
        assert_eq!(config.root, dir.path());
        assert_eq!(config.root_join("posts.toml"), dir.path().join("posts.toml"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = FeedsConfig::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(..)));
    }
}
