//! `[feeds.<name>]` section.

use super::types::{ConfigDiagnostics, FieldPath};
use crate::format::{FeedFormat, FieldMapping};
use serde::Deserialize;
use std::{
    fmt,
    path::{Component, PathBuf},
};

/// Syndication module update period (`sy:updatePeriod`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdatePeriod {
    #[default]
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl UpdatePeriod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl fmt::Display for UpdatePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw settings of one feed, as written in the config file.
///
/// Required keys (`title`, `description`, `link`, `encoding`) default to
/// empty so that missing ones are reported together by validation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FeedSettings {
    pub title: String,
    pub description: String,
    pub link: String,
    pub encoding: String,
    /// Channel language.
    pub language: String,
    pub update_period: UpdatePeriod,
    pub update_frequency: u32,
    /// Output format: rss | atom.
    pub format: FeedFormat,
    /// Feed author (used by Atom).
    pub author: Option<String>,
    /// Extra fields appended to the format's default item table.
    pub fields: Vec<FieldMapping>,
    /// Item source file for the CLI (toml or json), relative to the config
    /// file's directory.
    pub items: Option<PathBuf>,
    /// Output file for the CLI `build` command, relative to its output
    /// directory.
    pub path: Option<PathBuf>,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            link: String::new(),
            encoding: String::new(),
            language: "en-US".to_string(),
            update_period: UpdatePeriod::Hourly,
            update_frequency: 1,
            format: FeedFormat::Rss,
            author: None,
            fields: Vec::new(),
            items: None,
            path: None,
        }
    }
}

impl FeedSettings {
    /// Report an output `path` that would land outside the output directory.
    pub fn check_output_path(&self, name: &str, diag: &mut ConfigDiagnostics) {
        let Some(path) = &self.path else {
            return;
        };
        let inside = path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !inside || path.file_name().is_none() {
            diag.error_with_hint(
                FieldPath::feed(name, "path"),
                format!("`{}` is not a file inside the output directory", path.display()),
                "use a relative path such as `blog.xml` or `feeds/blog.xml`",
            );
        }
    }
}
