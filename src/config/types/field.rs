//! Config field path.

use owo_colors::OwoColorize;
use std::fmt;

/// Dotted path of a config field, used to point diagnostics at a key.
///
/// ```ignore
/// let path = FieldPath::feed("blog", "title");
/// assert_eq!(path.as_str(), "feeds.blog.title");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath(String);

impl FieldPath {
    /// Path of a key inside `[feeds.<name>]`.
    #[inline]
    pub fn feed(name: &str, key: &str) -> Self {
        Self(format!("feeds.{name}.{key}"))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_args!("`{}`", self.0).bright_blue())
    }
}
