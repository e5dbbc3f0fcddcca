//! Table-driven RSS 2.0 and Atom 1.0 feed formatting.
//!
//! - [`feed`]: feed definitions, the [`FeedItem`](feed::FeedItem) capability
//!   interface and the memoizing [`FeedRegistry`](feed::FeedRegistry)
//! - [`format`]: formatters that map items to XML through field tables
//! - [`xml`]: the owned XML tree and its writer
//! - [`config`]: `feeds.toml` parsing and diagnostics
//!
//! ```ignore
//! let registry = FeedRegistry::from_path(Path::new("feeds.toml"))?;
//! let definition = registry.get("blog")?;
//! let feed = Feed::with_items(&definition, &posts);
//! let xml = render_feed(&feed, "https://example.com/blog.xml")?;
//! ```

pub mod logger;

pub mod config;
pub mod feed;
pub mod format;
pub mod xml;
