//! Named feed resolution with a process-wide cache.
//!
//! The registry holds a configuration snapshot and memoizes every
//! [`FeedDefinition`] it builds. It is `Send + Sync`: share it behind an
//! `Arc` with whatever handles requests.
//!
//! - Config reads are lock-free (`arc-swap`), so [`FeedRegistry::reload`]
//!   can replace the snapshot while requests are in flight.
//! - The cache is a concurrent map; a name is built at most once and every
//!   caller gets the same `Arc`.

use super::FeedDefinition;
use crate::{
    config::{ConfigDiagnostics, ConfigError, FeedsConfig},
    debug,
};
use arc_swap::ArcSwap;
use dashmap::DashMap;
use std::{path::Path, sync::Arc};
use thiserror::Error;

/// Feed lookup errors.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("feed `{0}` is not defined in your configuration")]
    NotFound(String),

    #[error("feed `{name}` has invalid settings")]
    Invalid {
        name: String,
        #[source]
        diagnostics: ConfigDiagnostics,
    },
}

/// Resolves feed names to memoized definitions.
pub struct FeedRegistry {
    config: ArcSwap<FeedsConfig>,
    feeds: DashMap<String, Arc<FeedDefinition>>,
}

impl FeedRegistry {
    pub fn new(config: FeedsConfig) -> Self {
        Self {
            config: ArcSwap::from_pointee(config),
            feeds: DashMap::new(),
        }
    }

    /// Load the configuration file and build a registry over it.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        Ok(Self::new(FeedsConfig::load(path)?))
    }

    /// Current configuration snapshot.
    #[inline]
    pub fn config(&self) -> Arc<FeedsConfig> {
        self.config.load_full()
    }

    /// Whether `name` is configured.
    pub fn has(&self, name: &str) -> bool {
        self.config.load().contains(name)
    }

    /// Resolve `name`, building and caching its definition on first access.
    pub fn get(&self, name: &str) -> Result<Arc<FeedDefinition>, RegistryError> {
        let config = self.config.load();
        let Some(settings) = config.get(name) else {
            return Err(RegistryError::NotFound(name.to_string()));
        };

        if let Some(cached) = self.feeds.get(name) {
            return Ok(Arc::clone(cached.value()));
        }

        let entry = self
            .feeds
            .entry(name.to_string())
            .or_try_insert_with(|| {
                debug!("registry"; "building feed `{}`", name);
                FeedDefinition::from_settings(name, settings)
                    .map(Arc::new)
                    .map_err(|diagnostics| RegistryError::Invalid {
                        name: name.to_string(),
                        diagnostics,
                    })
            })?;

        Ok(Arc::clone(entry.value()))
    }

    /// Configured feed names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.config.load().names().map(str::to_string).collect()
    }

    /// Replace the configuration snapshot.
    ///
    /// Definitions resolved before the reload stay cached for the lifetime
    /// of the registry; only names not yet resolved read the new settings.
    pub fn reload(&self, config: FeedsConfig) {
        debug!("registry"; "config reloaded ({} feeds)", config.feeds.len());
        self.config.store(Arc::new(config));
    }

    /// Number of memoized definitions.
    pub fn cached(&self) -> usize {
        self.feeds.len()
    }
}
