use std::sync::Arc;

use crate::config::ListConfig;
use crate::local::LocalFileSystem;
use crate::platform::PlatformAttributes;
use crate::traits::Attributes;

// ---------------------------------------------------------------------------
// LocalBuilder
// ---------------------------------------------------------------------------

/// Entry point for configuring a [`LocalFileSystem`].
///
/// Created via [`crawlfs::local()`](crate::local) or
/// [`LocalFileSystem::builder()`]. Configure with chained builder methods,
/// then call [`build()`](LocalBuilder::build).
///
/// # Example
///
/// ```rust,ignore
/// let fs = crawlfs::local()
///     .include_hidden(false)
///     .sort_by_name(true)
///     .attributes(MyAttributes)
///     .build();
/// ```
pub struct LocalBuilder {
    config:     ListConfig,
    attributes: Option<Arc<dyn Attributes>>,
}

impl Default for LocalBuilder {
    fn default() -> Self {
        Self {
            config:     ListConfig::default(),
            attributes: None,
        }
    }
}

impl LocalBuilder {
    // ── Options ───────────────────────────────────────────────────────────

    /// Replace all listing options at once, e.g. with a [`ListConfig`]
    /// deserialized from the crawler's settings.
    pub fn config(mut self, config: ListConfig) -> Self {
        self.config = config;
        self
    }

    /// Include dot-files in listings. On by default.
    pub fn include_hidden(mut self, yes: bool) -> Self {
        self.config.include_hidden = yes;
        self
    }

    /// Return children sorted by file name.
    ///
    /// Off by default: unsorted listings skip the sort and come back in
    /// whatever order the OS yields them.
    pub fn sort_by_name(mut self, yes: bool) -> Self {
        self.config.sort_by_name = yes;
        self
    }

    // ── Attributes ────────────────────────────────────────────────────────

    /// Set the provider for creation time, owner, group and extension.
    ///
    /// Defaults to [`PlatformAttributes`].
    pub fn attributes(mut self, a: impl Attributes + 'static) -> Self {
        self.attributes = Some(Arc::new(a));
        self
    }

    // ── Build ─────────────────────────────────────────────────────────────

    pub fn build(self) -> LocalFileSystem {
        let attributes: Arc<dyn Attributes> = match self.attributes {
            Some(a) => a,
            None    => Arc::new(PlatformAttributes),
        };
        LocalFileSystem::from_parts(self.config, attributes)
    }
}
