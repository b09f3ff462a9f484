//! # crawlfs
//!
//! Filesystem adapters for crawl pipelines.
//!
//! A crawler walks a tree one directory at a time: it asks a backend for the
//! children of a directory, indexes the files, and descends into the
//! directories. crawlfs owns that backend contract ([`FileSystem`]), the
//! normalized record every backend produces ([`FileRecord`]), the error type,
//! and the local-disk backend ([`LocalFileSystem`]). Scheduling, indexing and
//! content parsing belong to the caller.
//!
//! # Quick Start
//!
//! ```rust
//! use std::io::Read;
//! use crawlfs::FileSystem;
//!
//! let dir = tempfile::tempdir().unwrap();
//! std::fs::write(dir.path().join("invoice.PDF"), b"%PDF-1.7").unwrap();
//! std::fs::create_dir(dir.path().join("archive")).unwrap();
//!
//! let mut fs = crawlfs::local().sort_by_name(true).build();
//! fs.open().unwrap();
//!
//! let records = fs.list(dir.path()).unwrap();
//! assert_eq!(records.len(), 2);
//! assert!(records[0].is_dir());
//!
//! let invoice = &records[1];
//! assert_eq!(invoice.extension, "pdf");
//!
//! let mut content = Vec::new();
//! fs.open_content(invoice).unwrap().read_to_end(&mut content).unwrap();
//! assert_eq!(content.len() as u64, invoice.size);
//!
//! fs.close().unwrap();
//! ```
//!
//! # Errors
//!
//! Listing never conflates failure with emptiness: a missing directory is
//! [`CrawlError::NotFound`], an existing empty one is `Ok(vec![])`.
//! Attributes the platform can't supply (owner, group, creation time) are
//! `None` on the record and never fail it.
//!
//! # Logging
//!
//! Listing and content access emit [`tracing`] events at `debug`/`trace`.
//! A listing through a symlink that comes back empty logs at `warn`, so it
//! can be told apart from a directory that really is empty. Install a
//! subscriber in the host application to see them.

#![forbid(unsafe_code)]

mod builder;
mod config;
mod entry;
mod error;
mod local;
mod platform;
mod traits;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use builder::LocalBuilder;
pub use config::ListConfig;
pub use entry::{EntryKind, FileRecord};
pub use error::CrawlError;
pub use local::LocalFileSystem;
pub use platform::PlatformAttributes;
pub use traits::{Attributes, Describe, FileSystem};

// ── Entry point ───────────────────────────────────────────────────────────────

/// Create a new [`LocalBuilder`] to configure a local-disk backend.
///
/// # Example
///
/// ```rust
/// use crawlfs::FileSystem;
///
/// let fs = crawlfs::local().include_hidden(false).build();
/// assert!(fs.exists(std::path::Path::new(".")));
/// assert!(!fs.config().include_hidden);
/// ```
pub fn local() -> LocalBuilder {
    LocalBuilder::default()
}
