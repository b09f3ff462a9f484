use std::fs::Metadata;
use std::io::Read;
use std::path::Path;
use std::time::SystemTime;

use crate::entry::FileRecord;
use crate::error::CrawlError;

/// A filesystem a crawl can walk: local disk, SSH, FTP, or anything else
/// that can list a directory and hand out file content.
///
/// The crawl scheduler depends only on this trait. Implement it to plug in
/// a new backend.
///
/// # Object Safety
///
/// `FileSystem` is object-safe so schedulers can hold a
/// `Box<dyn FileSystem>` without knowing the backend. Content is therefore
/// returned as `Box<dyn Read + Send>` rather than an associated reader type,
/// and the backend-specific entry conversion lives on [`Describe`].
///
/// # Thread Safety
///
/// `Send + Sync` are required. `list`, `exists` and `open_content` take
/// `&self` and may be called concurrently for different paths.
///
/// # Lifecycle
///
/// `open` and `close` bracket a crawl. Network backends connect and
/// disconnect there; they must tolerate being called repeatedly and in any
/// order. The defaults do nothing.
///
/// # Example
///
/// ```rust
/// use std::io::Read;
/// use std::path::Path;
/// use crawlfs::{CrawlError, FileRecord, FileSystem};
///
/// struct Nothing;
///
/// impl FileSystem for Nothing {
///     fn list(&self, dir: &Path) -> Result<Vec<FileRecord>, CrawlError> {
///         Err(CrawlError::NotFound(dir.to_path_buf()))
///     }
///     fn open_content(&self, record: &FileRecord) -> Result<Box<dyn Read + Send>, CrawlError> {
///         Err(CrawlError::NotFound(record.path.clone()))
///     }
///     fn exists(&self, _path: &Path) -> bool {
///         false
///     }
/// }
///
/// let mut fs: Box<dyn FileSystem> = Box::new(Nothing);
/// fs.open().unwrap();
/// assert!(!fs.exists(Path::new("/anything")));
/// fs.close().unwrap();
/// ```
pub trait FileSystem: Send + Sync {
    /// Prepare the backend for use.
    fn open(&mut self) -> Result<(), CrawlError> {
        Ok(())
    }

    /// Release whatever `open` acquired.
    fn close(&mut self) -> Result<(), CrawlError> {
        Ok(())
    }

    /// List the direct children of `dir`.
    ///
    /// A symlinked `dir` is resolved to its target first. An existing empty
    /// directory yields `Ok(vec![])`; a missing or unlistable one yields
    /// `Err`, never an empty success.
    ///
    /// Every child is either a file or a directory. Anything that doesn't
    /// resolve to a regular file comes back as [`EntryKind::Directory`],
    /// including dangling symlinks, FIFOs, sockets and devices. A scheduler
    /// that descends into every `is_dir()` record should expect `NotFound`
    /// or `NotADirectory` for those and skip them.
    ///
    /// [`EntryKind::Directory`]: crate::EntryKind::Directory
    fn list(&self, dir: &Path) -> Result<Vec<FileRecord>, CrawlError>;

    /// Open a reader positioned at the start of `record`'s content.
    ///
    /// The caller owns the reader and drops it when done.
    fn open_content(&self, record: &FileRecord) -> Result<Box<dyn Read + Send>, CrawlError>;

    /// Whether `path` currently resolves to an existing entry.
    /// Never fails: anything that can't be determined counts as absent.
    fn exists(&self, path: &Path) -> bool;
}

/// Converts a backend's raw directory entry into a [`FileRecord`].
///
/// Separate from [`FileSystem`] because each backend has its own raw entry
/// type, and an associated type would make `dyn FileSystem` unusable.
pub trait Describe {
    /// The backend's native entry handle (a path for local disk, a
    /// remote stat result for network backends).
    type Raw: ?Sized;

    /// Build the record for `raw`, listed under `dir`.
    ///
    /// Must not fail: attributes the backend can't determine degrade to
    /// their empty value.
    fn metadata_of(&self, dir: &Path, raw: &Self::Raw) -> FileRecord;
}

/// Platform lookups for the attributes `std` doesn't normalize.
///
/// Every method is best-effort and returns `None` when the value is
/// unavailable. Swap in a stub through
/// [`LocalBuilder::attributes`](crate::LocalBuilder::attributes) to make
/// records deterministic in tests.
pub trait Attributes: Send + Sync {
    /// Creation time of the entry.
    fn created(&self, path: &Path, metadata: &Metadata) -> Option<SystemTime>;

    /// Name of the owning user.
    fn owner(&self, path: &Path, metadata: &Metadata) -> Option<String>;

    /// Name of the owning group.
    fn group(&self, path: &Path, metadata: &Metadata) -> Option<String>;

    /// Lower-cased extension of the file name, or empty if there is none.
    ///
    /// Dot-files such as `.bashrc` have no extension.
    fn extension(&self, path: &Path) -> String {
        path.extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    }
}
