use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrawlError {
    // Listing target
    #[error("path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("symlink loop: {}", .0.display())]
    SymlinkLoop(PathBuf),

    // Content
    #[error("unreadable content: {}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error at {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Non-local backends
    #[error("backend error: {0}")]
    Backend(String),
}

impl CrawlError {
    /// Wrap an I/O error with the path it occurred at, promoting the kinds
    /// callers branch on to their own variants.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if is_loop(&source) {
            return Self::SymlinkLoop(path);
        }
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            std::io::ErrorKind::NotADirectory => Self::NotADirectory(path),
            _ => Self::Io { path, source },
        }
    }

    /// Like [`CrawlError::io`], but for failures opening a file's content.
    pub(crate) fn unreadable(path: &Path, source: std::io::Error) -> Self {
        if is_loop(&source) {
            return Self::SymlinkLoop(path.to_path_buf());
        }
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Unreadable {
                path: path.to_path_buf(),
                source,
            },
        }
    }

    /// The path this error occurred at, if applicable.
    /// Schedulers use this to log "Skipped: <path>" without matching on variants.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::NotFound(p)
            | Self::NotADirectory(p)
            | Self::PermissionDenied(p)
            | Self::SymlinkLoop(p)
            | Self::Unreadable { path: p, .. }
            | Self::Io { path: p, .. } => Some(p),
            Self::Backend(_) => None,
        }
    }

    /// Whether a crawl can skip this path and keep going.
    ///
    /// Recoverable errors (permission denied, symlink loops, unreadable
    /// content, transient IO) concern one entry. `NotFound` and
    /// `NotADirectory` mean the target is gone or was never listable, and a
    /// backend error means the connection itself is in question.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::PermissionDenied(_)
                | Self::SymlinkLoop(_)
                | Self::Unreadable { .. }
                | Self::Io { .. }
        )
    }
}

// `ErrorKind::FilesystemLoop` is unstable, so ELOOP is matched by errno.
#[cfg(unix)]
fn is_loop(err: &std::io::Error) -> bool {
    err.raw_os_error() == Some(libc::ELOOP)
}

#[cfg(not(unix))]
fn is_loop(_err: &std::io::Error) -> bool {
    false
}
