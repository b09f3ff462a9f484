use std::path::PathBuf;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// A normalized metadata record for one child of a listed directory.
///
/// Backend-agnostic: the local backend fills it from `std::fs::Metadata`,
/// other backends from whatever their protocol reports. Records are built
/// fresh on every listing and owned by the caller.
///
/// `owner`, `group` and `created` are best-effort. They are `None` when the
/// platform can't report them, which never fails the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Base name of the entry.
    pub name: String,

    /// File or directory. Exactly one, see [`FileRecord::is_file`].
    pub kind: EntryKind,

    /// Last modification time, in the system's local time zone.
    pub last_modified: DateTime<Local>,

    /// Creation time, where the platform records one.
    pub created: Option<DateTime<Local>>,

    /// Lower-cased filename extension without the dot. Empty for
    /// directories and for files without one.
    pub extension: String,

    /// The directory this entry was listed under, exactly as the caller
    /// passed it (a symlink stays a symlink here).
    pub parent: PathBuf,

    /// Canonical path to the entry. Use this for content access.
    pub path: PathBuf,

    /// Size in bytes. Always 0 for directories.
    pub size: u64,

    pub owner: Option<String>,

    pub group: Option<String>,
}

impl FileRecord {
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// The kind of a listed entry.
///
/// Only two kinds: a crawl either reads an entry's content or descends into
/// it. Anything that doesn't resolve to a regular file (directories, broken
/// symlinks, devices) is reported as `Directory`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// A regular file, following symlinks.
    File,

    /// A directory, or anything that isn't a regular file.
    Directory,
}
