use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Local};
use ignore::WalkBuilder;
use tracing::{debug, trace, warn};

use crate::builder::LocalBuilder;
use crate::config::ListConfig;
use crate::entry::{EntryKind, FileRecord};
use crate::error::CrawlError;
use crate::traits::{Attributes, Describe, FileSystem};

// ---------------------------------------------------------------------------
// LocalFileSystem
// ---------------------------------------------------------------------------

/// [`FileSystem`] backend for the local disk.
///
/// Holds nothing but its configuration and attribute provider, so one
/// instance can serve any number of concurrent listings. All calls block on
/// the underlying filesystem; timeouts belong to the caller.
#[derive(Clone)]
pub struct LocalFileSystem {
    config:     ListConfig,
    attributes: Arc<dyn Attributes>,
}

impl LocalFileSystem {
    /// A lister with default options and [`PlatformAttributes`](crate::PlatformAttributes).
    pub fn new() -> Self {
        LocalBuilder::default().build()
    }

    pub fn builder() -> LocalBuilder {
        LocalBuilder::default()
    }

    pub(crate) fn from_parts(config: ListConfig, attributes: Arc<dyn Attributes>) -> Self {
        Self { config, attributes }
    }

    pub fn config(&self) -> &ListConfig {
        &self.config
    }
}

impl Default for LocalFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LocalFileSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalFileSystem")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// FileSystem
// ---------------------------------------------------------------------------

impl FileSystem for LocalFileSystem {
    fn open(&mut self) -> Result<(), CrawlError> {
        trace!("local filesystem open: nothing to connect");
        Ok(())
    }

    fn close(&mut self) -> Result<(), CrawlError> {
        trace!("local filesystem close: nothing to release");
        Ok(())
    }

    fn list(&self, dir: &Path) -> Result<Vec<FileRecord>, CrawlError> {
        let link = fs::symlink_metadata(dir).map_err(|e| CrawlError::io(dir, e))?;

        let (target, via_symlink) = if link.file_type().is_symlink() {
            let target = read_link_once(dir)?;
            debug!(dir = %dir.display(), target = %target.display(), "listing through symlink");
            (target, true)
        } else {
            debug!(dir = %dir.display(), "listing directory");
            (dir.to_path_buf(), false)
        };

        let meta = fs::metadata(&target).map_err(|e| CrawlError::io(&target, e))?;
        if !meta.is_dir() {
            return Err(CrawlError::NotADirectory(target));
        }
        let root = fs::canonicalize(&target).map_err(|e| CrawlError::io(&target, e))?;

        let mut builder = WalkBuilder::new(&root);
        builder
            .standard_filters(false)
            .ignore(false)
            .parents(false)
            .hidden(!self.config.include_hidden)
            .follow_links(false)
            .max_depth(Some(1));

        if self.config.sort_by_name {
            builder.sort_by_file_name(|a, b| a.cmp(b));
        }

        let mut records = Vec::new();

        for res in builder.build() {
            let entry = match res {
                Ok(e) => e,
                Err(e) => {
                    let depth = e.depth();
                    let err = map_ignore_error(e);
                    // Failing to read the root itself means the listing failed;
                    // a bad child only costs that child.
                    let at_root = depth.map_or(true, |d| d == 0)
                        || err.path().map_or(true, |p| p == &root);
                    if at_root {
                        return Err(err);
                    }
                    warn!(dir = %dir.display(), %err, "skipping unreadable entry");
                    continue;
                }
            };

            // Skip the root itself
            if entry.depth() == 0 {
                continue;
            }

            trace!(path = %entry.path().display(), "listing entry");
            records.push(self.metadata_of(dir, entry.path()));
        }

        if records.is_empty() {
            if via_symlink {
                // Some platforms list nothing through a symlinked directory.
                warn!(dir = %dir.display(), target = %root.display(), "symlink target listed no entries");
            } else {
                debug!(dir = %dir.display(), "directory is empty");
            }
        }

        debug!(dir = %dir.display(), count = records.len(), "local entries found");
        Ok(records)
    }

    fn open_content(&self, record: &FileRecord) -> Result<Box<dyn Read + Send>, CrawlError> {
        let path = &record.path;
        let file = File::open(path).map_err(|e| CrawlError::unreadable(path, e))?;
        let meta = file.metadata().map_err(|e| CrawlError::unreadable(path, e))?;

        // Opening a directory succeeds on Unix; reading it does not.
        if meta.is_dir() {
            return Err(CrawlError::Unreadable {
                path:   path.clone(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "entry is a directory"),
            });
        }

        debug!(path = %path.display(), size = meta.len(), "opened content");
        Ok(Box::new(BufReader::new(file)))
    }

    fn exists(&self, path: &Path) -> bool {
        match path.try_exists() {
            Ok(found) => found,
            Err(err) => {
                trace!(path = %path.display(), %err, "existence undetermined");
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Describe
// ---------------------------------------------------------------------------

impl Describe for LocalFileSystem {
    type Raw = Path;

    fn metadata_of(&self, dir: &Path, raw: &Path) -> FileRecord {
        let name = raw
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        // Follow symlinks; a dangling one still has metadata of its own.
        let metadata = match fs::metadata(raw) {
            Ok(m) => Some(m),
            Err(err) => {
                debug!(path = %raw.display(), %err, "target metadata unavailable");
                fs::symlink_metadata(raw).ok()
            }
        };

        let kind = match &metadata {
            Some(m) if m.is_file() => EntryKind::File,
            _                      => EntryKind::Directory,
        };

        // Out-of-range timestamps fall back to the epoch rather than failing the record.
        let last_modified = metadata
            .as_ref()
            .and_then(|m| m.modified().ok())
            .and_then(|t| local_time(raw, t))
            .unwrap_or_default();

        let (created, owner, group, size) = match &metadata {
            Some(m) => (
                self.attributes.created(raw, m).and_then(|t| local_time(raw, t)),
                self.attributes.owner(raw, m),
                self.attributes.group(raw, m),
                if kind == EntryKind::File { m.len() } else { 0 },
            ),
            None => (None, None, None, 0),
        };

        let extension = match kind {
            EntryKind::File      => self.attributes.extension(raw),
            EntryKind::Directory => String::new(),
        };

        let path = fs::canonicalize(raw).unwrap_or_else(|_| raw.to_path_buf());

        FileRecord {
            name,
            kind,
            last_modified,
            created,
            extension,
            parent: dir.to_path_buf(),
            path,
            size,
            owner,
            group,
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve one level of symlink. Relative targets are relative to the
/// link's own directory.
fn read_link_once(link: &Path) -> Result<PathBuf, CrawlError> {
    let target = fs::read_link(link).map_err(|e| CrawlError::io(link, e))?;
    Ok(match link.parent() {
        Some(parent) if target.is_relative() => parent.join(target),
        _ => target,
    })
}

/// Convert to local time, or `None` if chrono can't represent the instant.
/// Filesystems with 64-bit timestamps can store values far outside its range.
fn local_time(path: &Path, t: SystemTime) -> Option<DateTime<Local>> {
    let utc = match t.duration_since(UNIX_EPOCH) {
        Ok(d) => DateTime::from_timestamp(i64::try_from(d.as_secs()).ok()?, d.subsec_nanos()),
        Err(before) => {
            let d = before.duration();
            let secs = i64::try_from(d.as_secs()).ok()?;
            match d.subsec_nanos() {
                0     => DateTime::from_timestamp(-secs, 0),
                nanos => DateTime::from_timestamp(-secs - 1, 1_000_000_000 - nanos),
            }
        }
    };
    if utc.is_none() {
        debug!(path = %path.display(), "timestamp out of range");
    }
    utc.map(|t| t.with_timezone(&Local))
}

fn map_ignore_error(e: ignore::Error) -> CrawlError {
    match e {
        ignore::Error::WithDepth { err, .. } => map_ignore_error(*err),
        ignore::Error::WithPath { path, err } => match *err {
            ignore::Error::Io(io_err) => CrawlError::io(path, io_err),
            other => CrawlError::Io {
                path,
                source: io::Error::new(io::ErrorKind::Other, other.to_string()),
            },
        },
        ignore::Error::Loop { child, .. } => CrawlError::SymlinkLoop(child),
        ignore::Error::Io(io_err)         => CrawlError::Io {
            path:   PathBuf::new(),
            source: io_err,
        },
        other => CrawlError::Io {
            path:   PathBuf::new(),
            source: io::Error::new(io::ErrorKind::Other, other.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::Metadata;
    use std::time::Duration;

    struct FixedAttributes;

    impl Attributes for FixedAttributes {
        fn created(&self, _path: &Path, _metadata: &Metadata) -> Option<SystemTime> {
            None
        }

        fn owner(&self, _path: &Path, _metadata: &Metadata) -> Option<String> {
            Some("crawler".into())
        }

        fn group(&self, _path: &Path, _metadata: &Metadata) -> Option<String> {
            Some("staff".into())
        }
    }

    #[test]
    fn metadata_of_uses_attribute_provider() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("Notes.TXT");
        fs::write(&file, "hello").unwrap();

        let lister = LocalFileSystem::builder().attributes(FixedAttributes).build();
        let record = lister.metadata_of(dir.path(), &file);

        assert_eq!(record.name, "Notes.TXT");
        assert!(record.is_file());
        assert_eq!(record.extension, "txt");
        assert_eq!(record.size, 5);
        assert_eq!(record.owner.as_deref(), Some("crawler"));
        assert_eq!(record.group.as_deref(), Some("staff"));
        assert!(record.created.is_none());
        assert_eq!(record.parent, dir.path());
    }

    #[test]
    fn metadata_of_missing_entry_degrades() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("gone.bin");

        let record = LocalFileSystem::new().metadata_of(dir.path(), &gone);

        assert_eq!(record.name, "gone.bin");
        assert!(record.is_dir());
        assert_eq!(record.size, 0);
        assert_eq!(record.extension, "");
        assert!(record.owner.is_none());
        assert_eq!(record.path, gone);
    }

    #[test]
    fn directories_have_no_size_or_extension() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("photos.d");
        fs::create_dir(&sub).unwrap();

        let record = LocalFileSystem::new().metadata_of(dir.path(), &sub);

        assert!(record.is_dir());
        assert_eq!(record.size, 0);
        assert_eq!(record.extension, "");
    }

    #[test]
    fn root_errors_map_through_depth_wrapper() {
        let err = map_ignore_error(ignore::Error::WithDepth {
            depth: 0,
            err:   Box::new(ignore::Error::WithPath {
                path: PathBuf::from("/root/secret"),
                err:  Box::new(ignore::Error::Io(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    "denied",
                ))),
            }),
        });
        assert!(matches!(err, CrawlError::PermissionDenied(ref p) if p == Path::new("/root/secret")));
    }

    #[test]
    fn local_time_rejects_out_of_range_instants() {
        let far = UNIX_EPOCH + Duration::from_secs(99_999_999_999_999);
        assert!(local_time(Path::new("far"), far).is_none());
    }

    #[test]
    fn local_time_handles_instants_before_epoch() {
        let before = UNIX_EPOCH - Duration::from_millis(1_500);
        let t = local_time(Path::new("old"), before).unwrap();
        assert_eq!(t.timestamp(), -2);
        assert_eq!(t.timestamp_subsec_millis(), 500);

        let t = local_time(Path::new("epoch"), UNIX_EPOCH).unwrap();
        assert_eq!(t.timestamp(), 0);
    }
}
