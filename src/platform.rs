use std::fs::Metadata;
use std::path::Path;
use std::time::SystemTime;

#[cfg(unix)]
use std::os::unix::fs::MetadataExt;

use tracing::trace;

use crate::traits::Attributes;

/// The default [`Attributes`] provider, backed by the host OS.
///
/// Creation time comes from `Metadata::created`, which some filesystems
/// don't record. Owner and group names are looked up from uid/gid on Unix
/// and are unavailable elsewhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlatformAttributes;

impl Attributes for PlatformAttributes {
    fn created(&self, path: &Path, metadata: &Metadata) -> Option<SystemTime> {
        match metadata.created() {
            Ok(t) => Some(t),
            Err(err) => {
                trace!(path = %path.display(), %err, "creation time unavailable");
                None
            }
        }
    }

    fn owner(&self, path: &Path, metadata: &Metadata) -> Option<String> {
        let name = owner_name(metadata);
        if name.is_none() {
            trace!(path = %path.display(), "owner unavailable");
        }
        name
    }

    fn group(&self, path: &Path, metadata: &Metadata) -> Option<String> {
        let name = group_name(metadata);
        if name.is_none() {
            trace!(path = %path.display(), "group unavailable");
        }
        name
    }
}

#[cfg(unix)]
fn owner_name(metadata: &Metadata) -> Option<String> {
    uzers::get_user_by_uid(metadata.uid()).map(|u| u.name().to_string_lossy().into_owned())
}

#[cfg(not(unix))]
fn owner_name(_metadata: &Metadata) -> Option<String> {
    None
}

#[cfg(unix)]
fn group_name(metadata: &Metadata) -> Option<String> {
    uzers::get_group_by_gid(metadata.gid()).map(|g| g.name().to_string_lossy().into_owned())
}

#[cfg(not(unix))]
fn group_name(_metadata: &Metadata) -> Option<String> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_lowercased() {
        let attrs = PlatformAttributes;
        assert_eq!(attrs.extension(Path::new("/tmp/Report.PDF")), "pdf");
        assert_eq!(attrs.extension(Path::new("archive.tar.GZ")), "gz");
    }

    #[test]
    fn extension_empty_when_missing() {
        let attrs = PlatformAttributes;
        assert_eq!(attrs.extension(Path::new("Makefile")), "");
        assert_eq!(attrs.extension(Path::new(".bashrc")), "");
    }

    #[cfg(unix)]
    #[test]
    fn owner_of_own_file_matches_uid() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("mine.txt");
        std::fs::write(&file, "x").unwrap();
        let meta = std::fs::metadata(&file).unwrap();

        let expected = uzers::get_user_by_uid(meta.uid())
            .map(|u| u.name().to_string_lossy().into_owned());
        assert_eq!(PlatformAttributes.owner(&file, &meta), expected);
    }
}
