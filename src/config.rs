use serde::{Deserialize, Serialize};

/// Listing options for [`LocalFileSystem`](crate::LocalFileSystem).
///
/// Deserializable so it can sit inside a crawler's settings file; missing
/// fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    /// Include dot-files and dot-directories. On by default.
    pub include_hidden: bool,

    /// Return children in file-name order instead of directory-iteration
    /// order. Off by default.
    pub sort_by_name: bool,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            include_hidden: true,
            sort_by_name:   false,
        }
    }
}
