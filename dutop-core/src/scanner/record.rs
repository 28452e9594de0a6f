use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};

/// One regular (non-directory) entry found by the walk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    /// Root joined with every directory name down to the file
    #[serde(serialize_with = "serialize_lossy")]
    pub path: PathBuf,
    /// Apparent size in bytes
    pub size: u64,
}

impl FileRecord {
    pub fn new(path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }
}

// Names are not required to be UTF-8; invalid bytes become U+FFFD.
fn serialize_lossy<S: Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}
