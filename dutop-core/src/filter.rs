use std::fmt;
use std::path::Path;

use regex::bytes::Regex;

use crate::{DutopError, Result};

/// Paths to leave out of a scan
///
/// A path is excluded when any pattern matches anywhere in its raw bytes, so
/// names that are not valid UTF-8 can still be matched.
/// Built once before the walk and shared read-only between walk tasks.
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    patterns: Vec<Regex>,
}

impl ExclusionSet {
    /// Compile patterns in order; the first invalid one aborts construction
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| {
                let p = p.as_ref();
                Regex::new(p).map_err(|source| DutopError::InvalidPattern {
                    pattern: p.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    pub fn is_excluded(&self, path: &Path) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        let bytes = path.as_os_str().as_encoded_bytes();
        self.patterns.iter().any(|re| re.is_match(bytes))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl fmt::Display for ExclusionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .patterns
            .iter()
            .map(Regex::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        f.write_str(&joined)
    }
}
