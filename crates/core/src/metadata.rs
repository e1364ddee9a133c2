use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimestampSource {
    Metadata { field_index: usize },
    FileModified,
}

impl TimestampSource {
    pub fn is_fallback(&self) -> bool {
        matches!(self, TimestampSource::FileModified)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MediaRecord {
    pub path: PathBuf,
    pub instant_ms: i64,
    pub source: TimestampSource,
}

/// Raw timestamp lines for a file, most authoritative field first. Empty
/// lines mean "no data", not an error.
pub trait MetadataReader {
    fn read_candidates(&self, path: &Path) -> Result<Vec<String>>;
}

impl<F> MetadataReader for F
where
    F: Fn(&Path) -> Result<Vec<String>>,
{
    fn read_candidates(&self, path: &Path) -> Result<Vec<String>> {
        self(path)
    }
}
