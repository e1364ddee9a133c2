use crate::metadata::{MediaRecord, MetadataReader};
use crate::resolver::resolve_timestamp;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const MEDIA_EXTENSIONS: &[&str] = &[
    // photo
    "jpg", "jpeg", "png", "heic", "dng", "nef", "cr2", "cr3", "arw", "orf", "raf",
    // video
    "mov", "mp4", "m4v", "avi", "mts", "m2ts", "3gp", "mkv",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannedMedia {
    pub record: MediaRecord,
    pub read_error: Option<String>,
}

pub fn is_media_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy();
            MEDIA_EXTENSIONS
                .iter()
                .any(|candidate| ext.eq_ignore_ascii_case(candidate))
        })
        .unwrap_or(false)
}

/// Lists media files directly inside `dir`, sorted by file name. That order
/// is the tie-break for equal timestamps.
pub fn discover_media_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        bail!("directory does not exist: {}", dir.display());
    }
    if !dir.is_dir() {
        bail!("not a directory: {}", dir.display());
    }

    let mut out = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("failed to scan directory: {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        if is_media_file(entry.path()) {
            out.push(entry.into_path());
        }
    }

    Ok(out)
}

pub fn file_modified_millis(path: &Path) -> Option<i64> {
    let time = fs::metadata(path).ok()?.modified().ok()?;
    Some(DateTime::<Utc>::from(time).timestamp_millis())
}

// Never fails: a reader error is kept on the result and the file falls back
// to its mtime, or 0 when that is unreadable too.
pub fn scan_media(path: &Path, reader: &dyn MetadataReader) -> ScannedMedia {
    let (candidates, read_error) = match reader.read_candidates(path) {
        Ok(lines) => (lines, None),
        Err(err) => {
            log::debug!("metadata read failed for {}: {err:#}", path.display());
            (Vec::new(), Some(format!("{err:#}")))
        }
    };

    let fallback = file_modified_millis(path).unwrap_or(0);
    let resolution = resolve_timestamp(&candidates, fallback);

    ScannedMedia {
        record: MediaRecord {
            path: path.to_path_buf(),
            instant_ms: resolution.instant_ms,
            source: resolution.source,
        },
        read_error,
    }
}

pub fn scan_directory(dir: &Path, reader: &dyn MetadataReader) -> Result<Vec<ScannedMedia>> {
    Ok(discover_media_files(dir)?
        .iter()
        .map(|path| scan_media(path, reader))
        .collect())
}
