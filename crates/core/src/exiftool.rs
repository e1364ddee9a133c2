use crate::metadata::MetadataReader;
use crate::timestamp::TIMESTAMP_PROFILE;
use anyhow::{bail, Context, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

pub const DEFAULT_TIMESTAMP_FIELDS: &[&str] = &[
    "DateTimeOriginal",
    "CreateDate",
    "ModifyDate",
    "MediaCreateDate",
    "TrackCreateDate",
    "FileModifyDate",
];

const QUICKTIME_EXTENSIONS: &[&str] = &["mov", "mp4", "m4v"];

#[derive(Debug, Clone)]
pub struct ExifToolReader {
    pub program: PathBuf,
    pub fields: Vec<String>,
    // QuickTime dates are UTC by definition but often written as local time.
    pub quicktime_utc: bool,
}

impl Default for ExifToolReader {
    fn default() -> Self {
        Self {
            program: PathBuf::from("exiftool"),
            fields: DEFAULT_TIMESTAMP_FIELDS
                .iter()
                .map(|field| field.to_string())
                .collect(),
            quicktime_utc: true,
        }
    }
}

impl ExifToolReader {
    pub fn args_for(&self, path: &Path) -> Vec<OsString> {
        let mut args = Vec::<OsString>::new();
        if self.quicktime_utc && is_quicktime(path) {
            args.push("-api".into());
            args.push("QuickTimeUTC".into());
        }
        for field in &self.fields {
            args.push(format!("-{}", field.trim_start_matches('-')).into());
        }
        for flag in ["-s", "-s", "-s", "-d", TIMESTAMP_PROFILE] {
            args.push(flag.into());
        }
        args.push(path.as_os_str().to_os_string());
        args
    }
}

impl MetadataReader for ExifToolReader {
    fn read_candidates(&self, path: &Path) -> Result<Vec<String>> {
        log::debug!("running {} on {}", self.program.display(), path.display());
        let output = Command::new(&self.program)
            .args(self.args_for(path))
            .output()
            .with_context(|| format!("failed to run {}", self.program.display()))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() && stdout.trim().is_empty() {
            bail!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(split_output(&stdout))
    }
}

fn split_output(stdout: &str) -> Vec<String> {
    stdout.lines().map(str::to_string).collect()
}

fn is_quicktime(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy();
            QUICKTIME_EXTENSIONS
                .iter()
                .any(|candidate| ext.eq_ignore_ascii_case(candidate))
        })
        .unwrap_or(false)
}
