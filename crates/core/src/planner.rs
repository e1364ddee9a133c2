use crate::metadata::{MediaRecord, TimestampSource};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

const MIN_SEQUENCE_WIDTH: usize = 3;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("base name is empty")]
    EmptyBaseName,
    #[error("base name must not contain path separators: {0}")]
    PathSeparator(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameEntry {
    pub sequence_index: usize,
    pub source_path: PathBuf,
    pub destination_name: String,
    pub destination_path: PathBuf,
    pub instant_ms: i64,
    pub source: TimestampSource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenamePlan {
    pub base_name: String,
    pub width: usize,
    pub entries: Vec<RenameEntry>,
}

pub fn sequence_width(total: usize) -> usize {
    total.to_string().len().max(MIN_SEQUENCE_WIDTH)
}

pub fn destination_name(base_name: &str, index: usize, width: usize, source: &Path) -> String {
    let extension = source
        .extension()
        .map(|v| format!(".{}", v.to_string_lossy()))
        .unwrap_or_default();
    format!("{}_{:0width$}{}", base_name, index, extension, width = width)
}

pub fn validate_base_name(base_name: &str) -> Result<(), PlanError> {
    if base_name.is_empty() {
        return Err(PlanError::EmptyBaseName);
    }
    if base_name.contains(['/', '\\']) {
        return Err(PlanError::PathSeparator(base_name.to_string()));
    }
    Ok(())
}

pub fn plan_renames(ordered: &[MediaRecord], base_name: &str) -> Result<RenamePlan, PlanError> {
    validate_base_name(base_name)?;

    let width = sequence_width(ordered.len());
    let entries = ordered
        .iter()
        .enumerate()
        .map(|(offset, record)| {
            let sequence_index = offset + 1;
            let destination_name =
                destination_name(base_name, sequence_index, width, &record.path);
            let parent = record.path.parent().unwrap_or_else(|| Path::new(""));
            RenameEntry {
                sequence_index,
                source_path: record.path.clone(),
                destination_path: parent.join(&destination_name),
                destination_name,
                instant_ms: record.instant_ms,
                source: record.source,
            }
        })
        .collect();

    Ok(RenamePlan {
        base_name: base_name.to_string(),
        width,
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::{destination_name, plan_renames, sequence_width, PlanError};
    use crate::metadata::{MediaRecord, TimestampSource};
    use std::path::{Path, PathBuf};

    fn records(count: usize) -> Vec<MediaRecord> {
        (0..count)
            .map(|i| MediaRecord {
                path: PathBuf::from(format!("/photos/IMG_{i:05}.JPG")),
                instant_ms: i as i64,
                source: TimestampSource::Metadata { field_index: 0 },
            })
            .collect()
    }

    #[test]
    fn width_is_at_least_three_digits() {
        assert_eq!(sequence_width(0), 3);
        assert_eq!(sequence_width(7), 3);
        assert_eq!(sequence_width(999), 3);
        assert_eq!(sequence_width(1000), 4);
        assert_eq!(sequence_width(1200), 4);
        assert_eq!(sequence_width(12_000), 5);
    }

    #[test]
    fn seven_items_get_three_digit_names() {
        let plan = plan_renames(&records(7), "trip").expect("plan");
        let names: Vec<_> = plan
            .entries
            .iter()
            .map(|e| e.destination_name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "trip_001.JPG",
                "trip_002.JPG",
                "trip_003.JPG",
                "trip_004.JPG",
                "trip_005.JPG",
                "trip_006.JPG",
                "trip_007.JPG",
            ]
        );
        assert_eq!(plan.entries[6].sequence_index, 7);
        assert_eq!(
            plan.entries[0].destination_path,
            PathBuf::from("/photos/trip_001.JPG")
        );
    }

    #[test]
    fn large_batches_widen_the_index() {
        let plan = plan_renames(&records(1200), "trip").expect("plan");
        assert_eq!(plan.width, 4);
        assert_eq!(plan.entries[0].destination_name, "trip_0001.JPG");
        assert_eq!(plan.entries[1199].destination_name, "trip_1200.JPG");
    }

    #[test]
    fn extension_is_copied_verbatim() {
        assert_eq!(
            destination_name("trip", 3, 3, Path::new("clip.MoV")),
            "trip_003.MoV"
        );
        assert_eq!(
            destination_name("trip", 12, 4, Path::new("a.b.heic")),
            "trip_0012.heic"
        );
        assert_eq!(destination_name("trip", 1, 3, Path::new("noext")), "trip_001");
    }

    #[test]
    fn invalid_base_names_are_rejected() {
        assert_eq!(
            plan_renames(&records(1), "").expect_err("empty"),
            PlanError::EmptyBaseName
        );
        assert!(matches!(
            plan_renames(&records(1), "../escape"),
            Err(PlanError::PathSeparator(_))
        ));
    }
}
