use crate::metadata::MediaRecord;
use crate::planner::{plan_renames, RenameEntry, RenamePlan};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RenameMode {
    DryRun,
    Apply,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RenameOutcome {
    Planned,
    Renamed,
    // Source left in place.
    SkippedExisting,
    Failed { message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameResult {
    #[serde(flatten)]
    pub entry: RenameEntry,
    pub outcome: RenameOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RenameReport {
    pub results: Vec<RenameResult>,
    pub total: usize,
    pub planned: usize,
    pub renamed: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Renames in plan order without staging names. An existing destination is
/// never overwritten or suffixed: that entry is skipped and the batch goes on.
pub fn apply_plan(plan: &RenamePlan, mode: RenameMode) -> RenameReport {
    let mut report = RenameReport {
        total: plan.entries.len(),
        ..RenameReport::default()
    };

    for entry in &plan.entries {
        let outcome = match mode {
            RenameMode::DryRun => RenameOutcome::Planned,
            RenameMode::Apply => rename_entry(entry),
        };

        match &outcome {
            RenameOutcome::Planned => report.planned += 1,
            RenameOutcome::Renamed => report.renamed += 1,
            RenameOutcome::SkippedExisting => report.skipped += 1,
            RenameOutcome::Failed { .. } => report.failed += 1,
        }

        report.results.push(RenameResult {
            entry: entry.clone(),
            outcome,
        });
    }

    report
}

pub fn plan_and_apply(ordered: &[MediaRecord], base_name: &str, apply: bool) -> Result<RenameReport> {
    let plan = plan_renames(ordered, base_name)?;
    let mode = if apply {
        RenameMode::Apply
    } else {
        RenameMode::DryRun
    };
    Ok(apply_plan(&plan, mode))
}

fn rename_entry(entry: &RenameEntry) -> RenameOutcome {
    if entry.destination_path.exists() {
        return RenameOutcome::SkippedExisting;
    }

    match fs::rename(&entry.source_path, &entry.destination_path) {
        Ok(()) => {
            log::debug!(
                "renamed {} -> {}",
                entry.source_path.display(),
                entry.destination_path.display()
            );
            RenameOutcome::Renamed
        }
        Err(err) => RenameOutcome::Failed {
            message: err.to_string(),
        },
    }
}
