use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use super::PipelineError;
use super::numeral::numeral_components;
use crate::model::TocEntry;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HierarchyReport {
    pub entries: Vec<TocEntry>,
    /// Identifiers whose earlier occurrences were discarded.
    pub duplicates_dropped: Vec<String>,
    /// Entries whose parent identifier names no entry in the run.
    pub orphans: Vec<String>,
}

/// Checks that an entry's level and parent agree with its identifier.
pub fn validate_entry(entry: &TocEntry) -> Result<(), PipelineError> {
    let components = numeral_components(&entry.section_id)?;

    let mismatch = |reason: String| PipelineError::HierarchyMismatch {
        section_id: entry.section_id.clone(),
        reason,
    };

    if entry.level as usize != components.len() {
        return Err(mismatch(format!(
            "level {} but identifier has {} components",
            entry.level,
            components.len()
        )));
    }

    let expected_parent = entry
        .section_id
        .rsplit_once('.')
        .map(|(parent, _)| parent);
    if entry.parent_id.as_deref() != expected_parent {
        return Err(mismatch(format!(
            "parent {:?} but identifier implies {:?}",
            entry.parent_id, expected_parent
        )));
    }

    if entry.page == 0 {
        return Err(mismatch("declared page must be at least 1".to_string()));
    }

    Ok(())
}

/// Validates every entry and resolves duplicate identifiers.
///
/// Encounter order is preserved. When an identifier repeats, the last
/// occurrence stays at its own position and earlier ones are dropped. Orphans
/// are reported but kept.
pub fn build_hierarchy(entries: Vec<TocEntry>) -> Result<HierarchyReport, PipelineError> {
    for entry in &entries {
        validate_entry(entry)?;
    }

    let mut last_index = HashMap::<&str, usize>::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        last_index.insert(entry.section_id.as_str(), index);
    }

    let keep = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| last_index.get(entry.section_id.as_str()) == Some(&index))
        .collect::<Vec<bool>>();

    let mut report = HierarchyReport::default();
    for (entry, keep) in entries.into_iter().zip(keep) {
        if keep {
            report.entries.push(entry);
        } else {
            warn!(
                section_id = %entry.section_id,
                page = entry.page,
                "duplicate section identifier, keeping the later entry"
            );
            report.duplicates_dropped.push(entry.section_id);
        }
    }

    let known = report
        .entries
        .iter()
        .map(|entry| entry.section_id.as_str())
        .collect::<HashSet<&str>>();
    report.orphans = report
        .entries
        .iter()
        .filter(|entry| {
            entry
                .parent_id
                .as_deref()
                .is_some_and(|parent| !known.contains(parent))
        })
        .map(|entry| entry.section_id.clone())
        .collect();

    for orphan in &report.orphans {
        debug!(section_id = %orphan, "section parent not present in TOC");
    }

    Ok(report)
}
