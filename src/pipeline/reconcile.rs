use std::collections::BTreeMap;

use super::PipelineError;
use super::numeral::numeral_components;
use crate::model::{
    ReconciliationRecord, ReconciliationStatus, ReconciliationSummary, Section, TocEntry,
};

/// Compares TOC identifiers with realized section identifiers.
///
/// Records come back ordered by numeric components, so `2.9` precedes `2.10`.
/// Identifiers with equal components (`1.01`, `1.1`) fall back to string order.
pub fn compare(
    entries: &[TocEntry],
    sections: &[Section],
) -> Result<Vec<ReconciliationRecord>, PipelineError> {
    let mut presence = BTreeMap::<(Vec<u64>, &str), (bool, bool)>::new();

    for entry in entries {
        let key = (numeral_components(&entry.section_id)?, entry.section_id.as_str());
        presence.entry(key).or_default().0 = true;
    }
    for section in sections {
        let key = (
            numeral_components(&section.section_id)?,
            section.section_id.as_str(),
        );
        presence.entry(key).or_default().1 = true;
    }

    Ok(presence
        .into_iter()
        .map(|((_, section_id), (in_toc, in_sections))| ReconciliationRecord {
            section_id: section_id.to_string(),
            in_toc,
            in_sections,
            status: if in_toc && in_sections {
                ReconciliationStatus::Match
            } else {
                ReconciliationStatus::Mismatch
            },
        })
        .collect())
}

pub fn summarize(records: &[ReconciliationRecord]) -> ReconciliationSummary {
    let matches = records
        .iter()
        .filter(|record| record.status == ReconciliationStatus::Match)
        .count();

    ReconciliationSummary {
        total_ids: records.len(),
        matches,
        mismatches: records.len() - matches,
    }
}
