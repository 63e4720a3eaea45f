use anyhow::{Context, Result, bail};
use tracing::info;

use crate::cli::ValidateArgs;
use crate::export::{read_jsonl, write_jsonl};
use crate::model::{ReconciliationRecord, ReconciliationSummary, Section, TocEntry};
use crate::pipeline::{build_hierarchy, compare, summarize};

/// Re-validates exported TOC and section records and rebuilds the
/// reconciliation report without touching the source document.
pub fn run(args: ValidateArgs) -> Result<()> {
    let entries = read_jsonl::<TocEntry>(&args.toc_path)?;
    let sections = read_jsonl::<Section>(&args.sections_path)?;
    info!(
        toc = %args.toc_path.display(),
        sections = %args.sections_path.display(),
        entries = entries.len(),
        section_count = sections.len(),
        "loaded exported records"
    );

    let (records, summary) = reconcile_exports(entries, &sections)?;

    let detail_path = args
        .output_dir
        .join(format!("{}_validation.jsonl", args.output_prefix));
    let summary_path = args
        .output_dir
        .join(format!("{}_validation_summary.jsonl", args.output_prefix));
    write_jsonl(&detail_path, &records)?;
    write_jsonl(&summary_path, &[summary])?;

    info!(
        total = summary.total_ids,
        matches = summary.matches,
        mismatches = summary.mismatches,
        "validation summary"
    );

    if args.fail_on_mismatch && summary.mismatches > 0 {
        bail!(
            "{} of {} section identifiers did not reconcile",
            summary.mismatches,
            summary.total_ids
        );
    }

    Ok(())
}

pub(crate) fn reconcile_exports(
    entries: Vec<TocEntry>,
    sections: &[Section],
) -> Result<(Vec<ReconciliationRecord>, ReconciliationSummary)> {
    let hierarchy = build_hierarchy(entries).context("exported TOC failed hierarchy validation")?;
    if !hierarchy.duplicates_dropped.is_empty() {
        info!(
            dropped = hierarchy.duplicates_dropped.len(),
            "duplicate identifiers in exported TOC resolved by keeping the later entry"
        );
    }

    let records = compare(&hierarchy.entries, sections)
        .context("exported records carry a malformed section identifier")?;
    let summary = summarize(&records);
    Ok((records, summary))
}
