use anyhow::{Context, Result};
use tracing::info;

use super::boundaries::{SectionWindow, map_sections};
use super::hierarchy::build_hierarchy;
use super::reconcile::{compare, summarize};
use super::toc_line::{TocLineParser, TocScanWindow, scan_toc_lines};
use crate::model::{ReconciliationRecord, ReconciliationSummary, Section, TocEntry};
use crate::source::PageTextSource;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub doc_title: String,
    pub toc_scan: TocScanWindow,
    pub sections: SectionWindow,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            doc_title: "USB Power Delivery Specification".to_string(),
            toc_scan: TocScanWindow::default(),
            sections: SectionWindow::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub page_count: usize,
    pub toc_lines_scanned: usize,
    pub toc_lines_rejected: usize,
    pub duplicate_ids_dropped: usize,
    pub orphan_entries: usize,
    pub empty_sections: usize,
}

/// Everything one pipeline run produced. The caller owns it; nothing is
/// retained between runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRun {
    pub entries: Vec<TocEntry>,
    pub sections: Vec<Section>,
    pub records: Vec<ReconciliationRecord>,
    pub summary: ReconciliationSummary,
    pub stats: RunStats,
}

impl ExtractionRun {
    pub fn execute(source: &dyn PageTextSource, config: &PipelineConfig) -> Result<Self> {
        let page_count = source.page_count();
        info!(
            pages = page_count,
            toc_start = config.toc_scan.start_page,
            toc_end = config.toc_scan.end_page,
            "step 1/4: scanning table of contents"
        );
        let parser = TocLineParser::new(&config.doc_title)?;
        let scan = scan_toc_lines(source, &parser, config.toc_scan)
            .context("failed to read table of contents pages")?;
        info!(
            lines = scan.lines_scanned,
            rejected = scan.lines_rejected,
            entries = scan.entries.len(),
            "TOC lines parsed"
        );

        info!("step 2/4: validating hierarchy");
        let hierarchy = build_hierarchy(scan.entries)?;

        info!(entries = hierarchy.entries.len(), "step 3/4: mapping sections");
        let sections = map_sections(source, &hierarchy.entries, page_count, config.sections)
            .context("failed to map sections onto pages")?;

        info!(sections = sections.len(), "step 4/4: reconciling TOC against sections");
        let records = compare(&hierarchy.entries, &sections)?;
        let summary = summarize(&records);
        info!(
            total = summary.total_ids,
            matches = summary.matches,
            mismatches = summary.mismatches,
            "reconciliation summary"
        );

        let stats = RunStats {
            page_count,
            toc_lines_scanned: scan.lines_scanned,
            toc_lines_rejected: scan.lines_rejected,
            duplicate_ids_dropped: hierarchy.duplicates_dropped.len(),
            orphan_entries: hierarchy.orphans.len(),
            empty_sections: sections
                .iter()
                .filter(|section| section.content.is_empty())
                .count(),
        };

        Ok(Self {
            entries: hierarchy.entries,
            sections,
            records,
            summary,
            stats,
        })
    }
}
