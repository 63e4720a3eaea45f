//! Structure recovery: TOC lines to a numbered hierarchy, hierarchy to page
//! ranges, and declared-versus-realized reconciliation.

mod boundaries;
mod error;
mod hierarchy;
mod numeral;
mod reconcile;
mod run;
#[cfg(test)]
mod tests;
mod toc_line;

pub use boundaries::{
    CONTENT_PREVIEW_CHARS, PageRange, SectionWindow, map_sections, section_ranges, truncate_chars,
};
pub use error::PipelineError;
pub use hierarchy::{HierarchyReport, build_hierarchy, validate_entry};
pub use numeral::numeral_components;
pub use reconcile::{compare, summarize};
pub use run::{ExtractionRun, PipelineConfig, RunStats};
pub use toc_line::{TocLineParser, TocScan, TocScanWindow, derive_tags, scan_toc_lines};
