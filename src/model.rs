use serde::{Deserialize, Serialize};

/// One structural node declared by the table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    pub doc_title: String,
    pub section_id: String,
    pub title: String,
    pub page: u32,
    pub level: u32,
    pub parent_id: Option<String>,
    pub full_path: String,
    pub tags: Option<Vec<String>>,
}

/// Content realized for one TOC entry's page range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub doc_title: String,
    pub section_id: String,
    pub title: String,
    pub page: u32,
    pub content: String,
    pub tables: Option<Vec<String>>,
    pub figures: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReconciliationStatus {
    Match,
    Mismatch,
}

impl ReconciliationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Match => "MATCH",
            Self::Mismatch => "MISMATCH",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationRecord {
    pub section_id: String,
    pub in_toc: bool,
    pub in_sections: bool,
    pub status: ReconciliationStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationSummary {
    pub total_ids: usize,
    pub matches: usize,
    pub mismatches: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaVersion {
    pub kind: String,
    pub version: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractPaths {
    pub cache_root: String,
    pub output_dir: String,
    pub toc_path: String,
    pub sections_path: String,
    pub reconciliation_path: String,
    pub summary_path: String,
    pub db_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractWindows {
    pub toc_start_page: usize,
    pub toc_end_page: usize,
    pub section_floor_page: Option<usize>,
    pub section_ceiling_page: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractCounts {
    pub page_count: usize,
    pub toc_lines_scanned: usize,
    pub toc_lines_rejected: usize,
    pub toc_entries: usize,
    pub duplicate_ids_dropped: usize,
    pub orphan_entries: usize,
    pub sections: usize,
    pub empty_sections: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub status: String,
    pub started_at: String,
    pub updated_at: String,
    pub command: String,
    pub doc_title: String,
    pub source_path: String,
    pub source_sha256: String,
    pub backend: String,
    pub windows: ExtractWindows,
    pub paths: ExtractPaths,
    pub schemas: Vec<SchemaVersion>,
    pub counts: ExtractCounts,
    pub reconciliation: ReconciliationSummary,
    pub warnings: Vec<String>,
}
