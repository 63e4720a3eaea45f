//! SQLite index of completed extraction runs.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rusqlite::{Connection, OpenFlags, OptionalExtension, params};
use serde::Serialize;

use crate::model::{ReconciliationSummary, Section};
use crate::pipeline::{ExtractionRun, truncate_chars};

const INDEX_SCHEMA_VERSION: &str = "0.1.0";
const SEARCH_PREVIEW_CHARS: usize = 200;

mod read;
mod schema;
#[cfg(test)]
mod tests;
mod write;

pub use read::{
    fetch_section, latest_run, level_distribution, resolve_run, search_sections,
};
pub use schema::{configure_connection, ensure_schema};
pub use write::insert_run;

pub fn default_db_path(cache_root: &Path) -> PathBuf {
    cache_root.join("tocmap_index.sqlite")
}

pub fn open_read_only(db_path: &Path) -> Result<Connection> {
    Connection::open_with_flags(
        db_path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .with_context(|| format!("failed to open {}", db_path.display()))
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct IndexedRun {
    pub run_id: String,
    pub doc_title: String,
    pub source_path: String,
    pub source_sha256: String,
    pub backend: String,
    pub page_count: i64,
    pub completed_at: String,
    pub toc_entries: i64,
    pub sections: i64,
    pub reconciliation: ReconciliationSummary,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SearchHit {
    pub section_id: String,
    pub title: String,
    pub page: u32,
    pub content_preview: String,
}

/// Metadata recorded for a run alongside its rows.
#[derive(Debug, Clone)]
pub struct RunDescriptor<'a> {
    pub run_id: &'a str,
    pub source_path: &'a str,
    pub source_sha256: &'a str,
    pub backend: &'a str,
    pub completed_at: &'a str,
}
