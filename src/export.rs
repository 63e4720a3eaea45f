//! JSON Lines export and re-import for every record kind a run produces.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::model::{
    ReconciliationRecord, ReconciliationSummary, SchemaVersion, Section, TocEntry,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Toc,
    Section,
    ReconciliationDetail,
    ReconciliationSummary,
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Toc => "toc",
            Self::Section => "section",
            Self::ReconciliationDetail => "reconciliation_detail",
            Self::ReconciliationSummary => "reconciliation_summary",
        }
    }
}

/// A record with a fixed, versioned JSON Lines schema.
pub trait JsonlRecord: Serialize + DeserializeOwned {
    const KIND: RecordKind;
    const SCHEMA_VERSION: u32;
}

impl JsonlRecord for TocEntry {
    const KIND: RecordKind = RecordKind::Toc;
    const SCHEMA_VERSION: u32 = 1;
}

impl JsonlRecord for Section {
    const KIND: RecordKind = RecordKind::Section;
    const SCHEMA_VERSION: u32 = 1;
}

impl JsonlRecord for ReconciliationRecord {
    const KIND: RecordKind = RecordKind::ReconciliationDetail;
    const SCHEMA_VERSION: u32 = 1;
}

impl JsonlRecord for ReconciliationSummary {
    const KIND: RecordKind = RecordKind::ReconciliationSummary;
    const SCHEMA_VERSION: u32 = 1;
}

pub fn schema_version<R: JsonlRecord>() -> SchemaVersion {
    SchemaVersion {
        kind: R::KIND.as_str().to_string(),
        version: R::SCHEMA_VERSION,
    }
}

pub fn schema_versions() -> Vec<SchemaVersion> {
    vec![
        schema_version::<TocEntry>(),
        schema_version::<Section>(),
        schema_version::<ReconciliationRecord>(),
        schema_version::<ReconciliationSummary>(),
    ]
}

/// Writes one JSON object per line. The file only appears at `path` once
/// every record serialized.
pub fn write_jsonl<R: JsonlRecord>(path: &Path, records: &[R]) -> Result<usize> {
    crate::util::write_atomically(path, |file| {
        let mut writer = BufWriter::new(file);
        for record in records {
            serde_json::to_writer(&mut writer, record)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()
    })?;

    info!(
        kind = R::KIND.as_str(),
        schema_version = R::SCHEMA_VERSION,
        records = records.len(),
        path = %path.display(),
        "wrote JSON Lines"
    );
    Ok(records.len())
}

pub fn read_jsonl<R: JsonlRecord>(path: &Path) -> Result<Vec<R>> {
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;

    let mut records = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("failed to read {}", path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str::<R>(&line).with_context(|| {
            format!(
                "failed to parse {} record on line {} of {}",
                R::KIND.as_str(),
                index + 1,
                path.display()
            )
        })?;
        records.push(record);
    }

    Ok(records)
}
