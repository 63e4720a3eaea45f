use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Utc;
use rusqlite::Connection;
use tracing::{debug, info, warn};

use crate::cli::ExtractArgs;
use crate::commands::index::{self, RunDescriptor};
use crate::export::{schema_versions, write_jsonl};
use crate::model::{ExtractCounts, ExtractPaths, ExtractRunManifest, ExtractWindows};
use crate::pipeline::{ExtractionRun, PipelineConfig, SectionWindow, TocScanWindow};
use crate::source::open_source;
use crate::util::{
    ensure_directory, now_utc_string, sha256_file, utc_compact_string, write_json_pretty,
};

mod run;

pub use run::run;
