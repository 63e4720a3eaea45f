use super::*;

pub fn run(args: ExtractArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("run-{}", utc_compact_string(started_ts));

    let config = pipeline_config(&args)?;
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| args.cache_root.join("runs").join(&run_id));
    let outputs = OutputPaths::new(&output_dir, &args.output_prefix);
    let db_path = if args.no_index {
        None
    } else {
        Some(
            args.db_path
                .clone()
                .unwrap_or_else(|| index::default_db_path(&args.cache_root)),
        )
    };

    info!(
        pdf = %args.pdf.display(),
        backend = args.backend.as_str(),
        run_id = %run_id,
        "starting extraction"
    );

    let source = open_source(args.backend, &args.pdf)
        .with_context(|| format!("failed to open {}", args.pdf.display()))?;
    let source_sha256 = sha256_file(&args.pdf)?;

    // A previous run's manifest must not outlive a failed rerun into the same directory.
    retract_manifest(&outputs.manifest)?;

    let run = ExtractionRun::execute(source.as_ref(), &config)
        .with_context(|| format!("extraction failed for {}", args.pdf.display()))?;

    let completed_at = now_utc_string();
    let source_path = args.pdf.display().to_string();
    if let Some(db_path) = &db_path {
        if let Some(parent) = db_path.parent() {
            ensure_directory(parent)?;
        }
        let mut connection = Connection::open(db_path)
            .with_context(|| format!("failed to open {}", db_path.display()))?;
        index::configure_connection(&connection)?;
        index::ensure_schema(&connection)?;
        index::insert_run(
            &mut connection,
            &RunDescriptor {
                run_id: &run_id,
                source_path: &source_path,
                source_sha256: &source_sha256,
                backend: args.backend.as_str(),
                completed_at: &completed_at,
            },
            &config.doc_title,
            &run,
        )
        .with_context(|| format!("failed to index run {run_id}"))?;
        info!(path = %db_path.display(), "indexed run");
    }

    write_jsonl(&outputs.toc, &run.entries)?;
    write_jsonl(&outputs.sections, &run.sections)?;
    write_jsonl(&outputs.reconciliation, &run.records)?;
    write_jsonl(&outputs.summary, &[run.summary])?;

    let warnings = collect_warnings(&run);
    for warning in &warnings {
        warn!("{warning}");
    }

    let manifest = ExtractRunManifest {
        manifest_version: 1,
        run_id: run_id.clone(),
        status: "completed".to_string(),
        started_at,
        updated_at: completed_at,
        command: render_extract_command(&args),
        doc_title: config.doc_title.clone(),
        source_path,
        source_sha256,
        backend: args.backend.as_str().to_string(),
        windows: ExtractWindows {
            toc_start_page: config.toc_scan.start_page,
            toc_end_page: config.toc_scan.end_page,
            section_floor_page: config.sections.floor,
            section_ceiling_page: config.sections.ceiling,
        },
        paths: ExtractPaths {
            cache_root: args.cache_root.display().to_string(),
            output_dir: output_dir.display().to_string(),
            toc_path: outputs.toc.display().to_string(),
            sections_path: outputs.sections.display().to_string(),
            reconciliation_path: outputs.reconciliation.display().to_string(),
            summary_path: outputs.summary.display().to_string(),
            db_path: db_path.as_ref().map(|path| path.display().to_string()),
        },
        schemas: schema_versions(),
        counts: ExtractCounts {
            page_count: run.stats.page_count,
            toc_lines_scanned: run.stats.toc_lines_scanned,
            toc_lines_rejected: run.stats.toc_lines_rejected,
            toc_entries: run.entries.len(),
            duplicate_ids_dropped: run.stats.duplicate_ids_dropped,
            orphan_entries: run.stats.orphan_entries,
            sections: run.sections.len(),
            empty_sections: run.stats.empty_sections,
        },
        reconciliation: run.summary,
        warnings,
    };

    // Written last: its presence marks the run as complete.
    write_json_pretty(&outputs.manifest, &manifest)?;

    info!(path = %outputs.manifest.display(), "wrote run manifest");
    info!(
        entries = run.entries.len(),
        sections = run.sections.len(),
        mismatches = run.summary.mismatches,
        "extraction completed"
    );

    Ok(())
}

pub(super) struct OutputPaths {
    pub toc: PathBuf,
    pub sections: PathBuf,
    pub reconciliation: PathBuf,
    pub summary: PathBuf,
    pub manifest: PathBuf,
}

impl OutputPaths {
    pub fn new(output_dir: &Path, prefix: &str) -> Self {
        Self {
            toc: output_dir.join(format!("{prefix}_toc.jsonl")),
            sections: output_dir.join(format!("{prefix}_spec.jsonl")),
            reconciliation: output_dir.join(format!("{prefix}_validation.jsonl")),
            summary: output_dir.join(format!("{prefix}_validation_summary.jsonl")),
            manifest: output_dir.join(format!("{prefix}_run_manifest.json")),
        }
    }
}

fn retract_manifest(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "removed previous run manifest");
            Ok(())
        }
        Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
        Err(error) => Err(error)
            .with_context(|| format!("failed to remove stale manifest {}", path.display())),
    }
}

/// Maps CLI page numbers onto pipeline windows. Section bounds arrive 1-based
/// and inclusive; the pipeline works on 0-based half-open ranges.
pub(super) fn pipeline_config(args: &ExtractArgs) -> Result<PipelineConfig> {
    if args.toc_start_page > args.toc_end_page {
        bail!(
            "--toc-start-page {} is after --toc-end-page {}",
            args.toc_start_page,
            args.toc_end_page
        );
    }

    let floor = match args.section_start_page {
        Some(0) => bail!("--section-start-page is 1-based and must be at least 1"),
        Some(page) => Some(page - 1),
        None => None,
    };
    let ceiling = match args.section_end_page {
        Some(0) => bail!("--section-end-page is 1-based and must be at least 1"),
        Some(page) => Some(page),
        None => None,
    };
    if let (Some(start), Some(end)) = (args.section_start_page, args.section_end_page) {
        if start > end {
            bail!("--section-start-page {start} is after --section-end-page {end}");
        }
    }

    Ok(PipelineConfig {
        doc_title: args.doc_title.clone(),
        toc_scan: TocScanWindow {
            start_page: args.toc_start_page,
            end_page: args.toc_end_page,
        },
        sections: SectionWindow { floor, ceiling },
    })
}

fn collect_warnings(run: &ExtractionRun) -> Vec<String> {
    let mut warnings = Vec::new();

    if run.entries.is_empty() {
        warnings.push("no TOC entries found in the scan window".to_string());
    }
    if run.stats.duplicate_ids_dropped > 0 {
        warnings.push(format!(
            "{} duplicate section identifiers resolved by keeping the later entry",
            run.stats.duplicate_ids_dropped
        ));
    }
    if run.stats.orphan_entries > 0 {
        warnings.push(format!(
            "{} TOC entries reference a parent that is not in the TOC",
            run.stats.orphan_entries
        ));
    }
    if run.stats.empty_sections > 0 {
        warnings.push(format!(
            "{} sections have no extracted content",
            run.stats.empty_sections
        ));
    }

    warnings
}

fn render_extract_command(args: &ExtractArgs) -> String {
    let mut command = vec![
        "tocmap".to_string(),
        "extract".to_string(),
        "--pdf".to_string(),
        args.pdf.display().to_string(),
        "--cache-root".to_string(),
        args.cache_root.display().to_string(),
        "--backend".to_string(),
        args.backend.as_str().to_string(),
        "--title".to_string(),
        format!("{:?}", args.doc_title),
        "--toc-start-page".to_string(),
        args.toc_start_page.to_string(),
        "--toc-end-page".to_string(),
        args.toc_end_page.to_string(),
    ];

    if let Some(path) = &args.output_dir {
        command.push("--output-dir".to_string());
        command.push(path.display().to_string());
    }
    if args.output_prefix != "tocmap" {
        command.push("--output-prefix".to_string());
        command.push(args.output_prefix.clone());
    }
    if let Some(path) = &args.db_path {
        command.push("--db-path".to_string());
        command.push(path.display().to_string());
    }
    if args.no_index {
        command.push("--no-index".to_string());
    }
    if let Some(page) = args.section_start_page {
        command.push("--section-start-page".to_string());
        command.push(page.to_string());
    }
    if let Some(page) = args.section_end_page {
        command.push("--section-end-page".to_string());
        command.push(page.to_string());
    }

    command.join(" ")
}
