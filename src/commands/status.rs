use anyhow::Result;
use tracing::{info, warn};

use crate::cli::StatusArgs;
use crate::commands::index;

pub fn run(args: StatusArgs) -> Result<()> {
    let db_path = args
        .db_path
        .clone()
        .unwrap_or_else(|| index::default_db_path(&args.cache_root));

    info!(cache_root = %args.cache_root.display(), "status requested");

    if !db_path.exists() {
        warn!(path = %db_path.display(), "index database missing");
        return Ok(());
    }

    let connection = index::open_read_only(&db_path)?;
    let Some(run) = index::latest_run(&connection)? else {
        warn!(path = %db_path.display(), "index contains no runs");
        return Ok(());
    };

    info!(
        run_id = %run.run_id,
        doc_title = %run.doc_title,
        source = %run.source_path,
        sha256 = %run.source_sha256,
        backend = %run.backend,
        pages = run.page_count,
        completed_at = %run.completed_at,
        "latest run"
    );
    info!(
        toc_entries = run.toc_entries,
        sections = run.sections,
        total_ids = run.reconciliation.total_ids,
        matches = run.reconciliation.matches,
        mismatches = run.reconciliation.mismatches,
        "latest run counts"
    );

    for (level, count) in index::level_distribution(&connection, &run)? {
        info!(level, count, "TOC entries per level");
    }

    Ok(())
}
