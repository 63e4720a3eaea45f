use super::*;

const RUN_COLUMNS: &str = "
    r.run_id, r.doc_title, r.source_path, r.source_sha256, r.backend, r.page_count,
    r.completed_at, r.total_ids, r.matches, r.mismatches,
    (SELECT COUNT(*) FROM toc_entries t WHERE t.run_id = r.run_id),
    (SELECT COUNT(*) FROM sections s WHERE s.run_id = r.run_id)
";

fn run_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<IndexedRun> {
    Ok(IndexedRun {
        run_id: row.get(0)?,
        doc_title: row.get(1)?,
        source_path: row.get(2)?,
        source_sha256: row.get(3)?,
        backend: row.get(4)?,
        page_count: row.get(5)?,
        completed_at: row.get(6)?,
        reconciliation: ReconciliationSummary {
            total_ids: row.get::<_, i64>(7)? as usize,
            matches: row.get::<_, i64>(8)? as usize,
            mismatches: row.get::<_, i64>(9)? as usize,
        },
        toc_entries: row.get(10)?,
        sections: row.get(11)?,
    })
}

pub fn latest_run(connection: &Connection) -> Result<Option<IndexedRun>> {
    let sql = format!(
        "SELECT {RUN_COLUMNS} FROM runs r ORDER BY r.completed_at DESC, r.run_id DESC LIMIT 1"
    );
    connection
        .query_row(&sql, [], run_from_row)
        .optional()
        .context("failed to load latest run")
}

/// Loads the named run, or the most recent one when no id is given.
pub fn resolve_run(connection: &Connection, run_id: Option<&str>) -> Result<IndexedRun> {
    let Some(run_id) = run_id else {
        return latest_run(connection)?.context("index contains no runs");
    };

    let sql = format!("SELECT {RUN_COLUMNS} FROM runs r WHERE r.run_id = ?1");
    connection
        .query_row(&sql, params![run_id], run_from_row)
        .optional()
        .with_context(|| format!("failed to load run {run_id}"))?
        .with_context(|| format!("run {run_id} is not in the index"))
}

pub fn fetch_section(
    connection: &Connection,
    run: &IndexedRun,
    section_id: &str,
) -> Result<Option<Section>> {
    connection
        .query_row(
            "
            SELECT section_id, title, page, content
            FROM sections
            WHERE run_id = ?1 AND section_id = ?2
            ",
            params![run.run_id, section_id],
            |row| {
                Ok(Section {
                    doc_title: run.doc_title.clone(),
                    section_id: row.get(0)?,
                    title: row.get(1)?,
                    page: row.get(2)?,
                    content: row.get(3)?,
                    tables: None,
                    figures: None,
                })
            },
        )
        .optional()
        .with_context(|| format!("failed to load section {section_id}"))
}

/// Case-insensitive substring match on title or content, in document order.
pub fn search_sections(
    connection: &Connection,
    run: &IndexedRun,
    query: &str,
    limit: usize,
) -> Result<Vec<SearchHit>> {
    let needle = query.to_lowercase();
    let mut statement = connection.prepare(
        "
        SELECT section_id, title, page, content
        FROM sections
        WHERE run_id = ?1
        ORDER BY order_index
        ",
    )?;

    let rows = statement.query_map(params![run.run_id], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, u32>(2)?,
            row.get::<_, String>(3)?,
        ))
    })?;

    let mut hits = Vec::new();
    for row in rows {
        if hits.len() >= limit {
            break;
        }
        let (section_id, title, page, content) = row?;
        if !title.to_lowercase().contains(&needle) && !content.to_lowercase().contains(&needle) {
            continue;
        }

        let content_preview = if content.chars().count() > SEARCH_PREVIEW_CHARS {
            format!("{}...", truncate_chars(&content, SEARCH_PREVIEW_CHARS))
        } else {
            content
        };
        hits.push(SearchHit {
            section_id,
            title,
            page,
            content_preview,
        });
    }

    Ok(hits)
}

/// Number of TOC entries per hierarchy level, shallowest first.
pub fn level_distribution(connection: &Connection, run: &IndexedRun) -> Result<Vec<(u32, i64)>> {
    let mut statement = connection.prepare(
        "
        SELECT level, COUNT(*)
        FROM toc_entries
        WHERE run_id = ?1
        GROUP BY level
        ORDER BY level
        ",
    )?;

    let rows = statement
        .query_map(params![run.run_id], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<rusqlite::Result<Vec<(u32, i64)>>>()
        .context("failed to read level distribution")?;
    Ok(rows)
}
