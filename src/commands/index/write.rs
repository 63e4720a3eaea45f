use super::*;

/// Stores one run in a single transaction; re-indexing a run id replaces it.
pub fn insert_run(
    connection: &mut Connection,
    descriptor: &RunDescriptor<'_>,
    doc_title: &str,
    run: &ExtractionRun,
) -> Result<()> {
    let tx = connection.transaction()?;

    for table in ["reconciliation", "sections", "toc_entries", "runs"] {
        tx.execute(
            &format!("DELETE FROM {table} WHERE run_id = ?1"),
            params![descriptor.run_id],
        )
        .with_context(|| format!("failed to clear {table} for run {}", descriptor.run_id))?;
    }
    tx.execute(
        "
        INSERT INTO runs(
          run_id, doc_title, source_path, source_sha256, backend, page_count,
          completed_at, total_ids, matches, mismatches
        )
        VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        ",
        params![
            descriptor.run_id,
            doc_title,
            descriptor.source_path,
            descriptor.source_sha256,
            descriptor.backend,
            run.stats.page_count as i64,
            descriptor.completed_at,
            run.summary.total_ids as i64,
            run.summary.matches as i64,
            run.summary.mismatches as i64,
        ],
    )
    .context("failed to insert run row")?;

    {
        let mut statement = tx.prepare(
            "
            INSERT INTO toc_entries(
              run_id, order_index, section_id, title, page, level, parent_id, full_path, tags
            )
            VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ",
        )?;
        for (index, entry) in run.entries.iter().enumerate() {
            let tags = entry
                .tags
                .as_ref()
                .map(serde_json::to_string)
                .transpose()
                .context("failed to serialize tags")?;
            statement
                .execute(params![
                    descriptor.run_id,
                    index as i64,
                    &entry.section_id,
                    &entry.title,
                    entry.page,
                    entry.level,
                    &entry.parent_id,
                    &entry.full_path,
                    tags,
                ])
                .with_context(|| format!("failed to insert TOC entry {}", entry.section_id))?;
        }
    }

    {
        let mut statement = tx.prepare(
            "
            INSERT INTO sections(run_id, order_index, section_id, title, page, content)
            VALUES(?1, ?2, ?3, ?4, ?5, ?6)
            ",
        )?;
        for (index, section) in run.sections.iter().enumerate() {
            statement
                .execute(params![
                    descriptor.run_id,
                    index as i64,
                    &section.section_id,
                    &section.title,
                    section.page,
                    &section.content,
                ])
                .with_context(|| format!("failed to insert section {}", section.section_id))?;
        }
    }

    {
        let mut statement = tx.prepare(
            "
            INSERT INTO reconciliation(
              run_id, order_index, section_id, in_toc, in_sections, status
            )
            VALUES(?1, ?2, ?3, ?4, ?5, ?6)
            ",
        )?;
        for (index, record) in run.records.iter().enumerate() {
            statement.execute(params![
                descriptor.run_id,
                index as i64,
                &record.section_id,
                record.in_toc,
                record.in_sections,
                record.status.as_str(),
            ])?;
        }
    }

    tx.commit()?;
    Ok(())
}
