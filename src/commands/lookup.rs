use std::io::{self, Write};

use anyhow::{Context, Result, bail};
use serde::Serialize;

use crate::cli::{SearchArgs, SectionArgs};
use crate::commands::index::{self, SearchHit};

pub fn run_section(args: SectionArgs) -> Result<()> {
    let db_path = args
        .db_path
        .clone()
        .unwrap_or_else(|| index::default_db_path(&args.cache_root));
    let connection = index::open_read_only(&db_path)?;
    let run = index::resolve_run(&connection, args.run_id.as_deref())?;

    let Some(section) = index::fetch_section(&connection, &run, &args.section_id)? else {
        bail!(
            "section {} not found in run {}",
            args.section_id,
            run.run_id
        );
    };

    let mut output = io::BufWriter::new(io::stdout().lock());
    if args.json {
        serde_json::to_writer_pretty(&mut output, &section)
            .context("failed to serialize section json output")?;
        writeln!(output)?;
    } else {
        writeln!(output, "{} {}", section.section_id, section.title)?;
        writeln!(output, "Document: {}", section.doc_title)?;
        writeln!(output, "Page: {}", section.page)?;
        writeln!(output, "Run: {}", run.run_id)?;
        writeln!(output)?;
        if section.content.is_empty() {
            writeln!(output, "(no extracted content)")?;
        } else {
            writeln!(output, "{}", section.content)?;
        }
    }
    output.flush()?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct SearchResponse {
    query: String,
    run_id: String,
    limit: usize,
    total_found: usize,
    results: Vec<SearchHit>,
}

pub fn run_search(args: SearchArgs) -> Result<()> {
    let db_path = args
        .db_path
        .clone()
        .unwrap_or_else(|| index::default_db_path(&args.cache_root));
    let connection = index::open_read_only(&db_path)?;
    let run = index::resolve_run(&connection, args.run_id.as_deref())?;
    let results = index::search_sections(&connection, &run, &args.query, args.limit)?;

    let mut output = io::BufWriter::new(io::stdout().lock());
    if args.json {
        let response = SearchResponse {
            query: args.query.clone(),
            run_id: run.run_id.clone(),
            limit: args.limit,
            total_found: results.len(),
            results,
        };
        serde_json::to_writer_pretty(&mut output, &response)
            .context("failed to serialize search json output")?;
        writeln!(output)?;
    } else {
        writeln!(output, "Query: {}", args.query)?;
        writeln!(output, "Run: {}", run.run_id)?;
        writeln!(output, "Results: {}", results.len())?;
        for (rank, hit) in results.iter().enumerate() {
            writeln!(
                output,
                "{}.\t{}\t{}\tpage {}",
                rank + 1,
                hit.section_id,
                hit.title,
                hit.page
            )?;
            if !hit.content_preview.is_empty() {
                writeln!(output, "\t{}", hit.content_preview.replace('\n', " "))?;
            }
        }
    }
    output.flush()?;
    Ok(())
}
