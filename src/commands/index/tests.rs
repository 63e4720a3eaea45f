use super::*;
use crate::pipeline::{ExtractionRun, PipelineConfig, TocScanWindow};
use crate::source::PagedText;

fn sample_run() -> ExtractionRun {
    let pages = PagedText::new(vec![
        [
            "Contents",
            "1 Introduction 2",
            "1.1 Scope 2",
            "2 Power Negotiation 3",
            "2.1 Contract Messages 3",
        ]
        .join("\n"),
        "The introduction explains the scope of power delivery.".to_string(),
        format!("Negotiation {}", "detail ".repeat(60)),
    ]);
    let config = PipelineConfig {
        doc_title: "Doc".to_string(),
        toc_scan: TocScanWindow {
            start_page: 0,
            end_page: 1,
        },
        ..PipelineConfig::default()
    };
    ExtractionRun::execute(&pages, &config).expect("fixture run succeeds")
}

fn indexed_connection(run_id: &str, completed_at: &str) -> Connection {
    let mut connection = Connection::open_in_memory().expect("in-memory sqlite");
    ensure_schema(&connection).expect("schema applies");
    insert_run(
        &mut connection,
        &RunDescriptor {
            run_id,
            source_path: "doc.txt",
            source_sha256: "abc",
            backend: "text",
            completed_at,
        },
        "Doc",
        &sample_run(),
    )
    .expect("run indexes");
    connection
}

#[test]
fn latest_run_reports_counts_and_summary() {
    let connection = indexed_connection("run-1", "2026-01-01T00:00:00Z");

    let run = latest_run(&connection)
        .expect("query succeeds")
        .expect("run present");
    assert_eq!(run.run_id, "run-1");
    assert_eq!(run.toc_entries, 4);
    assert_eq!(run.sections, 4);
    assert_eq!(run.page_count, 3);
    assert_eq!(
        run.reconciliation,
        ReconciliationSummary {
            total_ids: 4,
            matches: 4,
            mismatches: 0
        }
    );
}

#[test]
fn reindexing_a_run_replaces_its_rows() {
    let mut connection = indexed_connection("run-1", "2026-01-01T00:00:00Z");
    insert_run(
        &mut connection,
        &RunDescriptor {
            run_id: "run-1",
            source_path: "doc.txt",
            source_sha256: "abc",
            backend: "text",
            completed_at: "2026-01-02T00:00:00Z",
        },
        "Doc",
        &sample_run(),
    )
    .expect("reindex succeeds");

    let run = resolve_run(&connection, Some("run-1")).expect("run present");
    assert_eq!(run.sections, 4);
    assert_eq!(run.completed_at, "2026-01-02T00:00:00Z");
}

#[test]
fn resolve_run_errors_for_unknown_or_empty_index() {
    let connection = indexed_connection("run-1", "2026-01-01T00:00:00Z");
    assert!(resolve_run(&connection, Some("run-404")).is_err());

    let empty = Connection::open_in_memory().expect("in-memory sqlite");
    ensure_schema(&empty).expect("schema applies");
    assert!(resolve_run(&empty, None).is_err());
    assert!(latest_run(&empty).expect("query succeeds").is_none());
}

#[test]
fn fetch_section_returns_stored_content() {
    let connection = indexed_connection("run-1", "2026-01-01T00:00:00Z");
    let run = resolve_run(&connection, None).expect("run present");

    let section = fetch_section(&connection, &run, "1.1")
        .expect("query succeeds")
        .expect("section present");
    assert_eq!(section.title, "Scope");
    assert_eq!(section.doc_title, "Doc");
    assert!(section.content.starts_with("The introduction"));

    assert!(
        fetch_section(&connection, &run, "9")
            .expect("query succeeds")
            .is_none()
    );
}

#[test]
fn search_matches_titles_and_content_case_insensitively() {
    let connection = indexed_connection("run-1", "2026-01-01T00:00:00Z");
    let run = resolve_run(&connection, None).expect("run present");

    let hits = search_sections(&connection, &run, "SCOPE", 10).expect("search succeeds");
    let ids = hits
        .iter()
        .map(|hit| hit.section_id.as_str())
        .collect::<Vec<&str>>();
    assert_eq!(ids, vec!["1.1"]);

    let hits = search_sections(&connection, &run, "detail", 10).expect("search succeeds");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].section_id, "2.1");
    assert!(hits[0].content_preview.ends_with("..."));
    assert_eq!(hits[0].content_preview.chars().count(), 203);

    let limited = search_sections(&connection, &run, "o", 1).expect("search succeeds");
    assert_eq!(limited.len(), 1);
}

#[test]
fn level_distribution_counts_entries_per_level() {
    let connection = indexed_connection("run-1", "2026-01-01T00:00:00Z");
    let run = resolve_run(&connection, None).expect("run present");
    assert_eq!(
        level_distribution(&connection, &run).expect("query succeeds"),
        vec![(1, 2), (2, 2)]
    );
}
