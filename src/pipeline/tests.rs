use super::*;
use crate::model::{ReconciliationStatus, ReconciliationSummary, Section, TocEntry};
use crate::source::{PageTextSource, PagedText};

fn parser() -> TocLineParser {
    TocLineParser::new("Doc").expect("TOC regex compiles")
}

fn entry(section_id: &str, page: u32) -> TocEntry {
    parser()
        .parse(&format!("{section_id} Heading {page}"))
        .expect("fixture line parses")
}

fn section(section_id: &str) -> Section {
    Section {
        doc_title: "Doc".to_string(),
        section_id: section_id.to_string(),
        title: "Heading".to_string(),
        page: 1,
        content: "...".to_string(),
        tables: None,
        figures: None,
    }
}

fn pages(texts: &[&str]) -> PagedText {
    PagedText::new(texts.iter().map(|text| text.to_string()).collect())
}

#[test]
fn parse_derives_level_and_parent_from_numeral() {
    let parsed = parser().parse("1.2 Title 33").expect("line is a TOC entry");
    assert_eq!(parsed.section_id, "1.2");
    assert_eq!(parsed.title, "Title");
    assert_eq!(parsed.page, 33);
    assert_eq!(parsed.level, 2);
    assert_eq!(parsed.parent_id.as_deref(), Some("1"));
    assert_eq!(parsed.full_path, "1.2 Title");
    assert_eq!(parsed.doc_title, "Doc");
}

#[test]
fn parse_top_level_has_no_parent() {
    let parsed = parser().parse("  7 Overview 120  ").expect("line is a TOC entry");
    assert_eq!(parsed.level, 1);
    assert!(parsed.parent_id.is_none());
}

#[test]
fn parse_uses_last_integer_as_page() {
    let parsed = parser()
        .parse("6.4.1 Source Capabilities 2 Message 131")
        .expect("line is a TOC entry");
    assert_eq!(parsed.title, "Source Capabilities 2 Message");
    assert_eq!(parsed.page, 131);
    assert_eq!(parsed.level, 3);
    assert_eq!(parsed.parent_id.as_deref(), Some("6.4"));
}

#[test]
fn parse_rejects_headers_footers_and_noise() {
    let parser = parser();
    for line in [
        "",
        "   ",
        "Table of Contents 3",
        "CONTENTS 4",
        "Page 17",
        "Introduction 1",
        "1. Introduction 1",
        "1..2 Broken 4",
        "1.2 Title",
        "1.2 33",
        "1.2 Zero page 0",
    ] {
        assert!(parser.parse(line).is_none(), "line should be rejected: {line:?}");
    }
}

#[test]
fn level_and_parent_invariant_holds_for_accepted_lines() {
    let parser = parser();
    for line in ["1 A 1", "2.4 B 9", "2.4.1 C 10", "10.12.3.4 D 400"] {
        let parsed = parser.parse(line).expect("line is a TOC entry");
        assert_eq!(
            parsed.level as usize,
            parsed.section_id.matches('.').count() + 1
        );
        let expected_parent = parsed
            .section_id
            .rsplit_once('.')
            .map(|(parent, _)| parent.to_string());
        assert_eq!(parsed.parent_id, expected_parent);
        validate_entry(&parsed).expect("parsed entries are consistent");
    }
}

#[test]
fn derive_tags_matches_keyword_groups() {
    assert_eq!(
        derive_tags("Power Supply and Cable Connector Tests"),
        Some(vec![
            "power".to_string(),
            "cable".to_string(),
            "testing".to_string()
        ])
    );
    assert_eq!(
        derive_tags("Source Capabilities Message"),
        Some(vec!["protocol".to_string(), "device".to_string()])
    );
    assert_eq!(derive_tags("Introduction"), None);
}

#[test]
fn numeral_components_rejects_non_numerals() {
    assert_eq!(numeral_components("2.10.1").expect("valid"), vec![2, 10, 1]);
    for bad in ["", "A.1", "1.", ".1", "1..2", "1.x", "99999999999999999999999"] {
        assert!(
            matches!(
                numeral_components(bad),
                Err(PipelineError::MalformedIdentifier(_))
            ),
            "should be malformed: {bad:?}"
        );
    }
}

#[test]
fn hierarchy_keeps_last_duplicate_in_its_own_position() {
    let entries = vec![entry("1", 1), entry("2", 3), entry("1", 5), entry("3", 7)];

    let report = build_hierarchy(entries).expect("entries are valid");
    let ids = report
        .entries
        .iter()
        .map(|entry| (entry.section_id.as_str(), entry.page))
        .collect::<Vec<_>>();
    assert_eq!(ids, vec![("2", 3), ("1", 5), ("3", 7)]);
    assert_eq!(report.duplicates_dropped, vec!["1".to_string()]);
}

#[test]
fn hierarchy_allows_orphans() {
    let entries = vec![entry("1", 1), entry("2.1", 3), entry("2.1.1", 4)];

    let report = build_hierarchy(entries).expect("orphans are not errors");
    assert_eq!(report.entries.len(), 3);
    assert_eq!(report.orphans, vec!["2.1".to_string()]);
}

#[test]
fn hierarchy_rejects_inconsistent_parent() {
    let mut broken = entry("3.2", 4);
    broken.parent_id = Some("2".to_string());

    let error = build_hierarchy(vec![broken]).expect_err("parent disagrees with identifier");
    assert!(matches!(error, PipelineError::HierarchyMismatch { ref section_id, .. } if section_id == "3.2"));
}

#[test]
fn hierarchy_rejects_inconsistent_level() {
    let mut broken = entry("3.2", 4);
    broken.level = 1;
    assert!(matches!(
        validate_entry(&broken),
        Err(PipelineError::HierarchyMismatch { .. })
    ));
}

#[test]
fn section_ranges_follow_next_declared_page() {
    let entries = vec![entry("1", 1), entry("2", 3)];
    let ranges = section_ranges(&entries, 5, SectionWindow::default());
    assert_eq!(
        ranges,
        vec![PageRange { start: 0, end: 2 }, PageRange { start: 2, end: 5 }]
    );
}

#[test]
fn section_ranges_apply_floor_and_ceiling() {
    let entries = vec![entry("1", 1), entry("2", 3), entry("3", 9)];
    let window = SectionWindow {
        floor: Some(1),
        ceiling: Some(6),
    };
    let ranges = section_ranges(&entries, 10, window);
    assert_eq!(
        ranges,
        vec![
            PageRange { start: 1, end: 2 },
            PageRange { start: 2, end: 6 },
            PageRange { start: 8, end: 6 },
        ]
    );
    assert!(ranges[2].is_empty());
}

#[test]
fn map_sections_joins_pages_and_skips_empty_ones() {
    let source = pages(&["intro", "", "more intro", "body"]);
    let entries = vec![entry("1", 1), entry("2", 4)];

    let sections =
        map_sections(&source, &entries, source.page_count(), SectionWindow::default())
            .expect("ranges are within the document");
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].content, "intro\nmore intro");
    assert_eq!(sections[1].content, "body");
    assert_eq!(sections[1].section_id, "2");
    assert!(sections[1].tables.is_none());
    assert!(sections[1].figures.is_none());
}

#[test]
fn map_sections_keeps_degenerate_ranges_with_empty_content() {
    let source = pages(&["a", "b"]);
    // last entry declared beyond the end of the document
    let entries = vec![entry("1", 1), entry("1.1", 1), entry("2", 9)];

    let sections =
        map_sections(&source, &entries, source.page_count(), SectionWindow::default())
            .expect("degenerate ranges are not errors");
    assert_eq!(sections.len(), 3);
    assert_eq!(sections[0].content, "");
    assert_eq!(sections[1].content, "a\nb");
    assert_eq!(sections[2].content, "");
}

#[test]
fn map_sections_fails_when_page_count_exceeds_source() {
    let source = pages(&["a"]);
    let entries = vec![entry("1", 1)];
    let error = map_sections(&source, &entries, 3, SectionWindow::default())
        .expect_err("range reaches past the document");
    assert!(matches!(
        error.downcast_ref::<PipelineError>(),
        Some(PipelineError::PageOutOfRange { .. })
    ));
}

#[test]
fn truncation_is_by_characters_at_one_thousand() {
    let long = "é".repeat(1001);
    let exact = "x".repeat(1000);
    let short = "y".repeat(999);

    assert_eq!(truncate_chars(&long, CONTENT_PREVIEW_CHARS).chars().count(), 1000);
    assert_eq!(truncate_chars(&exact, CONTENT_PREVIEW_CHARS), exact);
    assert_eq!(truncate_chars(&short, CONTENT_PREVIEW_CHARS), short);
}

#[test]
fn mapped_content_never_exceeds_preview_length() {
    let page = "z".repeat(700);
    let source = pages(&[&page, &page]);
    let sections = map_sections(
        &source,
        &[entry("1", 1)],
        source.page_count(),
        SectionWindow::default(),
    )
    .expect("range is valid");
    assert_eq!(sections[0].content.chars().count(), 1000);
}

#[test]
fn compare_reports_matches_and_mismatches() {
    let entries = vec![entry("1", 1), entry("2", 3)];
    let sections = vec![section("1"), section("2.1")];

    let records = compare(&entries, &sections).expect("identifiers are numerals");
    let rows = records
        .iter()
        .map(|record| (record.section_id.as_str(), record.status))
        .collect::<Vec<_>>();
    assert_eq!(
        rows,
        vec![
            ("1", ReconciliationStatus::Match),
            ("2", ReconciliationStatus::Mismatch),
            ("2.1", ReconciliationStatus::Mismatch),
        ]
    );
    assert!(records[1].in_toc && !records[1].in_sections);
    assert!(!records[2].in_toc && records[2].in_sections);

    assert_eq!(
        summarize(&records),
        ReconciliationSummary {
            total_ids: 3,
            matches: 1,
            mismatches: 2
        }
    );
}

#[test]
fn compare_orders_by_integer_components() {
    let entries = vec![entry("2.10", 9), entry("10", 20), entry("2.9", 8), entry("2", 7)];
    let records = compare(&entries, &[]).expect("identifiers are numerals");
    let ids = records
        .iter()
        .map(|record| record.section_id.as_str())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["2", "2.9", "2.10", "10"]);
}

#[test]
fn compare_rejects_malformed_identifiers() {
    let error = compare(&[], &[section("A.1")]).expect_err("non-numeral identifier");
    assert!(matches!(error, PipelineError::MalformedIdentifier(ref id) if id == "A.1"));
}

#[test]
fn empty_input_summarizes_to_zero() {
    let records = compare(&[], &[]).expect("nothing to compare");
    assert!(records.is_empty());
    assert_eq!(summarize(&records), ReconciliationSummary::default());
}

fn sample_document() -> PagedText {
    let mut texts = vec!["cover".to_string(); 13];
    texts.push(
        [
            "Table of Contents",
            "1 Introduction 15",
            "1.1 Scope 15",
            "2 Power Delivery Overview 16",
            "2.1 Cable Assemblies 17",
            "Page 14",
        ]
        .join("\n"),
    );
    texts.push("Introduction text".to_string());
    texts.push("Overview text".to_string());
    texts.push("Cable text".to_string());
    texts.push("Cable appendix".to_string());
    PagedText::new(texts)
}

#[test]
fn execute_runs_the_whole_pipeline() {
    let source = sample_document();
    let run = ExtractionRun::execute(&source, &PipelineConfig::default()).expect("run succeeds");

    let ids = run
        .entries
        .iter()
        .map(|entry| entry.section_id.as_str())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["1", "1.1", "2", "2.1"]);
    assert_eq!(run.sections.len(), 4);
    assert_eq!(run.sections[0].content, "");
    assert_eq!(run.sections[1].content, "Introduction text");
    assert_eq!(run.sections[3].content, "Cable text\nCable appendix");
    assert_eq!(
        run.entries[2].tags,
        Some(vec!["power".to_string(), "delivery".to_string()])
    );
    assert_eq!(run.summary.total_ids, 4);
    assert_eq!(run.summary.matches, 4);
    // body pages inside the scan window are scanned and rejected too
    assert_eq!(run.stats.toc_lines_scanned, 10);
    assert_eq!(run.stats.toc_lines_rejected, 6);
    assert_eq!(run.stats.empty_sections, 1);
    assert_eq!(run.stats.page_count, 18);
}

#[test]
fn execute_is_idempotent() {
    let source = sample_document();
    let config = PipelineConfig::default();
    let first = ExtractionRun::execute(&source, &config).expect("first run");
    let second = ExtractionRun::execute(&source, &config).expect("second run");
    assert_eq!(first, second);
}

#[test]
fn execute_without_toc_lines_yields_empty_outputs() {
    let source = pages(&["nothing here", "still nothing"]);
    let run = ExtractionRun::execute(&source, &PipelineConfig::default()).expect("run succeeds");
    assert!(run.entries.is_empty());
    assert!(run.sections.is_empty());
    assert!(run.records.is_empty());
    assert_eq!(run.summary, ReconciliationSummary::default());
}
