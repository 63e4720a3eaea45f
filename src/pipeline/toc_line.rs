use anyhow::{Context, Result};
use regex::Regex;
use tracing::debug;

use super::numeral::numeral_components;
use crate::model::TocEntry;
use crate::source::PageTextSource;

const HEADER_PREFIXES: [&str; 3] = ["table of contents", "contents", "page"];

const TAG_GROUPS: [(&str, &[&str]); 8] = [
    ("power", &["power", "voltage", "current", "supply"]),
    ("delivery", &["delivery", "transport", "transmission"]),
    ("contract", &["contract", "negotiation", "agreement"]),
    ("protocol", &["protocol", "communication", "message"]),
    ("cable", &["cable", "connector", "wire"]),
    ("device", &["device", "source", "sink"]),
    ("charging", &["charging", "charge", "battery"]),
    ("testing", &["test", "compliance", "verification"]),
];

/// Pages scanned for TOC lines, 0-based and half-open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TocScanWindow {
    pub start_page: usize,
    pub end_page: usize,
}

impl Default for TocScanWindow {
    fn default() -> Self {
        Self {
            start_page: 13,
            end_page: 34,
        }
    }
}

pub struct TocLineParser {
    doc_title: String,
    pattern: Regex,
}

impl TocLineParser {
    pub fn new(doc_title: &str) -> Result<Self> {
        // The lazy title leaves the last whitespace-delimited integer as the page.
        let pattern = Regex::new(r"^(\d+(?:\.\d+)*)\s+(.+?)\s+(\d+)$")
            .context("failed to compile TOC line regex")?;

        Ok(Self {
            doc_title: doc_title.to_string(),
            pattern,
        })
    }

    /// Parses one raw line. `None` means the line is not a TOC entry.
    pub fn parse(&self, line: &str) -> Option<TocEntry> {
        let line = line.trim();
        if is_header_or_blank(line) {
            return None;
        }

        let captures = self.pattern.captures(line)?;
        let section_id = captures.get(1)?.as_str();
        let title = captures.get(2)?.as_str().trim();
        let page = captures.get(3)?.as_str().parse::<u32>().ok()?;

        if title.is_empty() || page == 0 {
            return None;
        }
        let components = numeral_components(section_id).ok()?;

        Some(TocEntry {
            doc_title: self.doc_title.clone(),
            section_id: section_id.to_string(),
            title: title.to_string(),
            page,
            level: components.len() as u32,
            parent_id: section_id
                .rsplit_once('.')
                .map(|(parent, _)| parent.to_string()),
            full_path: format!("{section_id} {title}"),
            tags: derive_tags(title),
        })
    }
}

fn is_header_or_blank(line: &str) -> bool {
    if line.is_empty() {
        return true;
    }

    let lowered = line.to_lowercase();
    HEADER_PREFIXES
        .iter()
        .any(|prefix| lowered.starts_with(prefix))
}

/// Coarse topical labels, in fixed group order. `None` when nothing matched.
pub fn derive_tags(title: &str) -> Option<Vec<String>> {
    let lowered = title.to_lowercase();
    let tags = TAG_GROUPS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|keyword| lowered.contains(keyword)))
        .map(|(tag, _)| tag.to_string())
        .collect::<Vec<String>>();

    if tags.is_empty() { None } else { Some(tags) }
}

#[derive(Debug, Clone, Default)]
pub struct TocScan {
    pub entries: Vec<TocEntry>,
    pub lines_scanned: usize,
    pub lines_rejected: usize,
}

/// Collects TOC entries from the scan window, clamped to the document.
pub fn scan_toc_lines(
    source: &dyn PageTextSource,
    parser: &TocLineParser,
    window: TocScanWindow,
) -> Result<TocScan> {
    let end = window.end_page.min(source.page_count());
    let start = window.start_page.min(end);

    let mut scan = TocScan::default();
    for (page_index, text) in source.extract_text(start, end)? {
        let mut accepted = 0usize;
        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            scan.lines_scanned += 1;
            match parser.parse(line) {
                Some(entry) => {
                    accepted += 1;
                    scan.entries.push(entry);
                }
                None => scan.lines_rejected += 1,
            }
        }
        debug!(page = page_index, accepted, "scanned TOC page");
    }

    Ok(scan)
}
