use anyhow::Result;
use tracing::debug;

use crate::model::{Section, TocEntry};
use crate::source::PageTextSource;

pub const CONTENT_PREVIEW_CHARS: usize = 1000;

/// Optional clamps applied to every section range, as 0-based page indices.
/// `floor` is inclusive and `ceiling` exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionWindow {
    pub floor: Option<usize>,
    pub ceiling: Option<usize>,
}

/// A 0-based half-open page range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub start: usize,
    pub end: usize,
}

impl PageRange {
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// One range per entry: a section runs from its declared page up to the page
/// where the next declared section begins, or to the end of the document.
pub fn section_ranges(
    entries: &[TocEntry],
    total_pages: usize,
    window: SectionWindow,
) -> Vec<PageRange> {
    let ceiling = window
        .ceiling
        .map_or(total_pages, |ceiling| ceiling.min(total_pages));

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let declared_start = (entry.page as usize).saturating_sub(1);
            let start = window
                .floor
                .map_or(declared_start, |floor| floor.max(declared_start));
            let end = entries
                .get(index + 1)
                .map_or(total_pages, |next| (next.page as usize).saturating_sub(1))
                .min(ceiling);
            PageRange { start, end }
        })
        .collect()
}

/// Realizes one section per entry, in entry order. Degenerate ranges still
/// produce a section, with empty content.
pub fn map_sections(
    source: &dyn PageTextSource,
    entries: &[TocEntry],
    total_pages: usize,
    window: SectionWindow,
) -> Result<Vec<Section>> {
    let ranges = section_ranges(entries, total_pages, window);
    let mut sections = Vec::with_capacity(entries.len());

    for (entry, range) in entries.iter().zip(ranges) {
        let content = if range.is_empty() {
            debug!(
                section_id = %entry.section_id,
                start = range.start,
                end = range.end,
                "degenerate section range"
            );
            String::new()
        } else {
            let texts = source
                .extract_text(range.start, range.end)?
                .into_iter()
                .map(|(_, text)| text)
                .filter(|text| !text.is_empty())
                .collect::<Vec<String>>();
            truncate_chars(&texts.join("\n"), CONTENT_PREVIEW_CHARS)
        };

        sections.push(Section {
            doc_title: entry.doc_title.clone(),
            section_id: entry.section_id.clone(),
            title: entry.title.clone(),
            page: entry.page,
            content,
            tables: None,
            figures: None,
        });
    }

    Ok(sections)
}

/// Keeps at most `max_chars` characters (not bytes).
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}
