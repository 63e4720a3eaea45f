//! Page-addressed text providers.
//!
//! Every provider answers the same two questions: how many pages the document
//! has, and what text each page in a 0-based half-open range carries. The
//! pipeline never knows which provider it is talking to.

use std::path::Path;

use anyhow::Result;

use crate::cli::PageBackend;
use crate::pipeline::PipelineError;

mod lopdf_pages;
mod pdftotext;
mod text_dump;

pub use lopdf_pages::LopdfSource;
pub use pdftotext::extract_pages_with_pdftotext;
pub use text_dump::load_text_dump;

const FORM_FEED: char = '\u{000C}';

pub trait PageTextSource {
    fn page_count(&self) -> usize;

    /// Returns `(page_index, text)` for every page in `[start, end)`.
    fn extract_text(&self, start: usize, end: usize) -> Result<Vec<(usize, String)>>;
}

pub fn open_source(backend: PageBackend, path: &Path) -> Result<Box<dyn PageTextSource>> {
    if !path.is_file() {
        return Err(PipelineError::DocumentUnavailable {
            path: path.display().to_string(),
            reason: "file does not exist".to_string(),
        }
        .into());
    }

    let source: Box<dyn PageTextSource> = match backend {
        PageBackend::Pdftotext => Box::new(extract_pages_with_pdftotext(path)?),
        PageBackend::Lopdf => Box::new(LopdfSource::open(path)?),
        PageBackend::Text => Box::new(load_text_dump(path)?),
    };

    Ok(source)
}

pub(crate) fn check_range(start: usize, end: usize, page_count: usize) -> Result<()> {
    if start > end || end > page_count {
        return Err(PipelineError::PageOutOfRange {
            start,
            end,
            page_count,
        }
        .into());
    }
    Ok(())
}

/// Pages held fully in memory, as produced by tools that dump a whole
/// document at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PagedText {
    pages: Vec<String>,
}

impl PagedText {
    pub fn new(pages: Vec<String>) -> Self {
        Self { pages }
    }

    /// Splits a form-feed separated dump. A trailing form feed closes the last
    /// page rather than opening an empty one.
    pub fn from_form_feed_dump(raw: &str) -> Self {
        let body = raw.strip_suffix(FORM_FEED).unwrap_or(raw);
        if body.is_empty() {
            return Self::default();
        }

        Self::new(
            body.split(FORM_FEED)
                .map(|chunk| chunk.replace('\u{0000}', ""))
                .collect(),
        )
    }
}

impl PageTextSource for PagedText {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn extract_text(&self, start: usize, end: usize) -> Result<Vec<(usize, String)>> {
        check_range(start, end, self.pages.len())?;
        Ok(self.pages[start..end]
            .iter()
            .enumerate()
            .map(|(offset, text)| (start + offset, text.clone()))
            .collect())
    }
}
