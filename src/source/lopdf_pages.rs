use std::path::Path;

use anyhow::Result;
use tracing::debug;

use super::{PageTextSource, check_range};
use crate::pipeline::PipelineError;

/// Pure-Rust provider that decodes page content streams with `lopdf`.
pub struct LopdfSource {
    document: lopdf::Document,
    page_numbers: Vec<u32>,
}

impl LopdfSource {
    pub fn open(path: &Path) -> Result<Self> {
        let document =
            lopdf::Document::load(path).map_err(|error| PipelineError::DocumentUnavailable {
                path: path.display().to_string(),
                reason: error.to_string(),
            })?;

        // get_pages is keyed by 1-based page number in document order
        let page_numbers = document.get_pages().keys().copied().collect();

        Ok(Self {
            document,
            page_numbers,
        })
    }
}

impl PageTextSource for LopdfSource {
    fn page_count(&self) -> usize {
        self.page_numbers.len()
    }

    fn extract_text(&self, start: usize, end: usize) -> Result<Vec<(usize, String)>> {
        check_range(start, end, self.page_numbers.len())?;

        let mut pages = Vec::with_capacity(end - start);
        for (offset, page_number) in self.page_numbers[start..end].iter().enumerate() {
            let text = match self.document.extract_text(&[*page_number]) {
                Ok(text) => text,
                Err(error) => {
                    debug!(page = page_number, error = %error, "lopdf could not decode page text");
                    String::new()
                }
            };
            pages.push((start + offset, text));
        }

        Ok(pages)
    }
}
