use std::fs;
use std::path::Path;

use anyhow::Result;

use super::PagedText;
use crate::pipeline::PipelineError;

/// Loads a UTF-8 text dump whose pages are separated by form feeds, the
/// layout `pdftotext` writes.
pub fn load_text_dump(path: &Path) -> Result<PagedText> {
    let raw = fs::read(path).map_err(|error| PipelineError::DocumentUnavailable {
        path: path.display().to_string(),
        reason: error.to_string(),
    })?;

    Ok(PagedText::from_form_feed_dump(&String::from_utf8_lossy(
        &raw,
    )))
}
