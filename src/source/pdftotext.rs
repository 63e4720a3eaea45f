use std::path::Path;
use std::process::Command;

use anyhow::Result;
use tracing::debug;

use super::PagedText;
use crate::pipeline::PipelineError;

/// Runs poppler's `pdftotext` over the whole document once and keeps the
/// pages in memory; sections then slice the cached pages.
pub fn extract_pages_with_pdftotext(pdf_path: &Path) -> Result<PagedText> {
    let output = Command::new("pdftotext")
        .arg("-enc")
        .arg("UTF-8")
        .arg(pdf_path)
        .arg("-")
        .output()
        .map_err(|error| PipelineError::DocumentUnavailable {
            path: pdf_path.display().to_string(),
            reason: format!("failed to execute pdftotext: {error}"),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PipelineError::DocumentUnavailable {
            path: pdf_path.display().to_string(),
            reason: format!("pdftotext returned non-zero exit status: {}", stderr.trim()),
        }
        .into());
    }

    let raw = String::from_utf8_lossy(&output.stdout);
    let pages = PagedText::from_form_feed_dump(&raw);
    debug!(path = %pdf_path.display(), pages = pages.pages.len(), "pdftotext extraction finished");

    Ok(pages)
}
