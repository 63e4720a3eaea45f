/// Failures that abort a run. Lines that simply are not TOC entries never
/// show up here.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The document could not be opened or read by the page source.
    #[error("document unavailable: {path}: {reason}")]
    DocumentUnavailable { path: String, reason: String },

    /// A page range reached past the end of the document.
    #[error("page range [{start}, {end}) is outside the document ({page_count} pages)")]
    PageOutOfRange {
        start: usize,
        end: usize,
        page_count: usize,
    },

    /// A section identifier that is not a dotted numeral.
    #[error("malformed section identifier: {0:?}")]
    MalformedIdentifier(String),

    /// An entry whose level or parent disagrees with its identifier.
    #[error("hierarchy mismatch for section {section_id}: {reason}")]
    HierarchyMismatch { section_id: String, reason: String },
}
