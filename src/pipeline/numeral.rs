use super::PipelineError;

/// Splits a dotted numeral such as `2.10.1` into `[2, 10, 1]`.
///
/// Empty components, leading or trailing dots, non-digit characters and
/// components that overflow `u64` are all rejected.
pub fn numeral_components(section_id: &str) -> Result<Vec<u64>, PipelineError> {
    let malformed = || PipelineError::MalformedIdentifier(section_id.to_string());

    section_id
        .split('.')
        .map(|component| {
            if component.is_empty() || !component.bytes().all(|byte| byte.is_ascii_digit()) {
                return Err(malformed());
            }
            component.parse::<u64>().map_err(|_| malformed())
        })
        .collect()
}
