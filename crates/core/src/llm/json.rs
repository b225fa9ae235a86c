use serde::de::DeserializeOwned;

const FENCE: &str = "```";

/// Removes an optional Markdown code fence (```json ... ``` or ``` ... ```)
/// around model output. Text without a fence is returned trimmed.
pub fn strip_code_fences(text: &str) -> &str {
    let mut inner = text.trim();

    if let Some(rest) = inner.strip_prefix(FENCE) {
        inner = match rest.get(..4) {
            Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
            _ => rest,
        };
    }

    if let Some(rest) = inner.strip_suffix(FENCE) {
        inner = rest;
    }

    inner.trim()
}

/// Decodes model output as JSON after stripping any code fence.
pub fn parse_fenced<T: DeserializeOwned>(text: &str) -> serde_json::Result<T> {
    serde_json::from_str(strip_code_fences(text))
}
