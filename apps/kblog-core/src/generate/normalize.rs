use crate::error::ParseError;
use crate::generate::types::GenerationResult;
use serde_json::Value;

/// Turns raw completion text into a validated post.
///
/// Parses strictly first; on failure retries once with a markdown code fence removed.
/// The parsed object must then match the post schema exactly.
pub fn normalize(raw: &str) -> Result<GenerationResult, ParseError> {
    let value = match serde_json::from_str::<Value>(raw) {
        Ok(v) => v,
        Err(_) => {
            let inner = strip_code_fence(raw);
            tracing::debug!(raw_len = raw.len(), inner_len = inner.len(), "retrying parse without code fence");
            serde_json::from_str::<Value>(inner).map_err(ParseError::Malformed)?
        }
    };
    into_result(value)
}

/// Contents of the outermost ```` ``` ```` fence (an optional `json` tag is dropped).
/// Text without a fence comes back trimmed.
pub fn strip_code_fence(raw: &str) -> &str {
    let text = raw.trim();
    let Some(open) = text.find("```") else { return text };
    let mut inner = &text[open + 3..];
    if inner.get(..4).is_some_and(|tag| tag.eq_ignore_ascii_case("json")) {
        inner = &inner[4..];
    }
    if let Some(close) = inner.rfind("```") {
        inner = &inner[..close];
    }
    inner.trim()
}

fn into_result(value: Value) -> Result<GenerationResult, ParseError> {
    let result: GenerationResult = serde_json::from_value(value).map_err(|e| ParseError::Schema(e.to_string()))?;
    if result.titles.len() != GenerationResult::TITLE_COUNT {
        return Err(ParseError::Schema(format!("expected {} titles, got {}", GenerationResult::TITLE_COUNT, result.titles.len())));
    }
    if result.tags.len() != GenerationResult::TAG_COUNT {
        return Err(ParseError::Schema(format!("expected {} tags, got {}", GenerationResult::TAG_COUNT, result.tags.len())));
    }
    if result.titles.iter().any(|t| t.trim().is_empty()) {
        return Err(ParseError::Schema("blank title".into()));
    }
    if result.body.trim().is_empty() {
        return Err(ParseError::Schema("empty body".into()));
    }
    Ok(result)
}
