use crate::error::ValidationError;

/// Trims the keyword and enforces presence and the character cap.
pub fn validate_keyword(raw: &str, max_chars: usize) -> Result<&str, ValidationError> {
    let topic = raw.trim();
    if topic.is_empty() {
        return Err(ValidationError::Empty);
    }
    let len = topic.chars().count();
    if len > max_chars {
        return Err(ValidationError::TooLong { len, max: max_chars });
    }
    Ok(topic)
}
