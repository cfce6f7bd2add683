//! Shared CLI utilities.

/// Parse a `KEY=VALUE` definition, as passed to `-D`. The key is trimmed and
/// must be non-empty; the value is kept verbatim and may itself contain `=`.
pub fn parse_define(value: &str) -> Result<(String, String), String> {
    let (key, value) = value
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{value}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err("property key must not be empty".to_string());
    }
    Ok((key.to_string(), value.to_string()))
}
