//! Path expressions

use crate::error::{ConfigError, Result};

/// Split a path expression such as `database.host` or `a."b.c"` into keys.
///
/// Double quotes protect dots inside a key. Empty keys are only allowed when
/// quoted (`a."".b`).
pub fn parse_path(expr: &str) -> Result<Vec<String>> {
    let bad = |reason: &str| ConfigError::BadPath {
        path: expr.to_string(),
        reason: reason.to_string(),
    };

    if expr.is_empty() {
        return Err(bad("path is empty"));
    }

    let mut segments = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut saw_quotes = false;

    for c in expr.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                saw_quotes = true;
            }
            '.' if !in_quotes => {
                if current.is_empty() && !saw_quotes {
                    return Err(bad("contains an empty key"));
                }
                segments.push(std::mem::take(&mut current));
                saw_quotes = false;
            }
            _ => current.push(c),
        }
    }

    if in_quotes {
        return Err(bad("unterminated quote"));
    }
    if current.is_empty() && !saw_quotes {
        return Err(bad("contains an empty key"));
    }
    segments.push(current);
    Ok(segments)
}

/// Render keys back into a path expression, quoting keys that need it.
pub fn render_path<S: AsRef<str>>(segments: &[S]) -> String {
    segments.iter().map(|s| render_key(s.as_ref())).collect::<Vec<_>>().join(".")
}

/// Append `key` to an already rendered path.
pub fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        render_key(key)
    } else {
        format!("{parent}.{}", render_key(key))
    }
}

fn render_key(key: &str) -> String {
    if key.is_empty() || key.contains('.') {
        format!("\"{key}\"")
    } else {
        key.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_path() {
        assert_eq!(parse_path("database.host").unwrap(), vec!["database", "host"]);
        assert_eq!(parse_path("port").unwrap(), vec!["port"]);
    }

    #[test]
    fn test_parse_quoted_segment() {
        assert_eq!(parse_path("a.\"b.c\".d").unwrap(), vec!["a", "b.c", "d"]);
        assert_eq!(parse_path("a.\"\"").unwrap(), vec!["a", ""]);
    }

    #[test]
    fn test_parse_rejects_empty_segments() {
        assert!(parse_path("").is_err());
        assert!(parse_path("a..b").is_err());
        assert!(parse_path(".a").is_err());
        assert!(parse_path("a.").is_err());
        assert!(parse_path("a.\"b").is_err());
    }

    #[test]
    fn test_render_quotes_dotted_keys() {
        assert_eq!(render_path(&["a", "b.c"]), "a.\"b.c\"");
        assert_eq!(join_path("", "x"), "x");
        assert_eq!(join_path("a.b", "c.d"), "a.b.\"c.d\"");
    }
}
