//! Java-style `.properties` parsing
//!
//! Supports `#`/`!` comments, `=`, `:` or whitespace separators, trailing
//! backslash continuations and `\uXXXX` escapes. Dotted keys become nested
//! objects.

use super::structured::string_value;
use crate::error::{ConfigError, Result};
use crate::value::{ConfigObject, ConfigValue};

const WHITESPACE: [char; 3] = [' ', '\t', '\x0c'];

pub fn parse_properties(text: &str, origin: &str) -> Result<ConfigObject> {
    let mut obj = ConfigObject::new();
    for line in logical_lines(text) {
        let (raw_key, raw_value) = split_key_value(&line);
        let key = unescape(raw_key, origin)?;
        let value = unescape(raw_value, origin)?;
        obj.insert_path(&key_path(&key), string_value(value, origin)?);
    }
    Ok(obj)
}

/// Build an object from literal key/value pairs, nesting dotted keys.
///
/// Values are taken verbatim; `${}` in them is not a substitution.
pub fn object_from_properties<I, K, V>(pairs: I) -> ConfigObject
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let mut obj = ConfigObject::new();
    for (key, value) in pairs {
        obj.insert_path(&key_path(key.as_ref()), ConfigValue::String(value.into()));
    }
    obj
}

/// Dotted keys nest; a key with an empty segment stays a single key.
fn key_path(key: &str) -> Vec<String> {
    let parts: Vec<String> = key.split('.').map(String::from).collect();
    if parts.iter().any(String::is_empty) {
        vec![key.to_string()]
    } else {
        parts
    }
}

fn logical_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut pending: Option<String> = None;

    for raw in text.lines() {
        let trimmed = raw.trim_start_matches(WHITESPACE);
        let mut line = match pending.take() {
            Some(mut acc) => {
                acc.push_str(trimmed);
                acc
            }
            None => {
                if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                    continue;
                }
                trimmed.to_string()
            }
        };

        if ends_with_continuation(&line) {
            line.pop();
            pending = Some(line);
        } else {
            lines.push(line);
        }
    }

    if let Some(rest) = pending {
        lines.push(rest);
    }
    lines
}

fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' | ' ' | '\t' | '\x0c' => {
                key_end = i;
                break;
            }
            _ => {}
        }
    }

    let key = &line[..key_end];
    let mut rest = line[key_end..].trim_start_matches(WHITESPACE);
    if let Some(stripped) = rest.strip_prefix(['=', ':']) {
        rest = stripped.trim_start_matches(WHITESPACE);
    }
    (key, rest)
}

fn unescape(raw: &str, origin: &str) -> Result<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let high = read_code_unit(&mut chars, origin)?;
                let code = if (0xD800..0xDC00).contains(&high) {
                    if chars.next() != Some('\\') || chars.next() != Some('u') {
                        return Err(ConfigError::parse(origin, "unpaired surrogate in \\u escape"));
                    }
                    let low = read_code_unit(&mut chars, origin)?;
                    0x10000 + ((high - 0xD800) << 10) + (low.wrapping_sub(0xDC00) & 0x3FF)
                } else {
                    high
                };
                let decoded = char::from_u32(code)
                    .ok_or_else(|| ConfigError::parse(origin, format!("invalid \\u escape {code:#x}")))?;
                out.push(decoded);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    Ok(out)
}

fn read_code_unit(chars: &mut std::str::Chars<'_>, origin: &str) -> Result<u32> {
    let hex: String = chars.by_ref().take(4).collect();
    if hex.len() != 4 {
        return Err(ConfigError::parse(origin, "truncated \\u escape"));
    }
    u32::from_str_radix(&hex, 16)
        .map_err(|_| ConfigError::parse(origin, format!("malformed \\u escape '{hex}'")))
}
