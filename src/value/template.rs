//! `${path}` substitution templates
//!
//! Strings read from config files may reference other paths. `${a.b}` is a
//! required reference, `${?a.b}` an optional one. A template whose only part
//! is a single reference takes the referenced value as-is (any type); any
//! other template is concatenated into a string.

use super::path::parse_path;
use crate::error::{ConfigError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static REFERENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{(\?)?\s*([^}]*?)\s*\}").expect("valid reference regex"));

#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    pub path: Vec<String>,
    pub expr: String,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TemplatePart {
    Text(String),
    Reference(Reference),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    parts: Vec<TemplatePart>,
}

impl Template {
    /// Scan `text` for references. Returns `None` for plain strings.
    pub fn parse(text: &str, origin: &str) -> Result<Option<Template>> {
        if !text.contains("${") {
            return Ok(None);
        }

        let mut parts = Vec::new();
        let mut last = 0;
        for caps in REFERENCE_RE.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            if whole.start() > last {
                parts.push(TemplatePart::Text(text[last..whole.start()].to_string()));
            }
            let expr = caps.get(2).map_or("", |m| m.as_str());
            let path = parse_path(expr).map_err(|e| {
                ConfigError::parse(origin, format!("bad substitution '{}': {e}", whole.as_str()))
            })?;
            parts.push(TemplatePart::Reference(Reference {
                path,
                expr: expr.to_string(),
                optional: caps.get(1).is_some(),
            }));
            last = whole.end();
        }

        // An unterminated "${" is plain text
        if !parts.iter().any(|p| matches!(p, TemplatePart::Reference(_))) {
            return Ok(None);
        }
        if last < text.len() {
            parts.push(TemplatePart::Text(text[last..].to_string()));
        }
        Ok(Some(Template { parts }))
    }

    pub fn parts(&self) -> &[TemplatePart] {
        &self.parts
    }

    /// The reference when the template is exactly `${path}` with nothing around it.
    pub fn single_reference(&self) -> Option<&Reference> {
        match self.parts.as_slice() {
            [TemplatePart::Reference(r)] => Some(r),
            _ => None,
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for part in &self.parts {
            match part {
                TemplatePart::Text(text) => f.write_str(text)?,
                TemplatePart::Reference(r) if r.optional => write!(f, "${{?{}}}", r.expr)?,
                TemplatePart::Reference(r) => write!(f, "${{{}}}", r.expr)?,
            }
        }
        Ok(())
    }
}
