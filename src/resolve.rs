//! Substitution resolution
//!
//! Runs once over a fully merged tree, after every layer has been added.
//! References can point at any path in the tree, including paths that are
//! themselves substitutions or that live under one.

use crate::error::{ConfigError, Result};
use crate::value::{render_path, ConfigObject, ConfigValue, Reference, Template, TemplatePart};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Look up references missing from the tree as environment variables.
    pub use_environment: bool,
}

impl ResolveOptions {
    pub fn with_environment_fallback(mut self, enabled: bool) -> Self {
        self.use_environment = enabled;
        self
    }
}

/// Expand every `${}` reference in `root`.
pub fn resolve(root: &ConfigObject, options: &ResolveOptions) -> Result<ConfigObject> {
    if root.is_resolved() {
        return Ok(root.clone());
    }
    let mut resolver = Resolver {
        root,
        options,
        memo: HashMap::new(),
        active: Vec::new(),
        list_depth: 0,
    };
    resolver.resolve_object(root, &[])
}

struct Resolver<'a> {
    root: &'a ConfigObject,
    options: &'a ResolveOptions,
    memo: HashMap<Vec<String>, Option<ConfigValue>>,
    active: Vec<Vec<String>>,
    /// Nonzero while resolving list items, whose paths cannot be looked up from the root.
    list_depth: usize,
}

impl<'a> Resolver<'a> {
    fn resolve_object(&mut self, object: &'a ConfigObject, path: &[String]) -> Result<ConfigObject> {
        let mut out = ConfigObject::new();
        for (key, value) in object {
            let child_path = child(path, key);
            let resolved = match value {
                ConfigValue::Template(_) if self.list_depth == 0 => self.lookup(&child_path)?,
                other => self.resolve_value(other, &child_path)?,
            };
            // A missing optional substitution removes the key
            if let Some(resolved) = resolved {
                out.insert(key.clone(), resolved);
            }
        }
        Ok(out)
    }

    fn resolve_value(&mut self, value: &'a ConfigValue, path: &[String]) -> Result<Option<ConfigValue>> {
        match value {
            ConfigValue::Object(obj) => Ok(Some(ConfigValue::Object(self.resolve_object(obj, path)?))),
            ConfigValue::List(items) => {
                let mut out = Vec::with_capacity(items.len());
                self.list_depth += 1;
                for (index, item) in items.iter().enumerate() {
                    let item_path = child(path, &format!("[{index}]"));
                    if let Some(resolved) = self.resolve_value(item, &item_path)? {
                        out.push(resolved);
                    }
                }
                self.list_depth -= 1;
                Ok(Some(ConfigValue::List(out)))
            }
            ConfigValue::Template(template) => self.resolve_template(template, path),
            other => Ok(Some(other.clone())),
        }
    }

    /// Resolved value at `target`, or `None` when the tree has nothing there.
    fn lookup(&mut self, target: &[String]) -> Result<Option<ConfigValue>> {
        if let Some(hit) = self.memo.get(target) {
            return Ok(hit.clone());
        }
        if self.active.iter().any(|p| p.as_slice() == target) {
            let mut chain: Vec<String> = self.active.iter().map(|p| render_path(p.as_slice())).collect();
            chain.push(render_path(target));
            return Err(ConfigError::SubstitutionCycle {
                path: render_path(target),
                chain: chain.join(" -> "),
            });
        }

        // Values reached from the root are addressable again
        let list_depth = std::mem::take(&mut self.list_depth);
        self.active.push(target.to_vec());
        let result = self.lookup_uncached(target);
        self.active.pop();
        self.list_depth = list_depth;

        let value = result?;
        self.memo.insert(target.to_vec(), value.clone());
        Ok(value)
    }

    fn lookup_uncached(&mut self, target: &[String]) -> Result<Option<ConfigValue>> {
        let mut object: &'a ConfigObject = self.root;
        for (depth, segment) in target.iter().enumerate() {
            let Some(raw) = object.get(segment) else {
                return Ok(None);
            };
            if depth + 1 == target.len() {
                return self.resolve_value(raw, target);
            }
            match raw {
                ConfigValue::Object(inner) => object = inner,
                ConfigValue::Template(_) => {
                    // The path runs through a substitution: resolve that first
                    let prefix = &target[..=depth];
                    let resolved = self.lookup(prefix)?;
                    let rest = &target[depth + 1..];
                    return Ok(resolved.as_ref().and_then(|v| descend(v, rest)).cloned());
                }
                _ => return Ok(None),
            }
        }
        Ok(None)
    }

    fn resolve_template(&mut self, template: &Template, path: &[String]) -> Result<Option<ConfigValue>> {
        if let Some(reference) = template.single_reference() {
            return match self.resolve_reference(reference)? {
                Some(value) => Ok(Some(value)),
                None if reference.optional => Ok(None),
                None => Err(unresolved(reference, path)),
            };
        }

        let mut text = String::new();
        for part in template.parts() {
            match part {
                TemplatePart::Text(s) => text.push_str(s),
                TemplatePart::Reference(reference) => match self.resolve_reference(reference)? {
                    Some(value) => match value.render_scalar() {
                        Some(rendered) => text.push_str(&rendered),
                        None => {
                            return Err(ConfigError::InvalidConcatenation {
                                path: render_path(path),
                                reference: reference.expr.clone(),
                                found: value.type_name(),
                            })
                        }
                    },
                    None if reference.optional => {}
                    None => return Err(unresolved(reference, path)),
                },
            }
        }
        Ok(Some(ConfigValue::String(text)))
    }

    fn resolve_reference(&mut self, reference: &Reference) -> Result<Option<ConfigValue>> {
        if let Some(value) = self.lookup(&reference.path)? {
            return Ok(Some(value));
        }
        if self.options.use_environment {
            if let Ok(value) = std::env::var(&reference.expr) {
                return Ok(Some(ConfigValue::String(value)));
            }
        }
        Ok(None)
    }
}

fn child(path: &[String], key: &str) -> Vec<String> {
    let mut out = Vec::with_capacity(path.len() + 1);
    out.extend_from_slice(path);
    out.push(key.to_string());
    out
}

fn descend<'v>(value: &'v ConfigValue, rest: &[String]) -> Option<&'v ConfigValue> {
    if rest.is_empty() {
        return Some(value);
    }
    value.as_object()?.lookup(rest)
}

fn unresolved(reference: &Reference, path: &[String]) -> ConfigError {
    ConfigError::UnresolvedSubstitution {
        path: render_path(path),
        reference: reference.expr.clone(),
    }
}
