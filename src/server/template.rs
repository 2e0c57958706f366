//! Template rendering seam.
//!
//! The renderer treats templates as opaque: a name plus a JSON context goes
//! in, HTML comes out. [`TemplateRegistry`] is the in-memory engine used by
//! the bundled pages; anything else can be plugged in behind
//! [`TemplateEngine`].
//!
//! Registry syntax:
//! - `{{ path.to.value }}` inserts the value HTML-escaped
//! - `{{ path.to.value|raw }}` inserts it verbatim
//! - missing values and `null` render as the empty string

use std::collections::HashMap;

use serde_json::Value;

use crate::protocol::dom::escape_html;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("template {0:?} is not registered")]
    NotFound(String),
    #[error("template {template:?} has an unclosed tag at byte {offset}")]
    Unclosed { template: String, offset: usize },
}

/// Renders a named template with a context.
pub trait TemplateEngine: Send + Sync {
    fn render(&self, template: &str, context: &Value) -> Result<String, TemplateError>;
}

/// In-memory template set.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, String>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_template(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.register(name, source);
        self
    }

    pub fn register(&mut self, name: impl Into<String>, source: impl Into<String>) {
        self.templates.insert(name.into(), source.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }
}

impl TemplateEngine for TemplateRegistry {
    fn render(&self, template: &str, context: &Value) -> Result<String, TemplateError> {
        let source = self
            .templates
            .get(template)
            .ok_or_else(|| TemplateError::NotFound(template.to_string()))?;

        let mut out = String::with_capacity(source.len());
        let mut rest = source.as_str();
        let mut consumed = 0;

        while let Some(open) = rest.find("{{") {
            out.push_str(&rest[..open]);
            let tag = &rest[open + 2..];
            let close = tag.find("}}").ok_or_else(|| TemplateError::Unclosed {
                template: template.to_string(),
                offset: consumed + open,
            })?;

            let expr = tag[..close].trim();
            let (path, raw) = match expr.strip_suffix("|raw") {
                Some(path) => (path.trim_end(), true),
                None => (expr, false),
            };

            let text = match lookup(context, path) {
                None | Some(Value::Null) => String::new(),
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
            };
            if raw {
                out.push_str(&text);
            } else {
                out.push_str(&escape_html(&text));
            }

            let advance = open + 2 + close + 2;
            consumed += advance;
            rest = &rest[advance..];
        }

        out.push_str(rest);
        Ok(out)
    }
}

fn lookup<'a>(context: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(context, |value, segment| value.get(segment))
}
