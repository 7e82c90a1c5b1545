//! Go `text/template` renderer backed by `gtmpl`.
//!
//! Values are bound as a map, so `{{ .Name }}` on an unbound key prints
//! `<no value>` rather than failing. Conditionals, `range`, `with` and
//! pipelines behave as in Go. Undefined functions and malformed actions are
//! render errors, which makes the materializer copy fetched and local files
//! verbatim.

use std::collections::HashMap;

use gtmpl::Value;
use tracing::{instrument, trace};

use stencil_core::{
    application::{RenderError, ports::TemplateRenderer},
    domain::Values,
};

/// Renderer for Go template syntax.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextTemplateRenderer;

impl TextTemplateRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateRenderer for TextTemplateRenderer {
    #[instrument(skip(self, source, values), level = "trace")]
    fn render(&self, name: &str, source: &str, values: &Values) -> Result<String, RenderError> {
        let context = Value::Map(
            values
                .iter()
                .map(|(key, value)| (key.clone(), to_template_value(value)))
                .collect(),
        );

        gtmpl::template(source, context).map_err(|e| {
            trace!(error = %e, "Template did not render");
            RenderError::new(e.to_string())
        })
    }
}

/// JSON values as template data. Objects become maps so missing keys are
/// lenient.
fn to_template_value(value: &serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Nil,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                Value::from(n.as_f64().unwrap_or_default())
            }
        }
        serde_json::Value::String(s) => Value::String(s.clone()),
        serde_json::Value::Array(items) => {
            Value::Array(items.iter().map(to_template_value).collect())
        }
        serde_json::Value::Object(map) => Value::Map(
            map.iter()
                .map(|(k, v)| (k.clone(), to_template_value(v)))
                .collect::<HashMap<_, _>>(),
        ),
    }
}
