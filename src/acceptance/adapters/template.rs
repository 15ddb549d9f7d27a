//! `minijinja`-backed template renderer.

use minijinja::{AutoEscape, Environment};
use serde_json::Value;
use std::collections::HashMap;

use crate::acceptance::ports::{RenderError, TemplateRenderer};

/// Name of the built-in certificate of acceptance template.
pub const CERTIFICATE_TEMPLATE: &str = "acceptance-certificate";

const CERTIFICATE_SOURCE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Certificate of Acceptance</title>
</head>
<body>
<h1>Certificate of Acceptance</h1>
<p>This certifies that <strong>{{ acceptor_name }}</strong> accepted
<strong>{{ document_file_name }}</strong> on {{ accepted_at }}.</p>
<table>
<tr><th>Recipient</th><td>{{ contact_name }} &lt;{{ contact_email }}&gt;</td></tr>
<tr><th>IP address</th><td>{{ acceptor_ip or "not recorded" }}</td></tr>
<tr><th>User agent</th><td>{{ acceptor_user_agent or "not recorded" }}</td></tr>
<tr><th>Document SHA-256</th><td><code>{{ document_hash }}</code></td></tr>
<tr><th>Request</th><td>{{ request_id }}</td></tr>
<tr><th>Organization</th><td>{{ org_id }}</td></tr>
</table>
</body>
</html>
"#;

/// Renders registered templates with `minijinja`, escaping values as HTML.
#[derive(Debug, Clone)]
pub struct MiniJinjaTemplateRenderer {
    templates: HashMap<String, String>,
}

impl MiniJinjaTemplateRenderer {
    /// Creates a renderer holding the built-in certificate template.
    #[must_use]
    pub fn new() -> Self {
        Self {
            templates: HashMap::from([(
                CERTIFICATE_TEMPLATE.to_owned(),
                CERTIFICATE_SOURCE.to_owned(),
            )]),
        }
    }

    /// Registers or replaces a template.
    #[must_use]
    pub fn with_template(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.templates.insert(name.into(), source.into());
        self
    }
}

impl Default for MiniJinjaTemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for MiniJinjaTemplateRenderer {
    fn render(&self, template: &str, context: &Value) -> Result<String, RenderError> {
        let source = self
            .templates
            .get(template)
            .ok_or_else(|| RenderError::UnknownTemplate(template.to_owned()))?;

        let mut environment = Environment::new();
        environment.set_auto_escape_callback(|_| AutoEscape::Html);
        environment
            .render_str(source, context)
            .map_err(|error| RenderError::Template {
                template: template.to_owned(),
                reason: error.to_string(),
            })
    }
}
