//! Certificate rendering ports.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Renders named HTML templates against a JSON context.
pub trait TemplateRenderer: Send + Sync {
    /// Renders `template` with `context`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnknownTemplate`] when no template has that
    /// name, or [`RenderError::Template`] when evaluation fails.
    fn render(&self, template: &str, context: &Value) -> Result<String, RenderError>;
}

/// Converts rendered HTML into a PDF document.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PdfConverter: Send + Sync {
    /// Produces PDF bytes for `html`.
    async fn html_to_pdf(&self, html: &str) -> Result<Vec<u8>, RenderError>;
}

/// Errors returned by renderers and converters.
#[derive(Debug, Clone, Error)]
pub enum RenderError {
    /// No template is registered under the name.
    #[error("unknown template: {0}")]
    UnknownTemplate(String),

    /// Template evaluation failed.
    #[error("failed to render template {template}: {reason}")]
    Template {
        /// Template name.
        template: String,
        /// Renderer message.
        reason: String,
    },

    /// HTML to PDF conversion failed.
    #[error("PDF conversion failed: {0}")]
    Conversion(Arc<dyn std::error::Error + Send + Sync>),
}

impl RenderError {
    /// Wraps a converter error.
    pub fn conversion(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Conversion(Arc::new(err))
    }
}
