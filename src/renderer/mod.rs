//! HTML to PDF renderers
//!
//! Rendering is delegated to an external program. [`PdfRenderer`] is the seam
//! the HTTP layer talks to; [`WkHtmlToPdf`] drives the wkhtmltopdf binary.

mod wkhtmltopdf;

pub use wkhtmltopdf::{build_args, WkHtmlToPdf};

use async_trait::async_trait;
use axum::body::Bytes;
use thiserror::Error;

use crate::options::PdfOptions;

/// Every PDF document starts with these bytes
pub const PDF_SIGNATURE: &[u8; 5] = b"%PDF-";

/// Renderer errors
#[derive(Debug, Error)]
pub enum RenderError {
    /// The renderer process could not be started
    #[error("Failed to start renderer '{binary}': {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    /// The renderer exited unsuccessfully
    #[error("{stderr}")]
    Failed { code: Option<i32>, stderr: String },

    /// The renderer exited cleanly but did not produce a PDF
    #[error("Renderer output is not a PDF document: {0}")]
    InvalidOutput(String),

    /// The renderer exceeded its time budget and was killed
    #[error("Renderer timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Renderer I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Something that turns HTML into PDF bytes
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Check whether the renderer can be run at all
    async fn is_available(&self) -> bool;

    /// Render a document with the given options
    async fn render(&self, options: &PdfOptions, html: Bytes) -> Result<Vec<u8>, RenderError>;
}

/// Reject output that does not carry the PDF signature
pub fn check_signature(output: Vec<u8>) -> Result<Vec<u8>, RenderError> {
    if output.starts_with(PDF_SIGNATURE) {
        return Ok(output);
    }

    let text = String::from_utf8_lossy(&output).trim().to_string();
    Err(RenderError::InvalidOutput(if text.is_empty() {
        "empty output".to_string()
    } else {
        text
    }))
}
