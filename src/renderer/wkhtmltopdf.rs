//! wkhtmltopdf subprocess renderer

use std::io;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::{check_signature, PdfRenderer, RenderError};
use crate::config::RendererConfig;
use crate::options::PdfOptions;

/// Stdin/stdout marker understood by wkhtmltopdf
const STDIO_MARKER: &str = "-";

/// Build the wkhtmltopdf argument list for a set of options
///
/// The document is read from stdin and the PDF written to stdout.
pub fn build_args(options: &PdfOptions) -> Vec<String> {
    vec![
        "--quiet".to_string(),
        "--page-size".to_string(),
        options.page_size.clone(),
        "--margin-top".to_string(),
        options.margin_top.to_string(),
        "--margin-bottom".to_string(),
        options.margin_bottom.to_string(),
        "--margin-left".to_string(),
        options.margin_left.to_string(),
        "--margin-right".to_string(),
        options.margin_right.to_string(),
        "--orientation".to_string(),
        options.orientation.to_string(),
        if options.background {
            "--background".to_string()
        } else {
            "--no-background".to_string()
        },
        "--encoding".to_string(),
        options.encoding.clone(),
        STDIO_MARKER.to_string(),
        STDIO_MARKER.to_string(),
    ]
}

/// Runs one wkhtmltopdf process per render
#[derive(Debug, Clone)]
pub struct WkHtmlToPdf {
    binary: String,
    timeout: Duration,
}

impl WkHtmlToPdf {
    pub fn new(binary: impl Into<String>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    pub fn from_config(config: &RendererConfig) -> Self {
        Self::new(config.binary.clone(), config.timeout())
    }
}

#[async_trait]
impl PdfRenderer for WkHtmlToPdf {
    fn name(&self) -> &str {
        &self.binary
    }

    async fn is_available(&self) -> bool {
        let probe = Command::new(&self.binary)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status();

        match tokio::time::timeout(self.timeout, probe).await {
            Ok(status) => status.map(|status| status.success()).unwrap_or(false),
            Err(_) => {
                tracing::warn!("{} --version did not answer within {:?}", self.binary, self.timeout);
                false
            }
        }
    }

    async fn render(&self, options: &PdfOptions, html: Bytes) -> Result<Vec<u8>, RenderError> {
        let args = build_args(options);
        tracing::debug!("Running {} {}", self.binary, args.join(" "));

        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| RenderError::Spawn {
                binary: self.binary.clone(),
                source,
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "renderer stdin was not captured"))?;

        // Feed the document on its own task so stdout/stderr keep draining
        let input_len = html.len();
        let feeder = tokio::spawn(async move {
            stdin.write_all(&html).await?;
            stdin.shutdown().await
        });

        let feeder_abort = feeder.abort_handle();
        let finished = async {
            let output = child.wait_with_output().await?;
            if !output.status.success() {
                // A leftover holder of stdin must not keep the request alive
                feeder.abort();
                return Ok((output, Ok(())));
            }
            let fed = feeder
                .await
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
            Ok::<_, RenderError>((output, fed))
        };

        // Dropping the child on timeout kills it
        let (output, fed) = match tokio::time::timeout(self.timeout, finished).await {
            Ok(result) => result?,
            Err(_) => {
                feeder_abort.abort();
                tracing::warn!("{} exceeded {:?}, killed", self.binary, self.timeout);
                return Err(RenderError::Timeout(self.timeout));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(RenderError::Failed {
                code: output.status.code(),
                stderr: if stderr.is_empty() {
                    "Unknown error".to_string()
                } else {
                    stderr
                },
            });
        }

        match fed {
            Ok(()) => {}
            // The renderer stopped reading early but still succeeded
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                tracing::debug!("{} closed stdin before reading all input: {}", self.binary, e);
            }
            Err(e) => return Err(RenderError::Io(e)),
        }

        tracing::debug!(
            "{} rendered {} bytes of HTML into {} bytes",
            self.binary,
            input_len,
            output.stdout.len()
        );

        check_signature(output.stdout)
    }
}
