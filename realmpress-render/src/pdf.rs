//! Pluggable HTML-to-PDF rendering.
//!
//! The worldbook PDF is produced by an external tool. [`PdfRenderer`] is
//! the seam so the tool can be swapped or mocked; [`Wkhtmltopdf`] is the
//! stock implementation. "Tool not installed" and "tool ran and failed"
//! are distinct, actionable errors.

use crate::error::{RenderError, RenderResult};
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, info};

/// Renders one HTML file to one PDF file.
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render(&self, html_path: &Path, pdf_path: &Path, title: &str) -> RenderResult<()>;
}

/// External wkhtmltopdf invocation.
#[derive(Clone, Debug)]
pub struct Wkhtmltopdf {
    binary: String,
}

impl Default for Wkhtmltopdf {
    fn default() -> Self {
        Self {
            binary: "wkhtmltopdf".to_string(),
        }
    }
}

impl Wkhtmltopdf {
    /// Use a non-PATH binary location.
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl PdfRenderer for Wkhtmltopdf {
    async fn render(&self, html_path: &Path, pdf_path: &Path, title: &str) -> RenderResult<()> {
        debug!(html = %html_path.display(), pdf = %pdf_path.display(), "invoking wkhtmltopdf");
        let output = Command::new(&self.binary)
            .arg("--enable-local-file-access")
            .arg("--encoding")
            .arg("utf-8")
            .arg("--margin-top")
            .arg("20mm")
            .arg("--margin-bottom")
            .arg("20mm")
            .arg("--margin-left")
            .arg("15mm")
            .arg("--margin-right")
            .arg("15mm")
            .arg("--footer-center")
            .arg("[page]")
            .arg("--title")
            .arg(title)
            .arg(html_path)
            .arg(pdf_path)
            .output()
            .await
            .map_err(|err| {
                if err.kind() == std::io::ErrorKind::NotFound {
                    RenderError::RendererMissing {
                        tool: self.binary.clone(),
                        hint: "https://wkhtmltopdf.org/downloads.html".to_string(),
                    }
                } else {
                    RenderError::Io {
                        path: html_path.to_path_buf(),
                        source: err,
                    }
                }
            })?;

        if !output.status.success() {
            return Err(RenderError::RendererFailed {
                tool: self.binary.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        info!(pdf = %pdf_path.display(), "PDF written");
        Ok(())
    }
}
