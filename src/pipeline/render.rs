use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

use crate::errors::ResearchError;
use crate::utils::truncation::truncate_error;

/// A rendered report on local disk.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedArtifact {
    pub path: PathBuf,
    pub filename: String,
    pub size_bytes: u64,
}

impl RenderedArtifact {
    /// Stat an already written file.
    pub async fn from_path(path: PathBuf, filename: impl Into<String>) -> Result<Self, ResearchError> {
        let size_bytes = tokio::fs::metadata(&path).await?.len();
        Ok(Self { path, filename: filename.into(), size_bytes })
    }
}

#[async_trait]
pub trait ReportRenderer: Send + Sync {
    /// Render markdown into a PDF. `filename` is the name shown to recipients,
    /// not necessarily the on-disk name.
    async fn render(&self, markdown: &str, filename: &str) -> Result<RenderedArtifact, ResearchError>;
}

/// Shells out to pandoc. The markdown goes through a temp file that is removed once
/// conversion finishes; the PDF lands in `output_dir` and outlives the call.
pub struct PandocRenderer {
    pandoc_path: String,
    output_dir: PathBuf,
}

impl PandocRenderer {
    pub fn new(pandoc_path: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self { pandoc_path: pandoc_path.into(), output_dir: output_dir.into() }
    }
}

#[async_trait]
impl ReportRenderer for PandocRenderer {
    async fn render(&self, markdown: &str, filename: &str) -> Result<RenderedArtifact, ResearchError> {
        tokio::fs::create_dir_all(&self.output_dir).await?;

        let source = tempfile::Builder::new()
            .prefix("report-")
            .suffix(".md")
            .tempfile_in(&self.output_dir)?;
        let mut md_file = tokio::fs::File::create(source.path()).await?;
        md_file.write_all(markdown.as_bytes()).await?;
        md_file.flush().await?;
        drop(md_file);

        // `filename` is only the display name. Each render gets its own path so
        // concurrent requests for the same company never share a file.
        let stem = Path::new(filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("report");
        let pdf = tempfile::Builder::new()
            .prefix(&format!("{}_", stem))
            .suffix(".pdf")
            .tempfile_in(&self.output_dir)?;
        debug!(pandoc = %self.pandoc_path, output = %pdf.path().display(), "Running pandoc");

        let output = Command::new(&self.pandoc_path)
            .arg(source.path())
            .arg("-o")
            .arg(pdf.path())
            .output()
            .await
            .map_err(|e| {
                ResearchError::Render(format!(
                    "Failed to run {}: {}. Make sure pandoc is installed.",
                    self.pandoc_path, e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ResearchError::Render(format!(
                "pandoc exited with {}: {}",
                output.status,
                truncate_error(stderr.trim())
            )));
        }

        let (_, pdf_path) = pdf.keep().map_err(|e| e.error)?;
        let artifact = RenderedArtifact::from_path(pdf_path, filename).await?;
        info!(file = %artifact.filename, bytes = artifact.size_bytes, "PDF generated");
        Ok(artifact)
    }
}
