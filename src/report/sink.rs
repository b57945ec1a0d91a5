use anyhow::{Context, Result};
use std::future::Future;
use std::path::{Path, PathBuf};

/// Receives a fully rendered report.
pub trait ReportSink {
    fn deliver(&self, subject: &str, document: &str) -> impl Future<Output = Result<()>> + Send;
}

/// Writes the report to a file, replacing any previous one.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSink for FileSink {
    async fn deliver(&self, subject: &str, document: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }

        tokio::fs::write(&self.path, document)
            .await
            .with_context(|| format!("failed to write report {}", self.path.display()))?;

        tracing::info!(subject, "report written to {}", self.path.display());
        Ok(())
    }
}
