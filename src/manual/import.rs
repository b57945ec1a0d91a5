use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord};
use std::path::Path;

use super::{ANNOTATION_HEADER, SOURCE_HEADER, TEXT_HEADER};
use crate::db::HighlightStore;
use crate::error::{PipelineError, RowError};
use crate::ingest::{ImportStats, IngestBatch};
use crate::model::Identity;
use crate::normalize::clean;

const MANUAL_FILE: &str = "manual quotes file";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManualColumns {
    pub text: usize,
    pub annotation: Option<usize>,
    pub source: usize,
}

impl ManualColumns {
    pub fn from_headers(headers: &StringRecord) -> Result<Self, PipelineError> {
        let find = |name: &str| headers.iter().position(|header| header == name);
        let require = |name: &'static str| {
            find(name).ok_or_else(|| PipelineError::MissingColumn {
                table: MANUAL_FILE.to_string(),
                column: name,
            })
        };

        Ok(ManualColumns {
            text: require(TEXT_HEADER)?,
            annotation: find(ANNOTATION_HEADER),
            source: require(SOURCE_HEADER)?,
        })
    }

    fn normalize(&self, record: &StringRecord) -> Result<Identity, RowError> {
        let text = clean(record.get(self.text)).ok_or(RowError::EmptyText)?;
        let source = clean(record.get(self.source)).ok_or(RowError::EmptySource)?;
        let annotation = self.annotation.and_then(|index| clean(record.get(index)));
        Ok(Identity::new(text, annotation, Some(source)))
    }
}

/// Adds the quotes of the CSV file at `csv_path` that are not yet in `dest`.
pub async fn import_manual(csv_path: &Path, dest: &Path) -> Result<ImportStats> {
    let rows = read_manual_rows(csv_path)?;

    let store = HighlightStore::open(dest).await?;
    let mut batch = IngestBatch::new(store.load_existing_identities().await?);

    for (index, row) in rows.into_iter().enumerate() {
        if let Err(reason) = &row {
            tracing::debug!("dropping manual quote row {}: {}", index + 1, reason);
        }
        batch.offer(row);
    }

    let (accepted, stats) = batch.into_parts();
    store.insert_all(&accepted).await?;

    tracing::info!(
        inserted = stats.inserted,
        duplicates = stats.duplicates,
        rejected = stats.rejected,
        "manual quotes from {} added to {}",
        csv_path.display(),
        dest.display()
    );

    Ok(stats)
}

fn read_manual_rows(csv_path: &Path) -> Result<Vec<Result<Identity, RowError>>> {
    if !csv_path.exists() {
        return Err(PipelineError::SourceMissing(csv_path.to_path_buf()).into());
    }

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_path(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let headers = reader
        .headers()
        .with_context(|| format!("failed to read header of {}", csv_path.display()))?
        .clone();
    let columns = ManualColumns::from_headers(&headers)?;

    let rows = reader
        .records()
        .map(|record| match record {
            Ok(record) => columns.normalize(&record),
            Err(e) => Err(RowError::Malformed(e.to_string())),
        })
        .collect();

    Ok(rows)
}
