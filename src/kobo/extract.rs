use anyhow::{Context, Result};
use libsql::{Builder, OpenFlags, Row, Value};
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};

use super::{ANNOTATION_COLUMN, BOOKMARK_TABLE, BookmarkColumns, TEXT_COLUMN, VOLUME_COLUMN, resolve_columns};
use crate::db::HighlightStore;
use crate::error::{PipelineError, RowError};
use crate::ingest::{ImportStats, IngestBatch, log_rejected_row};
use crate::model::Identity;
use crate::normalize::{clean, format_source};

#[derive(Debug)]
struct BookmarkRow {
    text: Option<String>,
    annotation: Option<String>,
    volume_id: Option<String>,
}

impl BookmarkRow {
    fn normalize(self) -> Result<Identity, RowError> {
        let text = clean(self.text.as_deref()).ok_or(RowError::EmptyText)?;
        Ok(Identity::new(
            text,
            clean(self.annotation.as_deref()),
            format_source(self.volume_id.as_deref()),
        ))
    }
}

/// Copies new highlights from a Kobo database into the store at `dest`.
///
/// The source is read completely and `text_output` is created before the
/// destination is touched, so a bad source or an unwritable text output leaves
/// no store behind. `text_output` is rewritten on every call and lists the
/// highlights this call added.
pub async fn extract(source: &Path, dest: &Path, text_output: &Path) -> Result<ImportStats> {
    let bookmarks = read_bookmarks(source).await?;

    let file = File::create(text_output)
        .await
        .with_context(|| format!("failed to create {}", text_output.display()))?;
    let mut out = BufWriter::new(file);

    let store = HighlightStore::open(dest).await?;
    let mut batch = IngestBatch::new(store.load_existing_identities().await?);

    for (index, bookmark) in bookmarks.into_iter().enumerate() {
        let row = bookmark.and_then(BookmarkRow::normalize);
        if let Err(reason) = &row {
            log_rejected_row("bookmark", index, reason);
        }

        if let Some(identity) = batch.offer(row) {
            out.write_all(format_block(identity).as_bytes())
                .await
                .with_context(|| format!("failed to write {}", text_output.display()))?;
        }
    }
    out.flush()
        .await
        .with_context(|| format!("failed to flush {}", text_output.display()))?;

    let (accepted, stats) = batch.into_parts();
    store.insert_all(&accepted).await?;

    tracing::info!(
        inserted = stats.inserted,
        duplicates = stats.duplicates,
        rejected = stats.rejected,
        "extracted highlights written to {} and {}",
        dest.display(),
        text_output.display()
    );

    Ok(stats)
}

/// One block of the text output file.
pub fn format_block(identity: &Identity) -> String {
    let mut block = format!("Text: {}\n", identity.text);
    if let Some(annotation) = &identity.annotation {
        block.push_str(&format!("Annotation: {annotation}\n"));
    }
    block.push_str(&format!("Source: {}\n\n", identity.source.as_deref().unwrap_or_default()));
    block
}

async fn read_bookmarks(source: &Path) -> Result<Vec<Result<BookmarkRow, RowError>>> {
    if !source.exists() {
        return Err(PipelineError::SourceMissing(source.to_path_buf()).into());
    }

    let db = Builder::new_local(source)
        .flags(OpenFlags::SQLITE_OPEN_READ_ONLY)
        .build()
        .await
        .with_context(|| format!("failed to open kobo database {}", source.display()))?;
    let conn = db.connect()?;
    let columns = resolve_columns(&conn).await?;

    let query = format!("SELECT * FROM {BOOKMARK_TABLE}");
    let mut rows = conn
        .query(&query, ())
        .await
        .with_context(|| format!("failed to read {BOOKMARK_TABLE} from {}", source.display()))?;

    let mut bookmarks = Vec::new();
    while let Some(row) = rows.next().await? {
        bookmarks.push(read_row(&row, &columns));
    }

    if bookmarks.is_empty() {
        tracing::warn!("no rows found in the {} table of {}", BOOKMARK_TABLE, source.display());
    }

    Ok(bookmarks)
}

fn read_row(row: &Row, columns: &BookmarkColumns) -> Result<BookmarkRow, RowError> {
    Ok(BookmarkRow {
        text: text_cell(row, columns.text, TEXT_COLUMN)?,
        annotation: text_cell(row, columns.annotation, ANNOTATION_COLUMN)?,
        volume_id: text_cell(row, columns.volume_id, VOLUME_COLUMN)?,
    })
}

fn text_cell(row: &Row, index: i32, column: &'static str) -> Result<Option<String>, RowError> {
    match row.get_value(index) {
        Ok(Value::Null) => Ok(None),
        Ok(Value::Text(value)) => Ok(Some(value)),
        Ok(_) => Err(RowError::NotText { column }),
        Err(e) => Err(RowError::Malformed(e.to_string())),
    }
}
