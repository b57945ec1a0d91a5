use anyhow::{Context, Result};
use libsql::Connection;

use super::{ANNOTATION_COLUMN, BOOKMARK_TABLE, TEXT_COLUMN, VOLUME_COLUMN};
use crate::error::PipelineError;

/// Ordinal positions of the columns the extractor reads, as they appear in
/// `SELECT *` over the bookmark table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookmarkColumns {
    pub text: i32,
    pub annotation: i32,
    pub volume_id: i32,
}

/// Looks the required columns up by name. Column order differs between
/// firmware versions.
pub async fn resolve_columns(conn: &Connection) -> Result<BookmarkColumns> {
    let pragma = format!("PRAGMA table_info('{BOOKMARK_TABLE}')");
    let mut rows = conn
        .query(&pragma, ())
        .await
        .with_context(|| format!("failed to inspect schema of {BOOKMARK_TABLE}"))?;

    let mut names = Vec::new();
    while let Some(row) = rows.next().await? {
        let position: i32 = row.get(0)?;
        let name: String = row.get(1)?;
        names.push((position, name));
    }
    tracing::debug!(columns = ?names, "bookmark table layout");

    let find = |column: &'static str| {
        names
            .iter()
            .find(|(_, name)| name == column)
            .map(|(position, _)| *position)
            .ok_or_else(|| PipelineError::MissingColumn {
                table: BOOKMARK_TABLE.to_string(),
                column,
            })
    };

    let columns = BookmarkColumns {
        text: find(TEXT_COLUMN)?,
        annotation: find(ANNOTATION_COLUMN)?,
        volume_id: find(VOLUME_COLUMN)?,
    };
    tracing::debug!(
        "text index: {}, annotation index: {}, source index: {}",
        columns.text,
        columns.annotation,
        columns.volume_id
    );

    Ok(columns)
}
