use crate::error::PipelineError;
use crate::model::{Highlight, Identity};
use anyhow::{Context, Result};
use libsql::{Builder, Connection, Database as LibsqlDatabase, OpenFlags};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

const SCHEMA: &[(&str, &str)] = &[("001_highlights.sql", include_str!("migrations/001_highlights.sql"))];

/// A single-table SQLite store of highlights.
///
/// The store does not enforce uniqueness itself. Writers load the existing
/// identities first and only insert what is new.
pub struct HighlightStore {
    _db: LibsqlDatabase,
    conn: Connection,
    path: PathBuf,
    tx_lock: Mutex<()>,
}

impl HighlightStore {
    pub fn exists(path: &Path) -> bool {
        path.exists()
    }

    /// Opens the store at `path`, creating the file and the table if needed.
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }

        let db = Builder::new_local(path)
            .build()
            .await
            .with_context(|| format!("failed to open highlight store {}", path.display()))?;
        let store = Self::connect(db, path).await?;

        for (name, sql) in SCHEMA {
            tracing::debug!("applying schema {} to {}", name, path.display());
            store
                .conn
                .execute_batch(sql)
                .await
                .map_err(|e| anyhow::anyhow!("failed to apply schema {name} to {}: {e}", path.display()))?;
        }

        Ok(store)
    }

    /// Opens an existing store read-only. The schema is left as found.
    pub async fn open_existing(path: &Path) -> Result<Self> {
        if !Self::exists(path) {
            return Err(PipelineError::StoreMissing(path.to_path_buf()).into());
        }

        let db = Builder::new_local(path)
            .flags(OpenFlags::SQLITE_OPEN_READ_ONLY)
            .build()
            .await
            .with_context(|| format!("failed to open highlight store {}", path.display()))?;
        Self::connect(db, path).await
    }

    async fn connect(db: LibsqlDatabase, path: &Path) -> Result<Self> {
        let conn = db.connect()?;
        conn.query("SELECT 1", ()).await?;

        Ok(HighlightStore {
            _db: db,
            conn,
            path: path.to_path_buf(),
            tx_lock: Mutex::new(()),
        })
    }

    pub async fn load_existing_identities(&self) -> Result<HashSet<Identity>> {
        let mut rows = self
            .conn
            .query("SELECT Text, Annotation, Source FROM Highlights", ())
            .await?;
        let mut identities = HashSet::new();

        while let Some(row) = rows.next().await? {
            identities.insert(Identity {
                text: row.get(0)?,
                annotation: row.get(1)?,
                source: row.get(2)?,
            });
        }

        Ok(identities)
    }

    /// Appends one record and returns its id. No duplicate check happens here.
    pub async fn insert(&self, identity: &Identity) -> Result<i64> {
        let query = "INSERT INTO Highlights (Text, Annotation, Source) VALUES (?, ?, ?)";
        self.conn
            .execute(
                query,
                libsql::params![
                    identity.text.as_str(),
                    identity.annotation.as_deref(),
                    identity.source.as_deref()
                ],
            )
            .await
            .with_context(|| format!("failed to insert highlight into {}", self.path.display()))?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Appends every identity in order inside one transaction. Either all rows
    /// are committed or none are.
    pub async fn insert_all(&self, identities: &[Identity]) -> Result<usize> {
        let _guard = self.tx_lock.lock().await;

        self.conn.execute("BEGIN TRANSACTION", ()).await?;

        let result = async {
            for identity in identities {
                self.insert(identity).await?;
            }
            Ok::<usize, anyhow::Error>(identities.len())
        }
        .await;

        match result {
            Ok(count) => {
                self.conn.execute("COMMIT", ()).await?;
                Ok(count)
            }
            Err(e) => {
                let _ = self.conn.execute("ROLLBACK", ()).await;
                Err(e)
            }
        }
    }

    pub async fn select_all(&self) -> Result<Vec<Highlight>> {
        let mut rows = self
            .conn
            .query("SELECT id, Text, Annotation, Source FROM Highlights ORDER BY id", ())
            .await?;
        let mut highlights = Vec::new();

        while let Some(row) = rows.next().await? {
            highlights.push(Highlight {
                id: row.get(0)?,
                text: row.get(1)?,
                annotation: row.get(2)?,
                source: row.get(3)?,
            });
        }

        Ok(highlights)
    }

    pub async fn count(&self) -> Result<u64> {
        let mut rows = self.conn.query("SELECT COUNT(*) FROM Highlights", ()).await?;
        match rows.next().await? {
            Some(row) => Ok(row.get::<i64>(0)? as u64),
            None => Ok(0),
        }
    }
}
