use crate::db::HighlightStore;
use crate::model::Identity;
use anyhow::Result;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Merged { from_first: usize, from_second: usize },
    AlreadyBuilt,
}

/// Builds `merged` from every record of `first` followed by every record of
/// `second`.
///
/// Runs at most once per destination: an existing `merged` store is left
/// untouched, whatever happened to the inputs since. No deduplication happens
/// across the two inputs.
pub async fn merge(first: &Path, second: &Path, merged: &Path) -> Result<MergeOutcome> {
    if HighlightStore::exists(merged) {
        tracing::info!("merged database {} already exists, skipping merge", merged.display());
        return Ok(MergeOutcome::AlreadyBuilt);
    }

    let first_records = read_identities(first).await?;
    let second_records = read_identities(second).await?;

    let store = HighlightStore::open(merged).await?;
    let from_first = first_records.len();
    let from_second = second_records.len();
    let mut all = first_records;
    all.extend(second_records);
    store.insert_all(&all).await?;

    tracing::info!(
        from_first,
        from_second,
        "merged highlights written to new database {}",
        merged.display()
    );

    Ok(MergeOutcome::Merged {
        from_first,
        from_second,
    })
}

async fn read_identities(path: &Path) -> Result<Vec<Identity>> {
    let store = HighlightStore::open_existing(path).await?;
    let records = store.select_all().await?;
    Ok(records.into_iter().map(|h| h.into_identity()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use tempfile::tempdir;

    fn identity(text: &str, source: &str) -> Identity {
        Identity::new(text.to_string(), None, Some(source.to_string()))
    }

    async fn store_with(path: &Path, identities: &[Identity]) {
        let store = HighlightStore::open(path).await.expect("open");
        store.insert_all(identities).await.expect("insert");
    }

    #[tokio::test]
    async fn test_merge_appends_first_then_second_without_dedup() {
        let dir = tempdir().expect("tempdir");
        let kobo = dir.path().join("kobo.db");
        let manual = dir.path().join("manual.db");
        let merged = dir.path().join("merged.db");
        store_with(&kobo, &[identity("a", "K"), identity("shared", "X")]).await;
        store_with(&manual, &[identity("shared", "X"), identity("b", "M")]).await;

        let outcome = merge(&kobo, &manual, &merged).await.expect("merge");
        assert_eq!(
            outcome,
            MergeOutcome::Merged {
                from_first: 2,
                from_second: 2
            }
        );

        let store = HighlightStore::open_existing(&merged).await.expect("open");
        let identities: Vec<Identity> = store
            .select_all()
            .await
            .expect("select")
            .into_iter()
            .map(|h| h.into_identity())
            .collect();
        assert_eq!(
            identities,
            vec![
                identity("a", "K"),
                identity("shared", "X"),
                identity("shared", "X"),
                identity("b", "M")
            ]
        );
    }

    #[tokio::test]
    async fn test_second_merge_is_a_no_op() {
        let dir = tempdir().expect("tempdir");
        let kobo = dir.path().join("kobo.db");
        let manual = dir.path().join("manual.db");
        let merged = dir.path().join("merged.db");
        store_with(&kobo, &[identity("a", "K")]).await;
        store_with(&manual, &[identity("b", "M")]).await;

        merge(&kobo, &manual, &merged).await.expect("first merge");
        store_with(&kobo, &[identity("late", "K")]).await;
        store_with(&manual, &[identity("later", "M")]).await;
        let outcome = merge(&kobo, &manual, &merged).await.expect("second merge");

        assert_eq!(outcome, MergeOutcome::AlreadyBuilt);
        let store = HighlightStore::open_existing(&merged).await.expect("open");
        assert_eq!(store.count().await.expect("count"), 2);
    }

    #[tokio::test]
    async fn test_missing_input_leaves_no_destination() {
        let dir = tempdir().expect("tempdir");
        let kobo = dir.path().join("kobo.db");
        let merged = dir.path().join("merged.db");
        store_with(&kobo, &[identity("a", "K")]).await;

        let err = merge(&kobo, &dir.path().join("absent.db"), &merged)
            .await
            .expect_err("second input is missing");
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::StoreMissing(_))
        ));
        assert!(!merged.exists());
    }
}
