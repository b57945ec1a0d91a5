use crate::db::HighlightStore;
use crate::model::Highlight;
use anyhow::Result;
use rand::Rng;
use rand::seq::index;
use std::path::Path;

/// Draws `count` records uniformly at random without replacement, in draw
/// order. Returns every record when fewer than `count` exist.
pub fn choose_uniform<R: Rng + ?Sized>(records: Vec<Highlight>, count: usize, rng: &mut R) -> Vec<Highlight> {
    let amount = count.min(records.len());
    let mut slots: Vec<Option<Highlight>> = records.into_iter().map(Some).collect();

    index::sample(rng, slots.len(), amount)
        .into_iter()
        .filter_map(|i| slots[i].take())
        .collect()
}

pub async fn sample_random<R: Rng + ?Sized>(store_path: &Path, count: usize, rng: &mut R) -> Result<Vec<Highlight>> {
    let records = {
        let store = HighlightStore::open_existing(store_path).await?;
        store.select_all().await?
    };
    let available = records.len();
    let picked = choose_uniform(records, count, rng);

    tracing::info!(
        requested = count,
        available,
        picked = picked.len(),
        "sampled highlights from {}",
        store_path.display()
    );

    Ok(picked)
}
