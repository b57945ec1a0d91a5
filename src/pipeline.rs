use crate::config::Config;
use crate::db::HighlightStore;
use crate::error::PipelineError;
use crate::ingest::ImportStats;
use crate::kobo;
use crate::manual;
use crate::merge::{MergeOutcome, merge};
use crate::model::Highlight;
use crate::sample::sample_random;
use anyhow::Result;
use rand::Rng;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Disabled,
    AlreadyBuilt,
    Ran(ImportStats),
}

#[derive(Debug)]
pub struct RunSummary {
    pub kobo: StepStatus,
    pub manual: StepStatus,
    pub merge: Option<MergeOutcome>,
    pub final_store: PathBuf,
    pub quotes: Vec<Highlight>,
}

/// The store the sampler reads from, given which sources are enabled.
pub fn final_store(cfg: &Config) -> Result<&Path, PipelineError> {
    match (cfg.sources.use_kobo, cfg.sources.use_manual) {
        (true, true) => Ok(cfg.paths.merged_db.as_path()),
        (true, false) => Ok(cfg.paths.extracted_db.as_path()),
        (false, true) => Ok(cfg.paths.manual_db.as_path()),
        (false, false) => Err(PipelineError::NoSourceEnabled),
    }
}

/// Runs one batch: extraction, import and merge as configured, each skipped if
/// its store already exists, then samples the final store.
///
/// Steps run strictly one after the other. A failure leaves the stores of the
/// steps already finished in place, so the run can be repeated.
pub async fn run<R: Rng + ?Sized>(cfg: &Config, rng: &mut R) -> Result<RunSummary> {
    let final_path = final_store(cfg)?.to_path_buf();
    let paths = &cfg.paths;

    let kobo = if cfg.sources.use_kobo {
        build_once(&paths.extracted_db, "extraction", move || {
            kobo::extract(&paths.kobo_db, &paths.extracted_db, &paths.extracted_text)
        })
        .await?
    } else {
        StepStatus::Disabled
    };

    let manual = if cfg.sources.use_manual {
        build_once(&paths.manual_db, "manual quotes import", move || {
            manual::import_manual(&paths.manual_quotes, &paths.manual_db)
        })
        .await?
    } else {
        StepStatus::Disabled
    };

    let merged = if cfg.sources.use_kobo && cfg.sources.use_manual {
        Some(merge(&paths.extracted_db, &paths.manual_db, &paths.merged_db).await?)
    } else {
        None
    };

    let quotes = sample_random(&final_path, cfg.report.sample_count, rng).await?;

    Ok(RunSummary {
        kobo,
        manual,
        merge: merged,
        final_store: final_path,
        quotes,
    })
}

async fn build_once<F, Fut>(dest: &Path, step: &str, build: F) -> Result<StepStatus>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<ImportStats>>,
{
    if HighlightStore::exists(dest) {
        tracing::info!("database {} already exists, skipping {}", dest.display(), step);
        return Ok(StepStatus::AlreadyBuilt);
    }

    let stats = build().await?;
    Ok(StepStatus::Ran(stats))
}
