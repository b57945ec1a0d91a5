use std::path::PathBuf;

use thiserror::Error;

/// Fatal conditions a caller may want to tell apart. They abort the run before
/// the affected step writes anything.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no highlight source is enabled, turn on use_kobo or use_manual")]
    NoSourceEnabled,
    #[error("{table} has no column named {column}")]
    MissingColumn { table: String, column: &'static str },
    #[error("source file {0:?} does not exist")]
    SourceMissing(PathBuf),
    #[error("highlight store {0:?} does not exist")]
    StoreMissing(PathBuf),
}

/// Why a single input row was left out. Never fatal.
#[derive(Debug, Error)]
pub enum RowError {
    #[error("text is empty after cleanup")]
    EmptyText,
    #[error("source is empty after cleanup")]
    EmptySource,
    #[error("column {column} holds a non-text value")]
    NotText { column: &'static str },
    #[error("malformed record: {0}")]
    Malformed(String),
}
