//! Manual Quotes Module
//!
//! Imports quotes the reader typed in by hand (paper books, articles) from a CSV
//! file with a header row.
//!
//! # Format
//!
//! ```text
//! Text,Annotation,Source
//! "The map is not the territory.",,Science and Sanity
//! ```
//!
//! `Text` and `Source` are required columns, `Annotation` is optional. Rows
//! without text or without a source are dropped. Like the Kobo extraction, the
//! import is idempotent against the destination store.

mod import;

pub use import::{ManualColumns, import_manual};

pub const TEXT_HEADER: &str = "Text";
pub const ANNOTATION_HEADER: &str = "Annotation";
pub const SOURCE_HEADER: &str = "Source";
