//! Kobo Extraction Module
//!
//! Pulls highlights out of the `KoboReader.sqlite` database an e-reader keeps on
//! its internal storage and appends the new ones to a highlight store.
//!
//! # Architecture
//!
//! - Every highlight or note is a row of the `Bookmark` table
//! - Only `Text`, `Annotation` and `VolumeID` are read, located by name
//! - Extraction is idempotent: identities already in the destination are skipped
//! - New highlights are also written to a plain text file for inspection
//!
//! # Usage
//!
//! ```rust,ignore
//! use recall::kobo;
//!
//! let stats = kobo::extract(&kobo_db, &extracted_db, &extracted_text).await?;
//! ```

mod columns;
mod extract;

pub use columns::{BookmarkColumns, resolve_columns};
pub use extract::{extract, format_block};

pub const BOOKMARK_TABLE: &str = "Bookmark";
pub const TEXT_COLUMN: &str = "Text";
pub const ANNOTATION_COLUMN: &str = "Annotation";
pub const VOLUME_COLUMN: &str = "VolumeID";
