//! Error types for rating extraction and CSV export.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RatingError>;

/// Errors that can occur while turning rating archives into CSV.
#[derive(Debug, Error)]
pub enum RatingError {
    /// Rating type argument is neither `obligor` nor `issuer`.
    #[error("invalid rating type: {0} (expected one of: {1})")]
    InvalidRatingType(String, &'static str),

    /// A date that must be ISO 8601 (`YYYY-MM-DD`) could not be parsed.
    #[error("invalid date '{value}': {source}")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// Archive entry bytes are not valid text in the detected encoding.
    #[error("entry {entry} is not valid {encoding}")]
    EntryDecode {
        entry: String,
        encoding: &'static str,
    },

    /// Archive entry is not well-formed XML.
    #[error("entry {entry} is not well-formed XML: {source}")]
    Xml {
        entry: String,
        #[source]
        source: roxmltree::Error,
    },

    /// A field the as-of filter depends on is absent from a rating record.
    #[error("rating record is missing required field {0}")]
    MissingRequiredField(&'static str),

    #[error("failed to read archive {path}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RatingError {
    /// Whether the error only spoils the archive entry it came from.
    ///
    /// The export loop skips such entries and carries on with the rest of
    /// the archive; every other error aborts the run.
    pub fn is_entry_local(&self) -> bool {
        matches!(self, RatingError::EntryDecode { .. } | RatingError::Xml { .. })
    }
}
