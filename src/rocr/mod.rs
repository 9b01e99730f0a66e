//! Record of Credit Ratings (ROCR) XBRL documents.
//!
//! Rating agencies publish their rating histories as XBRL instance
//! documents, one per obligor or issuer, bundled into ZIP archives. This
//! module flattens those documents into CSV rows.

pub mod asof;
pub mod decode;
pub mod export;
pub mod extract;
pub mod fields;
pub mod flatten;

pub use asof::{parse_iso_date, AsOfFilter, RatingDetail};
pub use export::{export, ratings_to_csv, ExportSummary};
pub use extract::{extract_records, xml_to_records};
pub use flatten::flatten;
