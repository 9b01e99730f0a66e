pub mod core;
pub mod error;
pub mod rocr;
pub mod utils;

// Re-exports
pub use self::core::{ExportConfig, HeaderStyle, RatingType, Record};
pub use error::{RatingError, Result};
pub use rocr::{export, ratings_to_csv, xml_to_records, ExportSummary};
pub use utils::progress::ProgressTracker;
