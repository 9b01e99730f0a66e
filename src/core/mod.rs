pub mod config;
pub mod types;

pub use config::{ExportConfig, HeaderStyle};
pub use types::{RatingType, Record};
