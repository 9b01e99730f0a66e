use chrono::NaiveDate;
use std::path::PathBuf;

use super::types::RatingType;
use crate::rocr::asof::AsOfFilter;
use crate::rocr::fields::Column;

/// Which name of each column goes into the CSV header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HeaderStyle {
    /// Taxonomy tags, e.g. `RAD`.
    #[default]
    Short,
    /// Descriptive names, e.g. `rating_action_date`.
    Long,
}

impl HeaderStyle {
    pub fn header(&self, column: &Column) -> &'static str {
        match self {
            HeaderStyle::Short => column.key,
            HeaderStyle::Long => column.long_name,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ExportConfig {
    pub zip_path: PathBuf,
    pub csv_path: PathBuf,
    pub rating_type: RatingType,
    pub asof: Option<NaiveDate>,
    pub header_style: HeaderStyle,
    pub show_progress: bool,
}

impl ExportConfig {
    pub fn new(
        zip_path: impl Into<PathBuf>,
        csv_path: impl Into<PathBuf>,
        rating_type: RatingType,
    ) -> Self {
        Self {
            zip_path: zip_path.into(),
            csv_path: csv_path.into(),
            rating_type,
            asof: None,
            header_style: HeaderStyle::default(),
            show_progress: false,
        }
    }

    pub fn with_asof(mut self, asof: Option<NaiveDate>) -> Self {
        self.asof = asof;
        self
    }

    pub fn with_header_style(mut self, header_style: HeaderStyle) -> Self {
        self.header_style = header_style;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn filter(&self) -> Option<AsOfFilter> {
        self.asof.map(AsOfFilter::new)
    }
}
