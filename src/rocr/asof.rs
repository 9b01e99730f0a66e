use chrono::NaiveDate;
use log::debug;
use std::collections::HashMap;
use std::fmt;

use super::fields::{RATING_ACTION_DATE, RATING_SUBTYPE, RATING_TYPE, RATING_TYPE_TERM};
use crate::core::types::Record;
use crate::error::{RatingError, Result};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse an ISO 8601 calendar date (`YYYY-MM-DD`).
pub fn parse_iso_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|source| RatingError::InvalidDate {
        value: value.to_string(),
        source,
    })
}

/// Containers whose items are individual rating actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingDetail {
    /// `OD`: ratings of one obligor.
    Obligor,
    /// `IND`: ratings of one instrument.
    Instrument,
}

impl RatingDetail {
    pub fn from_container(tag: &str) -> Option<Self> {
        match tag {
            "OD" => Some(RatingDetail::Obligor),
            "IND" => Some(RatingDetail::Instrument),
            _ => None,
        }
    }
}

impl fmt::Display for RatingDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RatingDetail::Obligor => write!(f, "obligor"),
            RatingDetail::Instrument => write!(f, "instrument"),
        }
    }
}

/// (rating type, rating subtype, rating type term)
type RatingKey = (Option<String>, Option<String>, Option<String>);

fn field(record: &Record, key: &str) -> Option<String> {
    record.get(key).cloned().flatten()
}

fn rating_action_date(record: &Record) -> Result<NaiveDate> {
    match record.get(RATING_ACTION_DATE) {
        Some(Some(value)) => parse_iso_date(value),
        _ => Err(RatingError::MissingRequiredField(RATING_ACTION_DATE)),
    }
}

/// Reduces rating histories to the ratings in effect on a cutoff date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AsOfFilter {
    cutoff: NaiveDate,
}

impl AsOfFilter {
    pub fn new(cutoff: NaiveDate) -> Self {
        Self { cutoff }
    }

    pub fn cutoff(&self) -> NaiveDate {
        self.cutoff
    }

    /// Post-process the records flattened from `container`.
    ///
    /// Only rating-detail containers are filtered; the records of any other
    /// container are returned untouched.
    pub fn apply(&self, records: Vec<Record>, container: &str) -> Result<Vec<Record>> {
        match RatingDetail::from_container(container) {
            Some(detail) => {
                let total = records.len();
                let kept = self.latest_per_key(records)?;
                debug!(
                    "as of {}: kept {} of {} {} ratings",
                    self.cutoff,
                    kept.len(),
                    total,
                    detail
                );
                Ok(kept)
            }
            None => Ok(records),
        }
    }

    /// Keep, for each (RT, RST, RTT) key, the latest rating on or before the
    /// cutoff. Output follows the order in which keys were first seen.
    pub fn latest_per_key(&self, records: Vec<Record>) -> Result<Vec<Record>> {
        let mut slots: HashMap<RatingKey, usize> = HashMap::new();
        let mut latest: Vec<(NaiveDate, Record)> = Vec::new();

        for record in records {
            let rad = rating_action_date(&record)?;
            if rad > self.cutoff {
                continue;
            }
            let key = (
                field(&record, RATING_TYPE),
                field(&record, RATING_SUBTYPE),
                field(&record, RATING_TYPE_TERM),
            );
            match slots.get(&key) {
                // Equal dates: the later record replaces the earlier one.
                Some(&slot) if latest[slot].0 <= rad => latest[slot] = (rad, record),
                Some(_) => {}
                None => {
                    slots.insert(key, latest.len());
                    latest.push((rad, record));
                }
            }
        }

        Ok(latest.into_iter().map(|(_, record)| record).collect())
    }
}
