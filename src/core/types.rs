use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::{fmt, str::FromStr};
use strum::{EnumIter, IntoEnumIterator};

use crate::error::RatingError;
use crate::rocr::fields::{self, FieldDictionary};

/// A flattened rating record: short tag -> text value.
///
/// `None` is an element that was present without text; absent keys are
/// fields the document never mentioned. Both render as empty CSV cells.
pub type Record = HashMap<String, Option<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum RatingType {
    Obligor,
    Issuer,
}

impl fmt::Display for RatingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RatingType::Obligor => write!(f, "obligor"),
            RatingType::Issuer => write!(f, "issuer"),
        }
    }
}

pub static RATING_TYPES: Lazy<String> = Lazy::new(|| {
    RatingType::iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(", ")
});

impl RatingType {
    pub fn list_types() -> &'static str {
        &RATING_TYPES
    }

    /// Local name of the element whose subtree holds this type's ratings.
    pub fn root_tag(&self) -> &'static str {
        match self {
            RatingType::Obligor => fields::OBLIGOR_ROOT,
            RatingType::Issuer => fields::ISSUER_ROOT,
        }
    }

    /// Dictionary of the fields specific to this rating type.
    pub fn type_fields(&self) -> FieldDictionary {
        match self {
            RatingType::Obligor => fields::OBLIGOR_FIELDS,
            RatingType::Issuer => fields::ISSUER_FIELDS,
        }
    }

    /// The dictionaries making up the CSV schema, in column order.
    pub fn dictionaries(&self) -> [FieldDictionary; 3] {
        [fields::AGENCY_FIELDS, self.type_fields(), fields::RATING_FIELDS]
    }
}

impl FromStr for RatingType {
    type Err = RatingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "obligor" => Ok(RatingType::Obligor),
            "issuer" => Ok(RatingType::Issuer),
            _ => Err(RatingError::InvalidRatingType(
                s.to_string(),
                RatingType::list_types(),
            )),
        }
    }
}
