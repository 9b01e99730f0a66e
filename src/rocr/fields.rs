//! Record of Credit Ratings (ROCR) taxonomy tables.
//!
//! Short tags are the local names used in the XBRL documents; the long
//! names are the descriptive column names offered with `--long-names`.

use once_cell::sync::Lazy;
use roxmltree::Node;

use crate::core::types::RatingType;

pub const RATINGS_NAMESPACE: &str = "http://xbrl.sec.gov/ratings/2015-03-31";

pub const OBLIGOR_ROOT: &str = "OD";
pub const ISSUER_ROOT: &str = "ISD";

pub const AGENCY_NAME: &str = "RAN";
pub const FILE_CREATION_DATE: &str = "FCD";

pub const RATING_ACTION_DATE: &str = "RAD";
pub const RATING_TYPE: &str = "RT";
pub const RATING_SUBTYPE: &str = "RST";
pub const RATING_TYPE_TERM: &str = "RTT";

/// Ordered short tag -> long column name pairs.
pub type FieldDictionary = &'static [(&'static str, &'static str)];

/// Container tag -> tag of the children that repeat inside it.
pub const SEQUENCE_TAGS: &[(&str, &str)] = &[
    ("OD", "ORD"),   // obligor detail -> obligor rating detail
    ("ISD", "IND"),  // issuer detail -> instrument detail
    ("IND", "IRD"),  // instrument detail -> instrument rating detail
];

pub const AGENCY_FIELDS: FieldDictionary = &[
    ("RAN", "rating_agency_name"),
    ("FCD", "file_creation_date"),
];

pub const OBLIGOR_FIELDS: FieldDictionary = &[
    ("OSC", "obligor_subclass"),
    ("OIG", "obligor_industry_group"),
    ("OBNAME", "obligor_name"),
    ("LEI", "legal_entity_identifier"),
    ("CIK", "central_index_key"),
    ("OI", "obligor_identifier"),
    ("OIS", "obligor_identifier_schema"),
    ("OIOS", "obligor_identifier_other_schema"),
];

pub const ISSUER_FIELDS: FieldDictionary = &[
    ("SSC", "sec_subcategory"),
    ("IG", "industry_group"),
    ("ISSNAME", "issuer_name"),
    ("ISI", "issuer_identifier"),
    ("ISIS", "issuer_identifier_scheme"),
    ("ISIOS", "issuer_identifier_other_scheme"),
    ("OBT", "object_type"),
    ("INSTNAME", "instrument_name"),
    ("CUSIP", "cusip"),
    ("INI", "instrument_identifier"),
    ("INIS", "instrument_identifier_scheme"),
    ("INIOS", "instrument_identifier_other_scheme"),
    ("IRTD", "interest_rate_type_description"),
    ("CR", "coupon_rate"),
    ("MD", "maturity_date"),
    ("PV", "par_value"),
    ("ISUD", "issuance_date"),
    ("RODC", "other_debt_category"),
];

pub const RATING_FIELDS: FieldDictionary = &[
    ("IP", "issuer_paid"),
    ("R", "rating"),
    ("RAD", "rating_action_date"),
    ("RAC", "rating_action_classification"),
    ("WST", "watch_status"),
    ("ROL", "rating_outlook"),
    ("OAN", "other_announcement"),
    ("RT", "rating_type"),
    ("RST", "rating_subtype"),
    ("RTT", "rating_type_term"),
];

/// A CSV column: the record key it reads and its long name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub key: &'static str,
    pub long_name: &'static str,
}

fn build_columns(rating_type: RatingType) -> Vec<Column> {
    rating_type
        .dictionaries()
        .iter()
        .flat_map(|dict| dict.iter())
        .map(|&(key, long_name)| Column { key, long_name })
        .collect()
}

static OBLIGOR_COLUMNS: Lazy<Vec<Column>> = Lazy::new(|| build_columns(RatingType::Obligor));
static ISSUER_COLUMNS: Lazy<Vec<Column>> = Lazy::new(|| build_columns(RatingType::Issuer));

/// Output schema for a rating type: agency, type-specific, then rating fields.
pub fn columns(rating_type: RatingType) -> &'static [Column] {
    match rating_type {
        RatingType::Obligor => OBLIGOR_COLUMNS.as_slice(),
        RatingType::Issuer => ISSUER_COLUMNS.as_slice(),
    }
}

/// Item tag for a sequence container, if `container` is one.
pub fn sequence_item(container: &str) -> Option<&'static str> {
    SEQUENCE_TAGS
        .iter()
        .find(|(c, _)| *c == container)
        .map(|&(_, item)| item)
}

/// Local name of an element in the ratings namespace.
pub fn ratings_name<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    let tag = node.tag_name();
    (node.is_element() && tag.namespace() == Some(RATINGS_NAMESPACE)).then(|| tag.name())
}

/// Whether `node` is the ratings-namespace element `local`.
pub fn is_ratings_element(node: Node<'_, '_>, local: &str) -> bool {
    ratings_name(node) == Some(local)
}
