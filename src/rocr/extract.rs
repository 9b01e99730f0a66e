use chrono::NaiveDate;
use roxmltree::{Document, Node};

use super::asof::AsOfFilter;
use super::decode::parse_entry;
use super::fields::{is_ratings_element, AGENCY_NAME, FILE_CREATION_DATE};
use super::flatten::flatten;
use crate::core::types::{RatingType, Record};
use crate::error::Result;

/// First element below the document root named `local`, in document order.
fn find_first<'a, 'input>(document: &'a Document<'input>, local: &str) -> Option<Node<'a, 'input>> {
    document
        .root_element()
        .descendants()
        .skip(1)
        .find(|node| is_ratings_element(*node, local))
}

/// Text of the first element named `local`; empty if the element has none.
fn find_text(document: &Document<'_>, local: &str) -> Option<String> {
    find_first(document, local).map(|node| node.text().unwrap_or_default().to_string())
}

/// Extract the rating records of one document.
///
/// Documents without the rating type's root element yield no records.
/// Every record is stamped with the agency name and file creation date.
pub fn extract_records(
    document: &Document<'_>,
    rating_type: RatingType,
    filter: Option<&AsOfFilter>,
) -> Result<Vec<Record>> {
    let Some(element) = find_first(document, rating_type.root_tag()) else {
        return Ok(Vec::new());
    };

    let mut records = flatten(element, filter)?;

    let agency_name = find_text(document, AGENCY_NAME);
    let file_creation_date = find_text(document, FILE_CREATION_DATE);
    for record in &mut records {
        record.insert(AGENCY_NAME.to_string(), agency_name.clone());
        record.insert(FILE_CREATION_DATE.to_string(), file_creation_date.clone());
    }

    Ok(records)
}

/// Parse one XML document and extract its rating records.
pub fn xml_to_records(
    content: &str,
    rating_type: RatingType,
    asof: Option<NaiveDate>,
) -> Result<Vec<Record>> {
    let document = parse_entry("<memory>", content)?;
    let filter = asof.map(AsOfFilter::new);
    extract_records(&document, rating_type, filter.as_ref())
}
