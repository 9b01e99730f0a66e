use log::trace;
use roxmltree::Node;

use super::asof::AsOfFilter;
use super::fields::{ratings_name, sequence_item};
use crate::core::types::Record;
use crate::error::Result;

/// Flatten the subtree under `element` into records.
///
/// Leaf fields found beneath `element` (outside any repeated item) form a
/// shared context. If `element` is a sequence container, each item found
/// beneath it, directly or inside wrapper elements, is flattened recursively
/// and every resulting record receives the shared context; fields of the
/// item record win on collision. A container without items yields no
/// records. Any other element yields exactly one
/// record, the shared context itself.
///
/// With a `filter`, the records of rating-detail containers are reduced to
/// the ratings in effect on the cutoff date.
pub fn flatten(element: Node<'_, '_>, filter: Option<&AsOfFilter>) -> Result<Vec<Record>> {
    let container = ratings_name(element);
    let item_tag = container.and_then(sequence_item);

    let mut context = Record::new();
    let mut items = Vec::new();
    walk(element, item_tag, filter, &mut context, &mut items)?;

    let records = match item_tag {
        None => vec![context],
        Some(_) => items
            .into_iter()
            .map(|mut record| {
                for (key, value) in &context {
                    record.entry(key.clone()).or_insert_with(|| value.clone());
                }
                record
            })
            .collect(),
    };

    match (filter, container) {
        (Some(filter), Some(tag)) => filter.apply(records, tag),
        _ => Ok(records),
    }
}

/// Visit the children of `parent` in document order.
fn walk(
    parent: Node<'_, '_>,
    item_tag: Option<&str>,
    filter: Option<&AsOfFilter>,
    context: &mut Record,
    items: &mut Vec<Record>,
) -> Result<()> {
    for child in parent.children().filter(Node::is_element) {
        if item_tag.is_some() && ratings_name(child) == item_tag {
            items.extend(flatten(child, filter)?);
        } else if child.children().any(|n| n.is_element()) {
            walk(child, item_tag, filter, context, items)?;
        } else if let Some(key) = ratings_name(child) {
            context.insert(key.to_string(), child.text().map(String::from));
        } else {
            trace!("ignoring foreign leaf {:?}", child.tag_name());
        }
    }
    Ok(())
}
