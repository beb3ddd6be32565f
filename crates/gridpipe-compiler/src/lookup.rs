use std::collections::HashSet;

use bson::{Bson, Document, doc};
use gridpipe_query::{Filter, Lookup};

/// `$lookup` stages in the given order, each single-cardinality join followed
/// by an `$addFields` that replaces the joined array with its first element.
pub fn lookup_stages<'a, I>(lookups: I) -> Vec<Document>
where
    I: IntoIterator<Item = &'a Lookup>,
{
    let mut stages = Vec::new();
    for lookup in lookups {
        stages.push(doc! {
            "$lookup": {
                "from": lookup.from.as_str(),
                "localField": lookup.local_field.as_str(),
                "foreignField": lookup.foreign_field.as_str(),
                "as": lookup.alias.as_str(),
            }
        });
        if lookup.single {
            stages.push(doc! {
                "$addFields": {
                    (lookup.alias.as_str()): {
                        "$ifNull": [
                            { "$arrayElemAt": [format!("${}", lookup.alias), 0] },
                            Bson::Null,
                        ]
                    }
                }
            });
        }
    }
    stages
}

/// Lookups a count needs: those whose alias is the root of a filtered field,
/// plus whatever earlier lookups they are chained from. Declaration order is
/// kept.
pub fn required_lookups<'a>(lookups: &'a [Lookup], filter: &Filter) -> Vec<&'a Lookup> {
    let mut needed: HashSet<&str> = filter.root_fields().collect();
    let mut keep = vec![false; lookups.len()];

    // A chained lookup can only read aliases declared before it.
    for (i, lookup) in lookups.iter().enumerate().rev() {
        if needed.contains(lookup.alias.as_str()) {
            keep[i] = true;
            needed.insert(lookup.local_root());
        }
    }

    lookups
        .iter()
        .zip(keep)
        .filter_map(|(lookup, kept)| kept.then_some(lookup))
        .collect()
}
