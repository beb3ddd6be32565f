//! Multi-level grouping.
//!
//! Rows are grouped once by the full composite key of every group level, then
//! folded outwards one level at a time. Each fold pushes the finer level's
//! output (`value`, `items`, `field`, `aggregates`) into the coarser level's
//! `items`. Aggregates above the innermost fold are computed from the finer
//! level's aggregates, never from raw rows.

use bson::{Bson, Document, doc};
use gridpipe_query::{Aggregate, Group};

/// Ordered `sanitized key → field reference` pairs used as a `$group` `_id`.
///
/// Immutable: trimming a level returns a new key so earlier levels keep
/// theirs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeKey {
    entries: Vec<(String, String)>,
}

impl CompositeKey {
    /// Key over raw document fields: `{dataemail: "$data.email", ...}`.
    pub fn over_fields(groups: &[Group]) -> Self {
        Self {
            entries: groups
                .iter()
                .map(|g| (g.key(), format!("${}", g.field)))
                .collect(),
        }
    }

    /// Key over a previous `$group` identifier: `{dataemail: "$_id.dataemail", ...}`.
    pub fn over_identifier(groups: &[Group]) -> Self {
        Self {
            entries: groups
                .iter()
                .map(|g| {
                    let key = g.key();
                    let reference = format!("$_id.{key}");
                    (key, reference)
                })
                .collect(),
        }
    }

    pub fn without(&self, key: &str) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|(k, _)| k != key)
                .cloned()
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_document(&self) -> Document {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), Bson::String(v.clone())))
            .collect()
    }
}

/// `$group`/`$sort` pairs from the innermost level outwards, then the final
/// `$project`. Empty when there are no groups.
pub fn rollup_stages(groups: &[Group], aggregates: &[Aggregate]) -> Vec<Document> {
    let Some(outermost) = groups.first() else {
        return Vec::new();
    };
    let innermost = groups.len() - 1;
    let mut stages = Vec::with_capacity(2 * groups.len() + 1);
    let mut ids = CompositeKey::over_identifier(groups);

    for depth in (0..groups.len()).rev() {
        let group = &groups[depth];
        let mut sort_key = format!("_id.{}", group.key());

        if depth == innermost {
            stages.push(doc! {
                "$group": {
                    "_id": CompositeKey::over_fields(groups).to_document(),
                    "items": { "$push": "$$ROOT" },
                }
            });
        } else {
            let finer = &groups[depth + 1];
            let finer_key = finer.key();
            let id = if depth == 0 {
                sort_key = "_id".to_string();
                Bson::String(format!("$_id.{}", group.key()))
            } else {
                ids = ids.without(&finer_key);
                Bson::Document(ids.to_document())
            };
            let over_rows = depth + 1 == innermost;
            stages.push(doc! {
                "$group": {
                    "_id": id,
                    "items": {
                        "$push": {
                            "value": format!("$_id.{finer_key}"),
                            "items": "$items",
                            "field": finer.field.as_str(),
                            "aggregates": aggregates_block(aggregates, over_rows),
                        }
                    },
                }
            });
        }

        stages.push(doc! { "$sort": { sort_key: group.direction.order() } });
    }

    stages.push(final_projection(outermost, groups.len(), aggregates));
    stages
}

/// Expose the outermost level as `{value, items, field, aggregates}`.
///
/// With one level the identifier is still the composite key, so `value`
/// reads the field out of it; otherwise the identifier is the value.
fn final_projection(outermost: &Group, levels: usize, aggregates: &[Aggregate]) -> Document {
    let single_level = levels == 1;
    let value = if single_level {
        format!("$_id.{}", outermost.key())
    } else {
        "$_id".to_string()
    };
    doc! {
        "$project": {
            "_id": 0,
            "value": value,
            "items": "$items",
            "field": outermost.field.as_str(),
            "aggregates": aggregates_block(aggregates, single_level),
        }
    }
}

/// `{<key>: {<kind>: {<accumulator>: <source>}}}` for every aggregate.
///
/// `over_rows` means `items` holds raw documents; otherwise it holds the
/// previous level's output and the previous aggregates are rolled up.
fn aggregates_block(aggregates: &[Aggregate], over_rows: bool) -> Document {
    let mut block = Document::new();
    for aggregate in aggregates {
        let key = aggregate.key();
        let kind = aggregate.kind.as_str();
        let source = if over_rows {
            format!("$items.{}", aggregate.field)
        } else {
            format!("$items.aggregates.{key}.{kind}")
        };
        let mut expression = Document::new();
        expression.insert(aggregate.kind.accumulator(), source);

        match block.get_mut(&key) {
            Some(Bson::Document(kinds)) => {
                kinds.insert(kind, expression);
            }
            _ => {
                let mut kinds = Document::new();
                kinds.insert(kind, expression);
                block.insert(key, kinds);
            }
        }
    }

    // The engine rejects an empty sub-document in a projection.
    if block.is_empty() {
        block.insert("_", Bson::Null);
    }
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridpipe_query::{AggregateKind, SortDirection};

    fn group(field: &str, direction: SortDirection) -> Group {
        Group {
            field: field.into(),
            direction,
        }
    }

    fn aggregate(field: &str, kind: AggregateKind) -> Aggregate {
        Aggregate {
            field: field.into(),
            kind,
        }
    }

    #[test]
    fn no_groups_no_stages() {
        assert!(rollup_stages(&[], &[aggregate("a", AggregateKind::Sum)]).is_empty());
    }

    #[test]
    fn composite_key_trim_copies() {
        let groups = [
            group("a", SortDirection::Asc),
            group("b.c", SortDirection::Asc),
            group("d", SortDirection::Asc),
        ];
        let full = CompositeKey::over_identifier(&groups);
        let trimmed = full.without("d");
        assert_eq!(full.len(), 3);
        assert_eq!(trimmed.len(), 2);
        assert_eq!(
            trimmed.to_document(),
            doc! { "a": "$_id.a", "bc": "$_id.bc" }
        );
        assert_eq!(
            CompositeKey::over_fields(&groups).to_document(),
            doc! { "a": "$a", "bc": "$b.c", "d": "$d" }
        );
    }

    #[test]
    fn single_level() {
        let stages = rollup_stages(
            &[group("status", SortDirection::Desc)],
            &[aggregate("revenue", AggregateKind::Sum)],
        );
        assert_eq!(
            stages,
            vec![
                doc! {
                    "$group": {
                        "_id": { "status": "$status" },
                        "items": { "$push": "$$ROOT" },
                    }
                },
                doc! { "$sort": { "_id.status": -1 } },
                doc! {
                    "$project": {
                        "_id": 0,
                        "value": "$_id.status",
                        "items": "$items",
                        "field": "status",
                        "aggregates": {
                            "revenue": { "sum": { "$sum": "$items.revenue" } }
                        },
                    }
                },
            ]
        );
    }

    #[test]
    fn empty_aggregates_get_placeholder() {
        let stages = rollup_stages(&[group("status", SortDirection::Asc)], &[]);
        let project = stages.last().unwrap().get_document("$project").unwrap();
        assert_eq!(
            project.get_document("aggregates").unwrap(),
            &doc! { "_": Bson::Null }
        );
    }

    #[test]
    fn three_levels_trim_one_key_per_level() {
        let groups = [
            group("region", SortDirection::Asc),
            group("country", SortDirection::Desc),
            group("city", SortDirection::Asc),
        ];
        let stages = rollup_stages(&groups, &[aggregate("sales", AggregateKind::Max)]);
        // 3 × ($group, $sort) + $project
        assert_eq!(stages.len(), 7);

        assert_eq!(
            stages[0],
            doc! {
                "$group": {
                    "_id": { "region": "$region", "country": "$country", "city": "$city" },
                    "items": { "$push": "$$ROOT" },
                }
            }
        );
        assert_eq!(stages[1], doc! { "$sort": { "_id.city": 1 } });

        assert_eq!(
            stages[2],
            doc! {
                "$group": {
                    "_id": { "region": "$_id.region", "country": "$_id.country" },
                    "items": {
                        "$push": {
                            "value": "$_id.city",
                            "items": "$items",
                            "field": "city",
                            "aggregates": { "sales": { "max": { "$max": "$items.sales" } } },
                        }
                    },
                }
            }
        );
        assert_eq!(stages[3], doc! { "$sort": { "_id.country": -1 } });

        assert_eq!(
            stages[4],
            doc! {
                "$group": {
                    "_id": "$_id.region",
                    "items": {
                        "$push": {
                            "value": "$_id.country",
                            "items": "$items",
                            "field": "country",
                            "aggregates": {
                                "sales": { "max": { "$max": "$items.aggregates.sales.max" } }
                            },
                        }
                    },
                }
            }
        );
        assert_eq!(stages[5], doc! { "$sort": { "_id": 1 } });

        assert_eq!(
            stages[6],
            doc! {
                "$project": {
                    "_id": 0,
                    "value": "$_id",
                    "items": "$items",
                    "field": "region",
                    "aggregates": {
                        "sales": { "max": { "$max": "$items.aggregates.sales.max" } }
                    },
                }
            }
        );
    }

    #[test]
    fn aggregates_sharing_a_key_are_merged() {
        let block = aggregates_block(
            &[
                aggregate("commission.due", AggregateKind::Average),
                aggregate("commission.due", AggregateKind::Sum),
                aggregate("total", AggregateKind::Count),
            ],
            true,
        );
        assert_eq!(
            block,
            doc! {
                "commissiondue": {
                    "average": { "$avg": "$items.commission.due" },
                    "sum": { "$sum": "$items.commission.due" },
                },
                "total": { "count": { "$count": "$items.total" } },
            }
        );
    }
}
