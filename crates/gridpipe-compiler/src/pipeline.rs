use bson::{Document, doc};
use gridpipe_query::QuerySpec;
use tracing::debug;

use crate::filter::match_document;
use crate::lookup::{lookup_stages, required_lookups};
use crate::rollup::rollup_stages;

/// Both plans for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    /// Row-returning pipeline.
    pub pipeline: Vec<Document>,
    /// Pipeline ending in `{$count: "total"}`.
    pub total: Vec<Document>,
}

/// Lowers a [`QuerySpec`] into aggregation stages.
///
/// Holds no state besides the borrowed spec; compiling twice yields equal
/// pipelines.
pub struct Compiler<'a> {
    spec: &'a QuerySpec,
}

impl<'a> Compiler<'a> {
    pub fn new(spec: &'a QuerySpec) -> Self {
        Self { spec }
    }

    /// Stage order:
    /// preprocessing → joins → `id` normalization → `$match` → rollup →
    /// `$sort` → `$skip`/`$limit`.
    pub fn pipeline(&self) -> Vec<Document> {
        let spec = self.spec;
        let mut stages = spec.preprocessing.clone();

        stages.extend(lookup_stages(&spec.lookups));
        stages.extend(identifier_stages());

        if !spec.filter.is_empty() {
            stages.push(doc! { "$match": match_document(&spec.filter) });
        }

        stages.extend(rollup_stages(&spec.groups, &spec.aggregates));

        if let Some(sort) = spec.retained_sort() {
            stages.push(doc! { "$sort": { (sort.field.as_str()): sort.direction.order() } });
        }

        if spec.is_paged() {
            stages.push(doc! { "$skip": to_i64(spec.skip()) });
            stages.push(doc! { "$limit": to_i64(spec.page_size) });
        }

        debug!(
            stages = stages.len(),
            lookups = spec.lookups.len(),
            conditions = spec.filter.conditions.len(),
            groups = spec.groups.len(),
            "compiled data pipeline"
        );
        stages
    }

    /// Count plan. Joins no condition depends on are left out.
    pub fn total_pipeline(&self) -> Vec<Document> {
        let spec = self.spec;
        let mut stages = spec.preprocessing.clone();
        stages.extend(identifier_stages());

        let lookups = required_lookups(&spec.lookups, &spec.filter);
        let pruned = spec.lookups.len() - lookups.len();
        stages.extend(lookup_stages(lookups));

        if !spec.filter.is_empty() {
            stages.push(doc! { "$match": match_document(&spec.filter) });
        }

        stages.push(doc! { "$count": "total" });

        debug!(stages = stages.len(), pruned, "compiled total pipeline");
        stages
    }

    pub fn compile(&self) -> CompiledQuery {
        CompiledQuery {
            pipeline: self.pipeline(),
            total: self.total_pipeline(),
        }
    }
}

pub fn compile(spec: &QuerySpec) -> CompiledQuery {
    Compiler::new(spec).compile()
}

/// Expose `_id` as `id` and drop the original.
fn identifier_stages() -> [Document; 2] {
    [
        doc! { "$addFields": { "id": "$_id" } },
        doc! { "$project": { "_id": 0 } },
    ]
}

fn to_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
