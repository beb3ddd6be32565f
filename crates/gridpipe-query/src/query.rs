use bson::Document;

use crate::filter::Filter;
use crate::group::{Aggregate, Group};
use crate::lookup::Lookup;
use crate::sort::Sort;

/// Structured form of one grid request.
///
/// Built by the [`Decoder`](crate::Decoder) (plus caller-supplied lookups and
/// preprocessing stages) and only read afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuerySpec {
    /// 1-based page; 0 means unpaged.
    pub page: usize,
    /// 0 means unpaged.
    pub page_size: usize,
    /// Only the last entry is applied.
    pub sort: Vec<Sort>,
    pub groups: Vec<Group>,
    pub aggregates: Vec<Aggregate>,
    pub lookups: Vec<Lookup>,
    pub filter: Filter,
    /// Opaque stages placed verbatim at the front of every pipeline.
    pub preprocessing: Vec<Document>,
}

impl QuerySpec {
    pub fn with_lookups(mut self, lookups: Vec<Lookup>) -> Self {
        self.lookups = lookups;
        self
    }

    pub fn with_preprocessing(mut self, stages: Vec<Document>) -> Self {
        self.preprocessing = stages;
        self
    }

    pub fn retained_sort(&self) -> Option<&Sort> {
        self.sort.last()
    }

    pub fn is_paged(&self) -> bool {
        self.page_size > 0
    }

    /// Zero-based row offset of the requested page.
    pub fn skip(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }
}

/// Field path with the dots removed, usable as a single document key.
pub fn sanitize_key(field: &str) -> String {
    field.replace('.', "")
}
