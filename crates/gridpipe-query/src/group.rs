use serde::{Deserialize, Serialize};

use crate::query::sanitize_key;
use crate::sort::SortDirection;

/// One grouping level. Position in [`QuerySpec::groups`](crate::QuerySpec)
/// encodes nesting: first is outermost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub field: String,
    pub direction: SortDirection,
}

impl Group {
    pub fn key(&self) -> String {
        sanitize_key(&self.field)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregateKind {
    Count,
    Sum,
    Average,
    Min,
    Max,
    /// Kept verbatim and lowered to `$<name>`.
    Other(String),
}

impl AggregateKind {
    pub fn parse(name: &str) -> Self {
        match name {
            "count" => AggregateKind::Count,
            "sum" => AggregateKind::Sum,
            "average" => AggregateKind::Average,
            "min" => AggregateKind::Min,
            "max" => AggregateKind::Max,
            other => AggregateKind::Other(other.to_string()),
        }
    }

    /// Wire name, also used as the output key inside an aggregates block.
    pub fn as_str(&self) -> &str {
        match self {
            AggregateKind::Count => "count",
            AggregateKind::Sum => "sum",
            AggregateKind::Average => "average",
            AggregateKind::Min => "min",
            AggregateKind::Max => "max",
            AggregateKind::Other(name) => name,
        }
    }

    /// Engine accumulator, e.g. `$avg` for `average`.
    pub fn accumulator(&self) -> String {
        match self {
            AggregateKind::Average => "$avg".to_string(),
            other => format!("${}", other.as_str()),
        }
    }
}

/// An aggregate computed at every grouping level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregate {
    pub field: String,
    pub kind: AggregateKind,
}

impl Aggregate {
    pub fn key(&self) -> String {
        sanitize_key(&self.field)
    }
}
