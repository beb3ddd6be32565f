#![allow(dead_code)]

use gridpipe_query::{
    Aggregate, AggregateKind, Condition, Filter, Group, Lookup, Operator, QueryParams, QuerySpec,
    QueryValue, SortDirection, decode,
};

pub fn spec_from(query: &str) -> QuerySpec {
    decode(&QueryParams::parse(query).unwrap()).unwrap()
}

pub fn lookup(from: &str, local: &str, alias: &str, single: bool) -> Lookup {
    Lookup {
        from: from.into(),
        local_field: local.into(),
        foreign_field: "_id".into(),
        alias: alias.into(),
        single,
    }
}

pub fn group(field: &str, direction: SortDirection) -> Group {
    Group {
        field: field.into(),
        direction,
    }
}

pub fn aggregate(field: &str, kind: AggregateKind) -> Aggregate {
    Aggregate {
        field: field.into(),
        kind,
    }
}

pub fn contains(field: &str, text: &str) -> Condition {
    Condition {
        field: field.into(),
        operator: Operator::Contains,
        value: QueryValue::String(text.into()),
    }
}

/// Vendor/reseller fixture: two chained single lookups, a contains filter,
/// two group levels and two aggregates over the same field.
pub fn commission_report() -> QuerySpec {
    QuerySpec {
        filter: Filter::new(vec![contains("data.email", "a")]),
        groups: vec![
            group("data.email", SortDirection::Asc),
            group("vendor.email", SortDirection::Desc),
        ],
        aggregates: vec![
            aggregate("commission.due", AggregateKind::Average),
            aggregate("commission.due", AggregateKind::Sum),
        ],
        ..QuerySpec::default()
    }
    .with_lookups(vec![
        lookup("vendors", "vendorId", "vendor", true),
        lookup("resellers", "vendor.resellerId", "reseller", true),
    ])
}

pub fn has_stage(stages: &[bson::Document], name: &str) -> bool {
    stages.iter().any(|s| s.contains_key(name))
}
