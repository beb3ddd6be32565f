use std::collections::{HashMap, HashSet};

use crate::error::DecodeError;
use crate::filter::{Condition, Filter};
use crate::group::{Aggregate, AggregateKind, Group};
use crate::operator::Operator;
use crate::params::QueryParams;
use crate::query::QuerySpec;
use crate::sort::{Sort, SortDirection};
use crate::value::QueryValue;

/// Filter tokens come in groups of `field~operator~literal~connective`.
pub const TOKENS_PER_CONDITION: usize = 4;

const LIST_SEPARATOR: char = '~';
const PAIR_SEPARATOR: char = '-';

/// Decodes grid wire parameters into a [`QuerySpec`].
///
/// Recognized keys: `page`, `pageSize`, `sort`, `group`, `aggregate`,
/// `filter`. Anything else is ignored.
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    replacements: HashMap<String, String>,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rename fields as they are decoded, e.g. `_id` → `id`.
    pub fn with_replacements(mut self, replacements: HashMap<String, String>) -> Self {
        self.replacements = replacements;
        self
    }

    pub fn decode(&self, params: &QueryParams) -> Result<QuerySpec, DecodeError> {
        Ok(QuerySpec {
            page: decode_integer(params, "page")?,
            page_size: decode_integer(params, "pageSize")?,
            filter: self.decode_filter(params)?,
            sort: self.decode_sort(params)?,
            groups: self.decode_groups(params)?,
            aggregates: self.decode_aggregates(params)?,
            ..QuerySpec::default()
        })
    }

    fn replace_field(&self, field: &str) -> String {
        self.replacements
            .get(field)
            .cloned()
            .unwrap_or_else(|| field.to_string())
    }

    /// Conditions are conjoined whatever connective the wire carries.
    fn decode_filter(&self, params: &QueryParams) -> Result<Filter, DecodeError> {
        let Some(raw) = params.get("filter") else {
            return Ok(Filter::default());
        };
        let body = raw
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
            .unwrap_or(raw);

        let tokens: Vec<&str> = body.split(LIST_SEPARATOR).collect();
        let mut conditions = Vec::with_capacity(tokens.len() / TOKENS_PER_CONDITION + 1);
        for chunk in tokens.chunks(TOKENS_PER_CONDITION) {
            let [field, operator, literal, ..] = chunk else {
                return Err(DecodeError::Malformed {
                    param: "filter".into(),
                    token: chunk.join("~"),
                });
            };
            conditions.push(Condition {
                field: self.replace_field(field),
                operator: Operator::parse(operator),
                value: QueryValue::from_literal(literal)?,
            });
        }

        Ok(Filter::new(conditions))
    }

    /// Only the last decoded sort key is kept.
    fn decode_sort(&self, params: &QueryParams) -> Result<Vec<Sort>, DecodeError> {
        let mut retained = None;
        for raw in params.get_all("sort") {
            for token in raw.split(LIST_SEPARATOR) {
                let (field, dir) = split_pair("sort", token)?;
                retained = Some(Sort {
                    field: self.replace_field(field),
                    direction: SortDirection::parse(dir),
                });
            }
        }
        Ok(retained.into_iter().collect())
    }

    /// Each level is keyed by its sanitized field, so keys must not repeat.
    fn decode_groups(&self, params: &QueryParams) -> Result<Vec<Group>, DecodeError> {
        let Some(raw) = params.get("group") else {
            return Ok(Vec::new());
        };
        let mut keys = HashSet::new();
        let mut groups = Vec::new();
        for token in raw.split(LIST_SEPARATOR) {
            let (field, dir) = split_pair("group", token)?;
            let group = Group {
                field: self.replace_field(field),
                direction: SortDirection::parse(dir),
            };
            if !keys.insert(group.key()) {
                return Err(DecodeError::Malformed {
                    param: "group".into(),
                    token: token.to_string(),
                });
            }
            groups.push(group);
        }
        Ok(groups)
    }

    fn decode_aggregates(&self, params: &QueryParams) -> Result<Vec<Aggregate>, DecodeError> {
        let Some(raw) = params.get("aggregate") else {
            return Ok(Vec::new());
        };
        raw.split(LIST_SEPARATOR)
            .map(|token| {
                let (field, kind) = split_pair("aggregate", token)?;
                Ok(Aggregate {
                    field: self.replace_field(field),
                    kind: AggregateKind::parse(kind),
                })
            })
            .collect()
    }
}

/// Decode with no field replacements.
pub fn decode(params: &QueryParams) -> Result<QuerySpec, DecodeError> {
    Decoder::new().decode(params)
}

fn decode_integer(params: &QueryParams, param: &str) -> Result<usize, DecodeError> {
    match params.get(param) {
        None => Ok(0),
        Some(raw) => raw.parse().map_err(|source| DecodeError::Integer {
            param: param.to_string(),
            value: raw.to_string(),
            source,
        }),
    }
}

/// Split `<field>-<suffix>` on the last `-`, so fields may contain dashes.
fn split_pair<'a>(param: &str, token: &'a str) -> Result<(&'a str, &'a str), DecodeError> {
    token
        .rsplit_once(PAIR_SEPARATOR)
        .filter(|(field, _)| !field.is_empty())
        .ok_or_else(|| DecodeError::Malformed {
            param: param.to_string(),
            token: token.to_string(),
        })
}
