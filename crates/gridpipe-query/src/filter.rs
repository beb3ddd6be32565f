use crate::operator::Operator;
use crate::value::QueryValue;

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub operator: Operator,
    pub value: QueryValue,
}

/// Only conjunction exists: connectives on the wire are read and discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
}

/// A flat list of conditions, always combined with AND.
///
/// `logic` is set once more than one condition was decoded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub logic: Option<LogicalOp>,
    pub conditions: Vec<Condition>,
}

impl Filter {
    pub fn new(conditions: Vec<Condition>) -> Self {
        let logic = (conditions.len() > 1).then_some(LogicalOp::And);
        Self { logic, conditions }
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// First path segment of every condition field, e.g. `owner` for `owner.name`.
    pub fn root_fields(&self) -> impl Iterator<Item = &str> {
        self.conditions
            .iter()
            .map(|c| c.field.split('.').next().unwrap_or(&c.field))
    }
}
