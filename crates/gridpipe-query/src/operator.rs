/// Filter operators understood by the wire format.
///
/// Names the decoder does not recognize become [`Operator::Unsupported`],
/// which the filter compiler skips without raising an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    IsNull,
    IsNotNull,
    Lt,
    Lte,
    Gt,
    Gte,
    StartsWith,
    EndsWith,
    Contains,
    DoesNotContain,
    IsEmpty,
    IsNotEmpty,
    Unsupported(String),
}

impl Operator {
    pub fn parse(name: &str) -> Self {
        match name {
            "eq" => Operator::Eq,
            "ne" => Operator::Ne,
            "isnull" => Operator::IsNull,
            "isnotnull" => Operator::IsNotNull,
            "lt" => Operator::Lt,
            "lte" => Operator::Lte,
            "gt" => Operator::Gt,
            "gte" => Operator::Gte,
            "startswith" => Operator::StartsWith,
            "endswith" => Operator::EndsWith,
            "contains" => Operator::Contains,
            "doesnotcontain" => Operator::DoesNotContain,
            "isempty" => Operator::IsEmpty,
            "isnotempty" => Operator::IsNotEmpty,
            other => Operator::Unsupported(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Operator::Eq => "eq",
            Operator::Ne => "ne",
            Operator::IsNull => "isnull",
            Operator::IsNotNull => "isnotnull",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::StartsWith => "startswith",
            Operator::EndsWith => "endswith",
            Operator::Contains => "contains",
            Operator::DoesNotContain => "doesnotcontain",
            Operator::IsEmpty => "isempty",
            Operator::IsNotEmpty => "isnotempty",
            Operator::Unsupported(name) => name,
        }
    }
}
