use bson::{Bson, Document, doc};
use gridpipe_query::{Condition, Filter, Operator};
use tracing::trace;

/// Fold every condition into one `$match` body.
///
/// Each field holds a single predicate: a later condition on the same field
/// replaces the earlier one. Unsupported operators contribute nothing.
pub fn match_document(filter: &Filter) -> Document {
    let mut predicate = Document::new();
    for condition in &filter.conditions {
        if let Some(fragment) = fragment(condition) {
            predicate.insert(condition.field.clone(), fragment);
        }
    }
    predicate
}

fn fragment(condition: &Condition) -> Option<Bson> {
    let value = Bson::from(&condition.value);
    let fragment = match &condition.operator {
        Operator::Eq => value,
        Operator::Ne => doc! { "$ne": value }.into(),
        Operator::IsNull => Bson::Null,
        Operator::IsNotNull => doc! { "$ne": Bson::Null }.into(),
        Operator::Lt => doc! { "$lt": value }.into(),
        Operator::Lte => doc! { "$lte": value }.into(),
        Operator::Gt => doc! { "$gt": value }.into(),
        Operator::Gte => doc! { "$gte": value }.into(),
        Operator::StartsWith => pattern(format!("^{}", escaped(condition))),
        Operator::EndsWith => pattern(format!("{}$", escaped(condition))),
        Operator::Contains => pattern(escaped(condition)),
        // TODO: case-insensitive negation needs a $not/$regex pair.
        Operator::DoesNotContain => doc! { "$not": condition.value.to_text() }.into(),
        Operator::IsEmpty => Bson::String(String::new()),
        Operator::IsNotEmpty => doc! { "$ne": "" }.into(),
        Operator::Unsupported(name) => {
            trace!(field = %condition.field, operator = %name, "skipping unsupported operator");
            return None;
        }
    };
    Some(fragment)
}

fn escaped(condition: &Condition) -> String {
    regex::escape(&condition.value.to_text())
}

fn pattern(regex: String) -> Bson {
    doc! { "$regex": regex, "$options": "i" }.into()
}
