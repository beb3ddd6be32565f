use serde::{Deserialize, Serialize};

/// A join against another collection.
///
/// `alias` is both the output field and the name later filters use to reach
/// the joined document, so it must be unique across lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lookup {
    pub from: String,
    pub local_field: String,
    pub foreign_field: String,
    #[serde(rename = "as")]
    pub alias: String,
    /// Collapse the joined array to its first element (or null).
    #[serde(default)]
    pub single: bool,
}

impl Lookup {
    /// Root segment of `local_field`; names an earlier lookup's alias when
    /// joins are chained.
    pub fn local_root(&self) -> &str {
        self.local_field
            .split('.')
            .next()
            .unwrap_or(&self.local_field)
    }
}
