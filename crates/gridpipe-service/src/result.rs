use serde::{Deserialize, Serialize};

/// Rows for the requested page plus the unpaged match count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataResult {
    pub data: Vec<bson::Document>,
    pub total: u64,
}
