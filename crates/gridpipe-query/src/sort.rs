use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// `desc` is descending; every other token sorts ascending.
    pub fn parse(token: &str) -> Self {
        if token == "desc" {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }

    /// Engine sort order: `1` ascending, `-1` descending.
    pub fn order(self) -> i32 {
        match self {
            SortDirection::Asc => 1,
            SortDirection::Desc => -1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}
