use std::collections::HashMap;
use std::path::Path;

use gridpipe_query::{DecodeError, Decoder, Lookup, QueryParams, QuerySpec};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Per-grid settings supplied by the caller rather than the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    pub collection: String,
    /// Wire field name → stored field name.
    #[serde(default)]
    pub replacements: HashMap<String, String>,
    #[serde(default)]
    pub lookups: Vec<Lookup>,
    /// Stages placed verbatim at the front of both pipelines.
    #[serde(default)]
    pub preprocessing: Vec<bson::Document>,
}

impl GridConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn decoder(&self) -> Decoder {
        Decoder::new().with_replacements(self.replacements.clone())
    }

    /// Decode a request and attach this grid's lookups and preprocessing.
    pub fn spec(&self, params: &QueryParams) -> Result<QuerySpec, DecodeError> {
        Ok(self
            .decoder()
            .decode(params)?
            .with_lookups(self.lookups.clone())
            .with_preprocessing(self.preprocessing.clone()))
    }
}
