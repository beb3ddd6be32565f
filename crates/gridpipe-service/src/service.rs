use bson::{Bson, Document};
use gridpipe_compiler::compile;
use gridpipe_query::{QueryParams, QuerySpec};
use tracing::{debug, info};

use crate::config::GridConfig;
use crate::error::ApplyError;
use crate::executor::PipelineExecutor;
use crate::result::DataResult;

pub struct GridService<E: PipelineExecutor> {
    config: GridConfig,
    executor: E,
}

impl<E: PipelineExecutor> GridService<E> {
    pub fn new(config: GridConfig, executor: E) -> Self {
        Self { config, executor }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Decode `params`, then run the count plan and the data plan.
    ///
    /// Nothing reaches the executor when decoding fails.
    pub fn apply(&self, params: &QueryParams) -> Result<DataResult, ApplyError<E::Error>> {
        let spec = self.config.spec(params)?;
        self.apply_spec(&spec)
    }

    pub fn apply_spec(&self, spec: &QuerySpec) -> Result<DataResult, ApplyError<E::Error>> {
        let collection = self.config.collection.as_str();
        let compiled = compile(spec);

        // 1. Count over the filtered, unpaged rows
        let counted = self
            .executor
            .aggregate(collection, &compiled.total)
            .map_err(ApplyError::Execute)?;
        let total = read_total(counted.first());
        debug!(collection, total, "counted matching rows");

        // 2. Rows for the requested page
        let data = self
            .executor
            .aggregate(collection, &compiled.pipeline)
            .map_err(ApplyError::Execute)?;

        info!(collection, rows = data.len(), total, "applied grid query");
        Ok(DataResult { data, total })
    }
}

/// `$count` emits nothing when no row matches.
fn read_total(doc: Option<&Document>) -> u64 {
    match doc.and_then(|d| d.get("total")) {
        Some(Bson::Int32(n)) => u64::try_from(*n).unwrap_or(0),
        Some(Bson::Int64(n)) => u64::try_from(*n).unwrap_or(0),
        Some(Bson::Double(n)) if *n >= 0.0 => *n as u64,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn total_from_count_document() {
        assert_eq!(read_total(Some(&doc! { "total": 42_i32 })), 42);
        assert_eq!(read_total(Some(&doc! { "total": 7_i64 })), 7);
        assert_eq!(read_total(Some(&doc! { "total": 3.0 })), 3);
    }

    #[test]
    fn missing_count_is_zero() {
        assert_eq!(read_total(None), 0);
        assert_eq!(read_total(Some(&doc! { "other": 1 })), 0);
        assert_eq!(read_total(Some(&doc! { "total": -1_i32 })), 0);
    }
}
