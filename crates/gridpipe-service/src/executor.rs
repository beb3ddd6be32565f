use std::convert::Infallible;

use bson::Document;

/// Runs compiled aggregation pipelines against a document store.
///
/// Implementations wrap whatever client talks to the store. Errors are handed
/// back to the caller of [`GridService::apply`](crate::GridService::apply)
/// unchanged.
pub trait PipelineExecutor: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn aggregate(
        &self,
        collection: &str,
        pipeline: &[Document],
    ) -> Result<Vec<Document>, Self::Error>;
}

/// Returns no rows for every pipeline. Useful for inspecting plans only.
pub struct NoopExecutor;

impl PipelineExecutor for NoopExecutor {
    type Error = Infallible;

    fn aggregate(
        &self,
        _collection: &str,
        _pipeline: &[Document],
    ) -> Result<Vec<Document>, Self::Error> {
        Ok(Vec::new())
    }
}
