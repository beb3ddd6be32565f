mod config;
mod error;
mod executor;
mod result;
mod service;

pub use config::GridConfig;
pub use error::{ApplyError, ConfigError};
pub use executor::{NoopExecutor, PipelineExecutor};
pub use result::DataResult;
pub use service::GridService;
