use gridpipe_query::DecodeError;

#[derive(Debug, thiserror::Error)]
pub enum ApplyError<E: std::error::Error + 'static> {
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// The executor's own error, untouched.
    #[error("execution error: {0}")]
    Execute(#[source] E),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}
