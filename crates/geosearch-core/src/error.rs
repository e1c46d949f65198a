use thiserror::Error;

/// Errors surfaced by the search pipeline.
///
/// `Config` is fatal at startup. `FilterValidation` is a client error and is
/// raised before any external call is made. `Embedding` and `Backend` wrap
/// the underlying cause together with the operation that failed; neither is
/// retried internally. A hit that cannot be transformed is logged and
/// dropped, not reported through this type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid filter: {0}")]
    FilterValidation(String),

    #[error("Embedding service failed during {op}: {source}")]
    Embedding {
        op: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("Search backend failed during {op}: {source}")]
    Backend {
        op: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
