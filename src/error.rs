use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised at the edges of the crate: reading document sets and
/// configuration. Indexing and searching themselves never fail.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),
}
