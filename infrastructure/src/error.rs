use std::path::PathBuf;
use thiserror::Error;

/// Startup failures while reading the question/answer corpus.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read corpus file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed corpus entry at line {line}: {source}")]
    Malformed {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("corpus file {0} contains no entries")]
    Empty(PathBuf),
}
