// Ingestion: job postings and curriculum documents → chunks for the index
// and per-document skill sets for trend calculation.

pub mod curriculum;
pub mod handlers;
pub mod jobs;
pub mod store;
pub mod text;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
