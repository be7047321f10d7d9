use std::io;

use thiserror::Error;

use crate::types::{FieldName, SourceId};

/// Error type for record decoding, cleaning, source, and configuration failures.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("job posting is not a valid JSON object: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("job posting is missing required field '{field}'")]
    MissingField { field: FieldName },
    #[error("job posting field '{field}' does not hold text")]
    NonTextField { field: FieldName },
    #[error("corpus creator '{creator}' does not produce text and cannot be tokenized")]
    NonTextOutput { creator: &'static str },
    #[error("record source '{source_id}' is unavailable: {reason}")]
    SourceUnavailable { source_id: SourceId, reason: String },
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("configuration error: {0}")]
    Configuration(String),
}
