use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
#[error("Failed to parse model JSON: {source}")]
pub struct ParseError {
    /// The candidate text that failed to parse, kept for diagnostics.
    pub candidate: String,
    #[source]
    pub source: serde_json::Error,
}

pub struct ResponseParser;

impl ResponseParser {
    /// Parses without any schema check; shape problems are the merger's concern.
    pub fn parse(candidate: &str) -> Result<Value, ParseError> {
        serde_json::from_str(candidate).map_err(|source| ParseError {
            candidate: candidate.to_string(),
            source,
        })
    }
}
