use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("No valid JSON found in response")]
    NoJsonFound,
}

pub struct ResponseExtractor;

impl ResponseExtractor {
    /// Recovers the JSON candidate from a raw answer.
    ///
    /// A fenced block (```` ``` ```` with an optional language tag) wins;
    /// otherwise the span from the first `{` to the last `}` is taken.
    pub fn extract(response: &str) -> Result<&str, ExtractError> {
        let trimmed = response.trim();

        if let Some(inner) = fenced_block(trimmed) {
            debug!(len = inner.len(), "Using fenced code block");
            return Ok(inner);
        }

        if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
            if end > start {
                debug!(start, end, "Using bare JSON span");
                return Ok(&trimmed[start..=end]);
            }
        }

        Err(ExtractError::NoJsonFound)
    }
}

fn fenced_block(text: &str) -> Option<&str> {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    let fence = FENCE.get_or_init(|| {
        Regex::new(r"(?s)```[A-Za-z0-9_+-]*[ \t]*\r?\n?(.*?)```").expect("fence pattern is valid")
    });
    fence
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|inner| inner.as_str().trim())
}
