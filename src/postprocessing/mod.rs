//! Turns the model's free-form answer into something the merger can read.

pub mod answer;
pub mod extractor;
pub mod parser;

pub use answer::ModelAnswer;
pub use extractor::{ExtractError, ResponseExtractor};
pub use parser::{ParseError, ResponseParser};

#[cfg(test)]
mod tests;
