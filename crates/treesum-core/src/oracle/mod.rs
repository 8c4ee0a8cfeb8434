//! Summarization oracle interface
//!
//! The pipeline hands the oracle raw file content or concatenated child
//! summaries plus a short context label (`file: src/lib.rs`,
//! `directory: src`) and only cares whether text comes back.

mod chat;

pub use chat::ChatCompletionsOracle;

/// Turns text plus a context label into a short summary
pub trait SummarizationOracle {
    fn summarize(&self, content: &str, context: &str) -> Result<String, OracleError>;
}

/// Why an oracle call produced no summary
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("network error: {0}")]
    Network(String),

    #[error("server returned status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("oracle returned an empty summary")]
    Empty,
}

/// Context label for a file summary
pub fn file_context(label: &str) -> String {
    format!("file: {label}")
}

/// Context label for a directory rollup
pub fn directory_context(label: &str) -> String {
    format!("directory: {label}")
}

/// Prompt sent to a chat model for one summary
pub fn build_prompt(content: &str, context: &str) -> String {
    format!(
        "Generate a concise 2-3 sentence summary of the following {context}.\n\
         Focus on the main purpose, key functionality, and important details.\n\
         \n\
         Content:\n\
         {content}\n\
         \n\
         Summary:"
    )
}
