use thiserror::Error;

/// Errors raised while loading market history.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Cannot open market history file {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Error reading line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid {field} on line {line}")]
    Parse { field: &'static str, line: usize },

    #[error("Invalid open/high/low/close relationship on line {line}")]
    InvalidOhlc { line: usize },

    #[error("Non-positive price on line {line}")]
    NonPositivePrice { line: usize },

    #[error("No valid data found in file")]
    Empty,
}
