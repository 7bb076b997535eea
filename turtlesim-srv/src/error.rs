use thiserror::Error;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum TurtlesimSrvError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Service '{name}' not found")]
    ServiceNotFound { name: String },

    #[error("Type '{type_name}' not found while resolving '{parent}'")]
    TypeNotFound { type_name: String, parent: String },

    #[error("Invalid definition for '{type_name}' at line '{line}': {message}")]
    Definition {
        type_name: String,
        line: String,
        message: String,
    },

    #[error(
        "Buffer underrun: attempted to read {requested} bytes at position {position}, but only {available} bytes available"
    )]
    BufferUnderrun {
        requested: usize,
        position: usize,
        available: usize,
    },

    #[error("Invalid UTF-8 string at position {position}: {source}")]
    InvalidString {
        position: usize,
        source: std::str::Utf8Error,
    },

    #[error("{remaining} trailing bytes after decoding '{datatype}'")]
    TrailingBytes { datatype: String, remaining: usize },

    #[error("Invalid configuration: {message}")]
    ConfigError { message: String },
}

pub type Result<T> = std::result::Result<T, TurtlesimSrvError>;
