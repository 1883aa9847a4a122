use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatchError {
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),
    /// Config validation error (negative threshold, bad glob, etc.).
    #[error("config validation error: {0}")]
    ConfigValidation(String),
    /// A required column is missing from a source's header row.
    #[error("source '{file}': missing column '{column}'")]
    MissingColumn { file: String, column: String },
    /// Structurally malformed CSV (ragged record, bad quoting).
    #[error("source '{file}': {message}")]
    Csv { file: String, message: String },
    /// IO error (file read, write, etc.).
    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for MatchError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
