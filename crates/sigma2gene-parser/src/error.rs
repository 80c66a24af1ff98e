use thiserror::Error;

/// Errors that can occur while loading Sigma rule files.
#[derive(Debug, Error)]
pub enum ParserError {
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ParserError>;
