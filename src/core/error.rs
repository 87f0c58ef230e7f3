use thiserror::Error;

#[derive(Error, Debug)]
pub enum CityError {
    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Invalid data file {file}: {reason}")]
    DataError { file: &'static str, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, CityError>;
