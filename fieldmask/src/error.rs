//! Startup configuration errors.
//!
//! Every variant is fatal: a process should refuse to start rather than run
//! with ambiguous masking semantics. Runtime masking itself has no error type;
//! serialization failures are recovered by the facade.

use thiserror::Error;

/// Errors raised while loading or validating masking configuration.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    /// The style name is not one of `FULL`, `PARTIAL`, `SHOW_LAST`.
    #[error("unknown mask style `{0}`; expected FULL, PARTIAL or SHOW_LAST")]
    UnknownStyle(String),

    /// The mask character is empty or longer than one character.
    #[error("mask character must be exactly one character (got `{0}`)")]
    InvalidMaskCharacter(String),

    /// A configured sensitive field name is blank.
    #[error("sensitive field list contains an invalid entry `{0}`")]
    InvalidFieldName(String),

    /// A boolean environment value could not be parsed.
    #[error("invalid boolean `{value}` for `{key}`")]
    InvalidBool {
        /// Variable name.
        key: String,
        /// Raw value.
        value: String,
    },

    /// The document could not be parsed into a masking section.
    #[error("failed to parse masking configuration: {0}")]
    Parse(String),

    /// The configuration file has an extension no loader understands.
    #[error("unsupported configuration format `{0}`; expected .yaml, .yml or .json")]
    UnsupportedFormat(String),

    /// The configuration file could not be read.
    #[error("failed to read masking configuration: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}
