//! Error types for the sonde-profiles crate.
//!
//! Missing measurements are data, not errors. Nothing in here is raised for a null depth or a null
//! variable value.
use thiserror::Error;

/// Error type for the crate.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum AnalysisError {
    /// The name does not match any supported measured variable.
    #[error("Invalid variable: {0}")]
    InvalidVariable(String),
    /// The name does not match any field observations can be grouped by.
    #[error("Invalid grouping key field: {0}")]
    InvalidKeyField(String),
    /// The name does not match any known color palette.
    #[error("Invalid color palette: {0}")]
    InvalidPalette(String),
    /// A color string that is not of the form `#rrggbb`.
    #[error("Invalid color: {0}")]
    InvalidColor(String),
    /// Bad configuration file.
    #[error("Invalid configuration: {0}")]
    Config(String),
    /// Forward an error from the drawing backend.
    #[error("Error bubbled up from the drawing backend: {0}")]
    Drawing(String),
}

/// Shorthand for results.
pub type Result<T> = ::std::result::Result<T, AnalysisError>;

impl From<toml::de::Error> for AnalysisError {
    fn from(err: toml::de::Error) -> Self {
        AnalysisError::Config(err.to_string())
    }
}
