//! Error types for cos-core
//!
//! `BindingError` covers user-input problems detected while turning flags into
//! a request. `Error` is the crate-wide error that everything else returns.

use thiserror::Error;

/// Result type alias for cos-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while binding CLI flags into a typed request
///
/// All of these are detected before any network call and are never retried.
/// `field` is a path such as `Delete.Objects[1].Key`; it is empty while an
/// error travels up from a leaf that does not know where it sits.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindingError {
    /// A mandatory flag was not supplied
    #[error("Missing required field '{field}' (--{flag})")]
    MissingMandatoryField { field: String, flag: String },

    /// A field name that the target type does not define
    #[error("Unknown field '{field}' for {target}")]
    UnknownField { field: String, target: String },

    /// Shorthand syntax violation
    #[error("Malformed value for '{field}': {reason}")]
    MalformedShorthand { field: String, reason: String },

    /// A value that cannot be converted to the declared kind
    #[error("Invalid value for '{field}': {reason}")]
    TypeCoercionFailure { field: String, reason: String },

    /// A command declared its fields inconsistently
    #[error("Invalid field declaration for '{field}': {reason}")]
    InvalidDeclaration { field: String, reason: String },

    /// Neither an explicit region nor a configured default
    #[error("Region required: pass --region or run 'cos config set region <REGION>'")]
    RegionUnresolved,
}

impl BindingError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedShorthand {
            field: String::new(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::TypeCoercionFailure {
            field: String::new(),
            reason: reason.into(),
        }
    }

    /// The field path this error refers to, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingMandatoryField { field, .. }
            | Self::UnknownField { field, .. }
            | Self::MalformedShorthand { field, .. }
            | Self::TypeCoercionFailure { field, .. }
            | Self::InvalidDeclaration { field, .. } => Some(field),
            Self::RegionUnresolved => None,
        }
    }

    /// Re-root the field path under `parent`
    ///
    /// `parent` is either a field name (`Objects`) or a list index (`[1]`).
    pub fn within(mut self, parent: &str) -> Self {
        match &mut self {
            Self::MissingMandatoryField { field, .. }
            | Self::UnknownField { field, .. }
            | Self::MalformedShorthand { field, .. }
            | Self::TypeCoercionFailure { field, .. }
            | Self::InvalidDeclaration { field, .. } => {
                *field = if field.is_empty() {
                    parent.to_string()
                } else if field.starts_with('[') {
                    format!("{parent}{field}")
                } else {
                    format!("{parent}.{field}")
                };
            }
            Self::RegionUnresolved => {}
        }
        self
    }
}

/// Error types for cos-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Flag binding or region resolution failed
    #[error(transparent)]
    Binding(#[from] BindingError),

    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Authentication error
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict error
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Whether the error was caused by how the command was invoked
    ///
    /// The CLI prints the command usage after these.
    pub const fn is_usage(&self) -> bool {
        matches!(self, Error::Binding(_))
    }
}
