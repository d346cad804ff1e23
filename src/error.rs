//! Error types for card configuration.

use thiserror::Error;

/// Result type for configuration parsing.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while turning a host option map into a [`crate::CardConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Malformed JSON or an unknown enum value
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Option value outside its domain
    #[error("Invalid value for `{option}`: {reason}")]
    InvalidValue {
        /// Host option name.
        option: &'static str,
        /// What is wrong with the value.
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(option: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            option,
            reason: reason.into(),
        }
    }
}
