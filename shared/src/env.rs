//! Environment-style configuration helpers.
//!
//! All deployment configuration arrives through environment variables. An
//! unset variable and an empty one are treated the same way: both are a
//! misconfiguration for required settings.

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum EnvError {
    #[error("required environment variable {0} is unset or empty")]
    Missing(&'static str),
}

/// Reads a required variable from the process environment.
pub fn required(name: &'static str) -> Result<String, EnvError> {
    non_empty(name, std::env::var(name).ok())
}

/// Reads an optional variable; empty values count as absent.
pub fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Validates a looked-up value for a required setting.
pub fn non_empty(name: &'static str, value: Option<String>) -> Result<String, EnvError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(EnvError::Missing(name)),
    }
}
