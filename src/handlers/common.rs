//! Shared validation and parsing helpers for handler builders.

use std::str::FromStr;

use super::HandlerBuildError;

pub(crate) fn ensure_non_zero<T>(field: &str, value: Option<T>) -> Result<(), HandlerBuildError>
where
    T: Default + PartialEq,
{
    match value {
        Some(v) if v == T::default() => Err(HandlerBuildError::InvalidConfig(format!(
            "{field} must be greater than zero",
        ))),
        _ => Ok(()),
    }
}

/// Parse a configuration value, naming `key` in the error.
pub(crate) fn parse_value<T>(key: &str, raw: &str) -> Result<T, HandlerBuildError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|err: T::Err| {
        HandlerBuildError::InvalidConfig(format!("{key}: invalid value '{raw}': {err}"))
    })
}

/// Parse a boolean flag accepting the usual spellings.
pub(crate) fn parse_flag(key: &str, raw: &str) -> Result<bool, HandlerBuildError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(HandlerBuildError::InvalidConfig(format!(
            "{key}: invalid flag '{raw}'"
        ))),
    }
}
