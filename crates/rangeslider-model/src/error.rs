#![forbid(unsafe_code)]

//! Error types for slider construction and selection.
//!
//! Both enums are programming/configuration errors: nothing in this crate
//! retries them. A call that returns an error has left the model unchanged
//! and emitted no event.

use std::fmt;

use crate::value::SliderValue;

/// Construction-time configuration error.
#[derive(Debug)]
pub enum ConfigError {
    /// More than one value-space source (range, values, points map) was given.
    ConflictingSources,
    /// No value-space source was given.
    MissingSource,
    /// Range bounds or step are unusable.
    InvalidRange { min: f64, max: f64, step: f64 },
    /// The source produced no points.
    EmptySpace,
    /// A sparse-map ratio is not a number.
    MalformedRatio(f64),
    /// Two sparse-map entries share a ratio after rounding.
    DuplicateRatio(f64),
    /// The same point identifier was registered twice.
    DuplicatePointId(String),
    /// Reading a configuration file failed.
    #[cfg(feature = "config-file")]
    Io(std::io::Error),
    /// A JSON configuration failed to parse.
    #[cfg(feature = "config-file")]
    Json(serde_json::Error),
    /// A TOML configuration failed to parse.
    #[cfg(feature = "config-file")]
    Toml(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConflictingSources => {
                f.write_str("only one of `range`, `values` or `points_map` may be set")
            }
            Self::MissingSource => f.write_str("one of `range`, `values` or `points_map` is required"),
            Self::InvalidRange { min, max, step } => write!(
                f,
                "invalid range (min={min}, max={max}, step={step}): bounds must be finite with min < max and step > 0"
            ),
            Self::EmptySpace => f.write_str("value space has no points"),
            Self::MalformedRatio(r) => write!(f, "points map ratio {r} is not a number"),
            Self::DuplicateRatio(r) => write!(f, "points map contains ratio {r} more than once"),
            Self::DuplicatePointId(id) => write!(f, "point id {id:?} is registered more than once"),
            #[cfg(feature = "config-file")]
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config-file")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            #[cfg(feature = "config-file")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            #[cfg(feature = "config-file")]
            Self::Io(e) => Some(e),
            #[cfg(feature = "config-file")]
            Self::Json(e) => Some(e),
            #[cfg(feature = "config-file")]
            Self::Toml(e) => Some(e),
            _ => None,
        }
    }
}

/// Call-time selection error.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectError {
    /// The identifier was never registered.
    UnknownPoint { id: String },
    /// The value is not part of a non-numeric space.
    ValueNotFound { id: String, value: SliderValue },
    /// No points are registered, so an unattributed position has no owner.
    NoPoints,
}

impl fmt::Display for SelectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPoint { id } => write!(f, "unknown point id {id:?}"),
            Self::ValueNotFound { id, value } => {
                write!(f, "value {value} for point {id:?} is not in the value space")
            }
            Self::NoPoints => f.write_str("no points are registered"),
        }
    }
}

impl std::error::Error for SelectError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn config_error_messages() {
        let err = ConfigError::InvalidRange {
            min: 5.0,
            max: 1.0,
            step: 1.0,
        };
        assert!(err.to_string().contains("min=5"));
        assert!(err.source().is_none());
        assert_eq!(
            ConfigError::DuplicatePointId("from".into()).to_string(),
            "point id \"from\" is registered more than once"
        );
    }

    #[test]
    fn select_error_messages() {
        let err = SelectError::ValueNotFound {
            id: "to".into(),
            value: SliderValue::from("zzz"),
        };
        assert_eq!(
            err.to_string(),
            "value zzz for point \"to\" is not in the value space"
        );
        assert_eq!(
            SelectError::UnknownPoint { id: "mid".into() }.to_string(),
            "unknown point id \"mid\""
        );
    }
}
