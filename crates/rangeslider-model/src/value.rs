#![forbid(unsafe_code)]

//! Domain values carried by slider points.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A value a slider point can take.
///
/// Range spaces only produce numbers. Array and sparse-map spaces may carry
/// opaque tokens (labels such as `"small"` or `"XL"`), and a sparse map may
/// mix both kinds.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum SliderValue {
    /// A numeric value.
    Number(f64),
    /// An opaque, caller-ordered token.
    Token(String),
}

impl SliderValue {
    /// Numeric payload, if this is a number.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Token(_) => None,
        }
    }

    /// Token payload, if this is a token.
    #[must_use]
    pub fn as_token(&self) -> Option<&str> {
        match self {
            Self::Number(_) => None,
            Self::Token(t) => Some(t),
        }
    }

    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }
}

impl fmt::Display for SliderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Token(t) => f.write_str(t),
        }
    }
}

impl From<f64> for SliderValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for SliderValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for SliderValue {
    fn from(value: &str) -> Self {
        Self::Token(value.to_owned())
    }
}

impl From<String> for SliderValue {
    fn from(value: String) -> Self {
        Self::Token(value)
    }
}
