#![forbid(unsafe_code)]

//! Slider configuration: value-space source, initial points and policy.
//!
//! A [`SliderConfig`] mirrors the options a widget wrapper accepts. Exactly
//! one of `range`, `values` or `points_map` must be set.
//!
//! # Loading
//!
//! With the `config-file` feature:
//!
//! ```toml
//! points = [["from", 0], ["to", 50]]
//! precision = 4
//! collision_avoidance = true
//!
//! [range]
//! min = -50
//! max = 50
//! step = 0.5
//! ```
//!
//! ```rust,ignore
//! let config = SliderConfig::from_toml_file("slider.toml")?;
//! let config = SliderConfig::from_json_str(json)?;
//! ```

#[cfg(feature = "config-file")]
use std::path::Path;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::space::{SpaceSource, check_range};
use crate::value::SliderValue;

/// Numeric range source.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RangeSpec {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

/// Construction input for a [`SliderModel`](crate::SliderModel).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SliderConfig {
    /// Evenly spaced numbers.
    pub range: Option<RangeSpec>,
    /// Ordered values spread evenly over the track.
    pub values: Option<Vec<SliderValue>>,
    /// Explicit `(ratio, value)` pairs.
    pub points_map: Option<Vec<(f64, SliderValue)>>,
    /// Point identifiers with their initial values, in registration order.
    pub points: Vec<(String, SliderValue)>,
    /// Minimum ratio rounding digits.
    pub precision: Option<u32>,
    /// Keep points from crossing each other.
    pub collision_avoidance: bool,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            range: None,
            values: None,
            points_map: None,
            points: Vec::new(),
            precision: None,
            collision_avoidance: true,
        }
    }
}

impl SliderConfig {
    /// Config over a numeric range.
    #[must_use]
    pub fn range(min: f64, max: f64, step: f64) -> Self {
        Self {
            range: Some(RangeSpec { min, max, step }),
            ..Self::default()
        }
    }

    /// Config over an ordered list of values.
    #[must_use]
    pub fn values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<SliderValue>,
    {
        Self {
            values: Some(values.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Config over explicit `(ratio, value)` pairs.
    #[must_use]
    pub fn points_map<I, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (f64, V)>,
        V: Into<SliderValue>,
    {
        Self {
            points_map: Some(entries.into_iter().map(|(r, v)| (r, v.into())).collect()),
            ..Self::default()
        }
    }

    /// Register a point identifier with its initial value.
    #[must_use]
    pub fn with_point(mut self, id: impl Into<String>, value: impl Into<SliderValue>) -> Self {
        self.points.push((id.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_precision(mut self, digits: u32) -> Self {
        self.precision = Some(digits);
        self
    }

    #[must_use]
    pub fn with_collision_avoidance(mut self, enabled: bool) -> Self {
        self.collision_avoidance = enabled;
        self
    }

    /// The single value-space source this config describes.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ConflictingSources`] when more than one source is set,
    /// [`ConfigError::MissingSource`] when none is.
    pub fn source(&self) -> Result<SpaceSource, ConfigError> {
        match (&self.range, &self.values, &self.points_map) {
            (Some(r), None, None) => Ok(SpaceSource::Range {
                min: r.min,
                max: r.max,
                step: r.step,
            }),
            (None, Some(values), None) => Ok(SpaceSource::Values(values.clone())),
            (None, None, Some(entries)) => Ok(SpaceSource::Map(entries.clone())),
            (None, None, None) => Err(ConfigError::MissingSource),
            _ => Err(ConfigError::ConflictingSources),
        }
    }

    /// Check the config without building a position space.
    ///
    /// Covers source selection, range bounds and duplicate point ids.
    /// Sparse-map ratio errors are only detected when the space is built.
    ///
    /// # Errors
    ///
    /// The first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let SpaceSource::Range { min, max, step } = self.source()? {
            check_range(min, max, step)?;
        }
        for (i, (id, _)) in self.points.iter().enumerate() {
            if self.points[..i].iter().any(|(other, _)| other == id) {
                return Err(ConfigError::DuplicatePointId(id.clone()));
            }
        }
        Ok(())
    }

    /// Load from a JSON string.
    #[cfg(feature = "config-file")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Load from a TOML string.
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_collision_avoidance_and_no_source() {
        let config = SliderConfig::default();
        assert!(config.collision_avoidance);
        assert!(matches!(config.source(), Err(ConfigError::MissingSource)));
    }

    #[test]
    fn builders_fill_the_expected_source() {
        let config = SliderConfig::range(0.0, 10.0, 1.0);
        assert_eq!(
            config.source().unwrap(),
            SpaceSource::Range {
                min: 0.0,
                max: 10.0,
                step: 1.0
            }
        );

        let config = SliderConfig::values(["s", "m", "l"]);
        assert_eq!(
            config.source().unwrap(),
            SpaceSource::Values(vec!["s".into(), "m".into(), "l".into()])
        );

        let config = SliderConfig::points_map([(0.0, 1), (1.0, 2)]);
        assert_eq!(
            config.source().unwrap(),
            SpaceSource::Map(vec![(0.0, 1.into()), (1.0, 2.into())])
        );
    }

    #[test]
    fn two_sources_conflict() {
        let mut config = SliderConfig::range(0.0, 10.0, 1.0);
        config.values = Some(vec![SliderValue::Number(1.0)]);
        assert!(matches!(
            config.source(),
            Err(ConfigError::ConflictingSources)
        ));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ConflictingSources)
        ));
    }

    #[test]
    fn validate_catches_bad_range() {
        let config = SliderConfig::range(5.0, 1.0, 1.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRange { .. })
        ));
        let config = SliderConfig::range(0.0, 1.0, 0.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRange { .. })
        ));
    }

    #[test]
    fn validate_catches_duplicate_ids() {
        let config = SliderConfig::range(0.0, 10.0, 1.0)
            .with_point("from", 1)
            .with_point("from", 2);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicatePointId(id)) if id == "from"
        ));
    }

    #[test]
    fn point_builders_keep_order() {
        let config = SliderConfig::range(0.0, 10.0, 1.0)
            .with_point("to", 8)
            .with_point("from", 2)
            .with_precision(3)
            .with_collision_avoidance(false);
        let ids: Vec<&str> = config.points.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["to", "from"]);
        assert_eq!(config.precision, Some(3));
        assert!(!config.collision_avoidance);
        assert!(config.validate().is_ok());
    }
}
