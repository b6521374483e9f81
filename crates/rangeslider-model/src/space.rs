#![forbid(unsafe_code)]

//! Position space: the immutable ratio ↔ value table behind a slider.
//!
//! A [`PositionSpace`] is built once from a [`SpaceSource`] and never
//! changes. It holds a strictly ascending sequence of [`SpacePoint`]s whose
//! ratios are rounded to a fixed decimal precision. The same precision is
//! applied to every query ratio so that lookups stay stable under float
//! arithmetic.
//!
//! # Precision
//!
//! | Points     | Ratio digits            |
//! |------------|-------------------------|
//! | `<= 10`    | 2                       |
//! | `> 10`     | `ceil(log10(count))`    |
//!
//! A caller hint can raise the precision. Sparse maps also keep enough
//! digits to represent each supplied ratio (up to [`MAX_PRECISION`]).

use std::cmp::Ordering;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::value::SliderValue;

/// Upper bound on ratio and value rounding digits.
pub const MAX_PRECISION: u32 = 12;

/// Upper bound on the number of points a range source may generate.
pub const MAX_POINTS: usize = 1_000_000;

/// Round `value` to `digits` decimal places.
#[must_use]
pub fn round_to(value: f64, digits: u32) -> f64 {
    let factor = 10_f64.powi(digits.min(MAX_PRECISION) as i32);
    (value * factor).round() / factor
}

/// Ratio digits for a space of `count` points.
#[must_use]
pub fn precision_for(count: usize) -> u32 {
    if count <= 10 {
        return 2;
    }
    let mut digits = 0;
    let mut bound = 1_usize;
    while bound < count {
        bound = bound.saturating_mul(10);
        digits += 1;
    }
    digits
}

/// Number of decimal digits needed to write `value` (capped).
fn decimal_places(value: f64) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    for digits in 0..MAX_PRECISION {
        let scaled = value * 10_f64.powi(digits as i32);
        if (scaled - scaled.round()).abs() < 1e-7 {
            return digits;
        }
    }
    MAX_PRECISION
}

fn numbers_match(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

fn values_match(a: &SliderValue, b: &SliderValue) -> bool {
    match (a, b) {
        (SliderValue::Number(x), SliderValue::Number(y)) => numbers_match(*x, *y),
        (SliderValue::Token(x), SliderValue::Token(y)) => x == y,
        _ => false,
    }
}

/// A `(ratio, value)` pair of the value space.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpacePoint {
    /// Normalized track position in `[0, 1]`.
    pub ratio: f64,
    pub value: SliderValue,
}

impl SpacePoint {
    #[must_use]
    pub fn new(ratio: f64, value: impl Into<SliderValue>) -> Self {
        Self {
            ratio,
            value: value.into(),
        }
    }
}

/// Where the points of a space come from.
#[derive(Debug, Clone, PartialEq)]
pub enum SpaceSource {
    /// Evenly spaced numbers from `min` to `max`.
    Range { min: f64, max: f64, step: f64 },
    /// An ordered list of values, evenly spread over `[0, 1]`.
    Values(Vec<SliderValue>),
    /// Caller-chosen ratios mapped to values.
    Map(Vec<(f64, SliderValue)>),
}

impl SpaceSource {
    fn kind(&self) -> &'static str {
        match self {
            Self::Range { .. } => "range",
            Self::Values(_) => "values",
            Self::Map(_) => "map",
        }
    }
}

/// Immutable, ordered table of slider points.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionSpace {
    points: Vec<SpacePoint>,
    precision: u32,
    numeric: bool,
    /// All values are numbers in strictly ascending order.
    ascending: bool,
}

impl PositionSpace {
    /// Build a space from `source`.
    ///
    /// `precision_hint` raises the ratio precision; it never lowers it below
    /// what the point count requires.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidRange`] for unusable range bounds,
    /// [`ConfigError::EmptySpace`] when nothing is left to select,
    /// [`ConfigError::MalformedRatio`] / [`ConfigError::DuplicateRatio`] for
    /// bad sparse maps.
    pub fn build(source: &SpaceSource, precision_hint: Option<u32>) -> Result<Self, ConfigError> {
        let hint = precision_hint.unwrap_or(0).min(MAX_PRECISION);
        let (points, precision) = match source {
            SpaceSource::Range { min, max, step } => build_range(*min, *max, *step, hint)?,
            SpaceSource::Values(values) => build_values(values, hint)?,
            SpaceSource::Map(entries) => build_map(entries, hint)?,
        };

        let numeric = points.iter().all(|p| p.value.is_number());
        let ascending = numeric
            && points.windows(2).all(|w| {
                matches!(
                    (&w[0].value, &w[1].value),
                    (SliderValue::Number(a), SliderValue::Number(b)) if a < b
                )
            });

        tracing::debug!(
            message = "slider.space.built",
            source = source.kind(),
            points = points.len(),
            precision,
            numeric
        );

        Ok(Self {
            points,
            precision,
            numeric,
            ascending,
        })
    }

    /// All points in ascending ratio order.
    #[must_use]
    pub fn points(&self) -> &[SpacePoint] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false` for a built space; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Ratio rounding digits used for storage and queries.
    #[must_use]
    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// `true` when every value is a number.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        self.numeric
    }

    #[must_use]
    pub fn point(&self, index: usize) -> Option<&SpacePoint> {
        self.points.get(index)
    }

    /// The lowest-ratio point.
    #[must_use]
    pub fn first(&self) -> &SpacePoint {
        &self.points[0]
    }

    /// The highest-ratio point.
    #[must_use]
    pub fn last(&self) -> &SpacePoint {
        &self.points[self.points.len() - 1]
    }

    /// Round a query ratio the way stored ratios were rounded.
    ///
    /// NaN maps to 0; everything else is clamped into `[0, 1]` first.
    #[must_use]
    pub fn normalize_ratio(&self, ratio: f64) -> f64 {
        if ratio.is_nan() {
            return 0.0;
        }
        round_to(ratio.clamp(0.0, 1.0), self.precision)
    }

    /// Index of the point nearest to `ratio`; ties go to the lower index.
    #[must_use]
    pub fn nearest_index_by_ratio(&self, ratio: f64) -> usize {
        let query = self.normalize_ratio(ratio);
        let upper = self.points.partition_point(|p| p.ratio < query);
        if upper == 0 {
            return 0;
        }
        if upper == self.points.len() {
            return upper - 1;
        }
        // Both sides are multiples of 10^-precision; rounding strips float noise.
        let below = round_to(query - self.points[upper - 1].ratio, self.precision);
        let above = round_to(self.points[upper].ratio - query, self.precision);
        if below <= above { upper - 1 } else { upper }
    }

    /// The point nearest to `ratio`.
    #[must_use]
    pub fn nearest_by_ratio(&self, ratio: f64) -> &SpacePoint {
        &self.points[self.nearest_index_by_ratio(ratio)]
    }

    /// Index of the point stored at exactly `ratio` (after rounding).
    #[must_use]
    pub fn index_of_ratio(&self, ratio: f64) -> Option<usize> {
        let query = self.normalize_ratio(ratio);
        self.points
            .binary_search_by(|p| p.ratio.total_cmp(&query))
            .ok()
    }

    /// Index of the first point holding `value`.
    #[must_use]
    pub fn index_of_value(&self, value: &SliderValue) -> Option<usize> {
        if self.ascending {
            let SliderValue::Number(target) = value else {
                return None;
            };
            let upper = self.points.partition_point(|p| {
                p.value.as_number().is_some_and(|n| n < *target)
            });
            return [upper.checked_sub(1), Some(upper)]
                .into_iter()
                .flatten()
                .find(|&i| {
                    self.points
                        .get(i)
                        .is_some_and(|p| values_match(&p.value, value))
                });
        }
        self.points
            .iter()
            .position(|p| values_match(&p.value, value))
    }

    /// The point holding exactly `value`, if any.
    #[must_use]
    pub fn exact_by_value(&self, value: &SliderValue) -> Option<&SpacePoint> {
        self.index_of_value(value).map(|i| &self.points[i])
    }

    /// Index of the numerically closest value; ties go to the lower value.
    ///
    /// `None` for non-numeric spaces or a NaN target.
    #[must_use]
    pub fn nearest_index_by_value(&self, target: f64) -> Option<usize> {
        if !self.numeric || target.is_nan() {
            return None;
        }
        // Ascending spaces only need the two values around the target.
        let candidates = if self.ascending {
            let upper = self
                .points
                .partition_point(|p| p.value.as_number().is_some_and(|n| n < target));
            upper.saturating_sub(1)..(upper + 1).min(self.points.len())
        } else {
            0..self.points.len()
        };
        let mut best: Option<(usize, f64, f64)> = None;
        for index in candidates {
            let Some(value) = self.points[index].value.as_number() else {
                continue;
            };
            let distance = (value - target).abs();
            let better = match best {
                None => true,
                Some((_, best_distance, best_value)) => match distance.total_cmp(&best_distance) {
                    Ordering::Less => true,
                    Ordering::Equal => value < best_value,
                    Ordering::Greater => false,
                },
            };
            if better {
                best = Some((index, distance, value));
            }
        }
        best.map(|(index, _, _)| index)
    }

    /// The stored value numerically closest to `target`.
    #[must_use]
    pub fn nearest_value_to(&self, target: f64) -> Option<&SpacePoint> {
        self.nearest_index_by_value(target).map(|i| &self.points[i])
    }

    /// At most `max_count` points spread evenly by index, for grid ticks.
    ///
    /// Both ends are included whenever `max_count >= 2`.
    #[must_use]
    pub fn ticks(&self, max_count: usize) -> Vec<&SpacePoint> {
        let len = self.points.len();
        match max_count {
            0 => Vec::new(),
            _ if len <= max_count => self.points.iter().collect(),
            1 => vec![self.first()],
            _ => {
                let mut indices: Vec<usize> = (0..max_count)
                    .map(|i| {
                        let exact = i as f64 * (len - 1) as f64 / (max_count - 1) as f64;
                        exact.round() as usize
                    })
                    .collect();
                indices.dedup();
                indices.into_iter().map(|i| &self.points[i]).collect()
            }
        }
    }
}

/// Validate range bounds and return the number of whole steps between them.
pub(crate) fn check_range(min: f64, max: f64, step: f64) -> Result<usize, ConfigError> {
    let invalid = ConfigError::InvalidRange { min, max, step };
    if !(min.is_finite() && max.is_finite() && step.is_finite()) || step <= 0.0 || min >= max {
        return Err(invalid);
    }
    let steps = ((max - min) / step + 1e-9).floor();
    if steps + 2.0 > MAX_POINTS as f64 {
        return Err(invalid);
    }
    Ok(steps as usize)
}

fn build_range(
    min: f64,
    max: f64,
    step: f64,
    hint: u32,
) -> Result<(Vec<SpacePoint>, u32), ConfigError> {
    let steps = check_range(min, max, step)?;

    let value_digits = decimal_places(min).max(decimal_places(step));
    let mut values: Vec<f64> = Vec::with_capacity(steps + 2);
    for i in 0..=steps {
        let value = round_to(min + i as f64 * step, value_digits);
        if value > max {
            break;
        }
        values.push(value);
    }
    if values.last().is_none_or(|last| *last < max) {
        values.push(max);
    }

    let precision = precision_for(values.len()).max(hint);
    let span = max - min;
    let last_index = values.len() - 1;
    let mut points: Vec<SpacePoint> = Vec::with_capacity(values.len());
    for (index, value) in values.into_iter().enumerate() {
        let ratio = round_to((value - min) / span, precision);
        let collides = points.last().is_some_and(|prev| prev.ratio >= ratio);
        if !collides {
            points.push(SpacePoint::new(ratio, value));
        } else if index == last_index {
            // The upper bound always owns ratio 1.
            if let Some(prev) = points.last_mut() {
                *prev = SpacePoint::new(ratio, value);
            }
        }
    }
    Ok((points, precision))
}

fn build_values(values: &[SliderValue], hint: u32) -> Result<(Vec<SpacePoint>, u32), ConfigError> {
    if values.is_empty() {
        return Err(ConfigError::EmptySpace);
    }
    let precision = precision_for(values.len()).max(hint);
    let denominator = (values.len() - 1).max(1) as f64;
    let points = values
        .iter()
        .enumerate()
        .map(|(i, value)| SpacePoint {
            ratio: round_to(i as f64 / denominator, precision),
            value: value.clone(),
        })
        .collect();
    Ok((points, precision))
}

fn build_map(
    entries: &[(f64, SliderValue)],
    hint: u32,
) -> Result<(Vec<SpacePoint>, u32), ConfigError> {
    let mut kept: Vec<(f64, &SliderValue)> = Vec::with_capacity(entries.len());
    for (ratio, value) in entries {
        if ratio.is_nan() {
            return Err(ConfigError::MalformedRatio(*ratio));
        }
        if !(0.0..=1.0).contains(ratio) {
            tracing::warn!(
                message = "slider.space.ratio_discarded",
                ratio = *ratio,
                value = %value
            );
            continue;
        }
        kept.push((*ratio, value));
    }
    if kept.is_empty() {
        return Err(ConfigError::EmptySpace);
    }

    let supplied_digits = kept
        .iter()
        .map(|(ratio, _)| decimal_places(*ratio))
        .max()
        .unwrap_or(0);
    let precision = precision_for(kept.len()).max(hint).max(supplied_digits);

    let mut points: Vec<SpacePoint> = kept
        .into_iter()
        .map(|(ratio, value)| SpacePoint {
            ratio: round_to(ratio, precision),
            value: value.clone(),
        })
        .collect();
    points.sort_by(|a, b| a.ratio.total_cmp(&b.ratio));
    if let Some(pair) = points.windows(2).find(|w| w[0].ratio == w[1].ratio) {
        return Err(ConfigError::DuplicateRatio(pair[0].ratio));
    }
    Ok((points, precision))
}
