#![forbid(unsafe_code)]

//! Point selection state: named selected points and their movement limits.
//!
//! [`SelectionState`] is the only mutable part of a slider model. It knows
//! nothing about how ratios map to values; callers hand it points that
//! already belong to the position space.
//!
//! # Invariants
//!
//! 1. Identifiers are unique and keep their registration order.
//! 2. With collision avoidance on, points keep a fixed order, set when they
//!    are registered (by ratio, then registration). A point's limits are the
//!    ratios of its neighbours in that order (`0` / `1` at the ends), so
//!    ratios never decrease along it, even after two points meet.
//! 3. With collision avoidance off, every point's limits are `{0, 1}`.

use ahash::AHashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Stateful;
use crate::error::{ConfigError, SelectError};
use crate::space::{SpacePoint, round_to};
use crate::value::SliderValue;

/// Closed ratio interval a point may currently occupy.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Limits {
    pub min: f64,
    pub max: f64,
}

impl Limits {
    /// The whole track.
    pub const FULL: Self = Self { min: 0.0, max: 1.0 };

    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Clamp `ratio` into these limits.
    #[must_use]
    pub fn clamp(&self, ratio: f64) -> f64 {
        ratio.clamp(self.min, self.max)
    }

    #[must_use]
    pub fn contains(&self, ratio: f64) -> bool {
        (self.min..=self.max).contains(&ratio)
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::FULL
    }
}

/// A point currently selected by one identifier.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SelectedPoint {
    pub ratio: f64,
    pub value: SliderValue,
}

impl From<&SpacePoint> for SelectedPoint {
    fn from(point: &SpacePoint) -> Self {
        Self {
            ratio: point.ratio,
            value: point.value.clone(),
        }
    }
}

/// Owned snapshot of every selected point and its limits.
///
/// Entries are in registration order. The snapshot never changes after it
/// was taken.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SliderState {
    pub points: Vec<(String, SelectedPoint)>,
    pub limits: Vec<(String, Limits)>,
}

impl SliderState {
    #[must_use]
    pub fn point(&self, id: &str) -> Option<&SelectedPoint> {
        self.points.iter().find(|(k, _)| k == id).map(|(_, p)| p)
    }

    #[must_use]
    pub fn limits(&self, id: &str) -> Option<Limits> {
        self.limits.iter().find(|(k, _)| k == id).map(|(_, l)| *l)
    }
}

#[derive(Debug, Clone)]
struct Slot {
    id: String,
    point: SelectedPoint,
    limits: Limits,
}

/// Mutable collection of selected points.
#[derive(Debug, Clone)]
pub struct SelectionState {
    slots: Vec<Slot>,
    index: AHashMap<String, usize>,
    /// Slots in track order.
    order: Vec<usize>,
    collision_avoidance: bool,
}

impl SelectionState {
    #[must_use]
    pub fn new(collision_avoidance: bool) -> Self {
        Self {
            slots: Vec::new(),
            index: AHashMap::new(),
            order: Vec::new(),
            collision_avoidance,
        }
    }

    #[must_use]
    pub fn collision_avoidance(&self) -> bool {
        self.collision_avoidance
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Add a new identifier. Limits are not refreshed; call
    /// [`SelectionState::refresh_limits`] once registration is done.
    ///
    /// # Errors
    ///
    /// [`ConfigError::DuplicatePointId`] if `id` already exists.
    pub fn register(&mut self, id: impl Into<String>, point: SelectedPoint) -> Result<(), ConfigError> {
        let id = id.into();
        if self.index.contains_key(&id) {
            return Err(ConfigError::DuplicatePointId(id));
        }
        let slot = self.slots.len();
        let rank = self
            .order
            .partition_point(|&other| self.slots[other].point.ratio <= point.ratio);
        self.order.insert(rank, slot);
        self.index.insert(id.clone(), slot);
        self.slots.push(Slot {
            id,
            point,
            limits: Limits::FULL,
        });
        Ok(())
    }

    /// Slot index of `id`.
    ///
    /// # Errors
    ///
    /// [`SelectError::UnknownPoint`] if `id` was never registered.
    pub fn slot_of(&self, id: &str) -> Result<usize, SelectError> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| SelectError::UnknownPoint { id: id.to_owned() })
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Identifiers in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|s| s.id.as_str())
    }

    #[must_use]
    pub fn id_at(&self, slot: usize) -> &str {
        &self.slots[slot].id
    }

    #[must_use]
    pub fn point(&self, id: &str) -> Option<&SelectedPoint> {
        self.index.get(id).map(|&slot| &self.slots[slot].point)
    }

    #[must_use]
    pub fn point_at(&self, slot: usize) -> &SelectedPoint {
        &self.slots[slot].point
    }

    #[must_use]
    pub fn limits(&self, id: &str) -> Option<Limits> {
        self.index.get(id).map(|&slot| self.slots[slot].limits)
    }

    #[must_use]
    pub fn limits_at(&self, slot: usize) -> Limits {
        self.slots[slot].limits
    }

    pub fn set_point(&mut self, slot: usize, point: SelectedPoint) {
        self.slots[slot].point = point;
    }

    /// Limits `slot` should have given the current positions of all points.
    #[must_use]
    pub fn compute_limits(&self, slot: usize) -> Limits {
        if !self.collision_avoidance {
            return Limits::FULL;
        }
        let Some(rank) = self.order.iter().position(|&s| s == slot) else {
            return Limits::FULL;
        };
        let min = rank
            .checked_sub(1)
            .map_or(0.0, |below| self.slots[self.order[below]].point.ratio);
        let max = self
            .order
            .get(rank + 1)
            .map_or(1.0, |&above| self.slots[above].point.ratio);
        Limits { min, max }
    }

    pub fn store_limits(&mut self, slot: usize, limits: Limits) {
        self.slots[slot].limits = limits;
    }

    /// Recompute every point's limits. Returns the `(slot, limits)` pairs
    /// whose limits changed.
    pub fn refresh_limits(&mut self) -> Vec<(usize, Limits)> {
        let mut changed = Vec::new();
        for slot in 0..self.slots.len() {
            let limits = self.compute_limits(slot);
            if self.slots[slot].limits != limits {
                self.slots[slot].limits = limits;
                changed.push((slot, limits));
            }
        }
        changed
    }

    /// Slot whose current ratio is nearest to `ratio`; ties go to the
    /// earlier-registered slot.
    ///
    /// Distances are rounded to `precision` digits before comparing, so
    /// pass the position space's precision.
    #[must_use]
    pub fn nearest_slot(&self, ratio: f64, precision: u32) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (slot, s) in self.slots.iter().enumerate() {
            let distance = round_to((s.point.ratio - ratio).abs(), precision);
            if best.is_none_or(|(_, d)| distance < d) {
                best = Some((slot, distance));
            }
        }
        best.map(|(slot, _)| slot)
    }

    /// `(id, point)` pairs in registration order.
    #[must_use]
    pub fn selected_points(&self) -> Vec<(String, SelectedPoint)> {
        self.slots
            .iter()
            .map(|s| (s.id.clone(), s.point.clone()))
            .collect()
    }
}

impl Stateful for SelectionState {
    type State = SliderState;

    fn state(&self) -> SliderState {
        SliderState {
            points: self.selected_points(),
            limits: self.slots.iter().map(|s| (s.id.clone(), s.limits)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ratio: f64) -> SelectedPoint {
        SelectedPoint {
            ratio,
            value: SliderValue::Number(ratio * 100.0),
        }
    }

    fn two_points(collision: bool) -> SelectionState {
        let mut state = SelectionState::new(collision);
        state.register("from", at(0.3)).unwrap();
        state.register("to", at(0.7)).unwrap();
        state.refresh_limits();
        state
    }

    #[test]
    fn neighbours_bound_each_other() {
        let state = two_points(true);
        assert_eq!(state.limits("from"), Some(Limits::new(0.0, 0.7)));
        assert_eq!(state.limits("to"), Some(Limits::new(0.3, 1.0)));
    }

    #[test]
    fn no_collision_means_full_track() {
        let state = two_points(false);
        assert_eq!(state.limits("from"), Some(Limits::FULL));
        assert_eq!(state.limits("to"), Some(Limits::FULL));
    }

    #[test]
    fn middle_point_sees_both_neighbours() {
        let mut state = SelectionState::new(true);
        state.register("a", at(0.1)).unwrap();
        state.register("b", at(0.9)).unwrap();
        state.register("c", at(0.5)).unwrap();
        state.refresh_limits();
        assert_eq!(state.limits("c"), Some(Limits::new(0.1, 0.9)));
        assert_eq!(state.limits("a"), Some(Limits::new(0.0, 0.5)));
        assert_eq!(state.limits("b"), Some(Limits::new(0.5, 1.0)));
    }

    #[test]
    fn shared_ratio_orders_by_registration() {
        let mut state = SelectionState::new(true);
        state.register("from", at(0.5)).unwrap();
        state.register("to", at(0.5)).unwrap();
        state.refresh_limits();
        assert_eq!(state.limits("from"), Some(Limits::new(0.0, 0.5)));
        assert_eq!(state.limits("to"), Some(Limits::new(0.5, 1.0)));
    }

    #[test]
    fn registration_order_follows_ratio() {
        let mut state = SelectionState::new(true);
        state.register("to", at(0.7)).unwrap();
        state.register("from", at(0.3)).unwrap();
        state.refresh_limits();
        assert_eq!(state.limits("from"), Some(Limits::new(0.0, 0.7)));
        assert_eq!(state.limits("to"), Some(Limits::new(0.3, 1.0)));
    }

    #[test]
    fn meeting_points_keep_their_order() {
        let mut state = two_points(true);
        let from = state.slot_of("from").unwrap();
        let to = state.slot_of("to").unwrap();

        // "to" comes down onto "from"; it may go back up but not below.
        state.set_point(to, at(0.3));
        state.refresh_limits();
        assert_eq!(state.limits("to"), Some(Limits::new(0.3, 1.0)));
        assert_eq!(state.limits("from"), Some(Limits::new(0.0, 0.3)));

        state.set_point(from, at(0.1));
        state.refresh_limits();
        assert_eq!(state.limits("to"), Some(Limits::new(0.1, 1.0)));
    }

    #[test]
    fn refresh_reports_only_changes() {
        let mut state = two_points(true);
        assert!(state.refresh_limits().is_empty());

        let from = state.slot_of("from").unwrap();
        state.set_point(from, at(0.5));
        let changed = state.refresh_limits();
        assert_eq!(changed, vec![(1, Limits::new(0.5, 1.0))]);
    }

    #[test]
    fn duplicate_ids_rejected() {
        let mut state = SelectionState::new(true);
        state.register("from", at(0.0)).unwrap();
        let err = state.register("from", at(1.0)).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicatePointId(id) if id == "from"));
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn unknown_id_is_distinct_error() {
        let state = two_points(true);
        assert_eq!(
            state.slot_of("mid"),
            Err(SelectError::UnknownPoint { id: "mid".into() })
        );
    }

    #[test]
    fn nearest_slot_prefers_earlier_on_ties() {
        let state = two_points(true);
        assert_eq!(state.nearest_slot(0.5, 2), Some(0));
        assert_eq!(state.nearest_slot(0.51, 2), Some(1));
        assert_eq!(state.nearest_slot(0.0, 2), Some(0));
        assert_eq!(SelectionState::new(true).nearest_slot(0.5, 2), None);
    }

    #[test]
    fn state_snapshot_is_detached() {
        let mut state = two_points(true);
        let snapshot = state.state();
        let from = state.slot_of("from").unwrap();
        state.set_point(from, at(0.1));
        assert_eq!(snapshot.point("from"), Some(&at(0.3)));
        assert_eq!(snapshot.limits("to"), Some(Limits::new(0.3, 1.0)));
        assert_eq!(
            snapshot.points.iter().map(|(id, _)| id.as_str()).collect::<Vec<_>>(),
            vec!["from", "to"]
        );
    }

    #[test]
    fn limits_clamp() {
        let limits = Limits::new(0.2, 0.6);
        assert_eq!(limits.clamp(0.1), 0.2);
        assert_eq!(limits.clamp(0.4), 0.4);
        assert_eq!(limits.clamp(0.9), 0.6);
        assert!(limits.contains(0.6));
        assert!(!limits.contains(0.61));
    }
}
