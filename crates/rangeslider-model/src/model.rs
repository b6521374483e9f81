#![forbid(unsafe_code)]

//! Slider model façade.
//!
//! # Design
//!
//! [`SliderModel`] owns two separate values: an immutable
//! [`PositionSpace`] (shared through `Rc` so a renderer can keep a handle)
//! and a mutable [`SelectionState`] behind a `RefCell`. Every public method
//! takes `&self`, and the `RefCell` borrow is released before any event is
//! emitted. A handler holding a `Weak<SliderModel>` may therefore call back
//! into the model; the nested call completes before the outer one resumes.
//!
//! # Event order
//!
//! A successful selection emits one [`SliderEvent::PointChanged`], then one
//! [`SliderEvent::LimitsChanged`] per point whose limits moved as a
//! consequence. [`SliderModel::recompute_limits`] always emits exactly one
//! `LimitsChanged`. Failed calls emit nothing and change nothing.

use std::cell::RefCell;
use std::rc::Rc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Stateful;
use crate::config::SliderConfig;
use crate::error::{ConfigError, SelectError};
use crate::observer::{EventChannel, Observable};
use crate::selection::{Limits, SelectedPoint, SelectionState, SliderState};
use crate::space::{PositionSpace, SpaceSource};
use crate::value::SliderValue;

/// Change notification published by a [`SliderModel`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SliderEvent {
    /// A point moved (or was re-selected at the same place).
    PointChanged { id: String, point: SelectedPoint },
    /// A point's movement limits were recomputed. After a selection this is
    /// only sent for points whose limits changed; an explicit
    /// [`SliderModel::recompute_limits`] always sends it.
    LimitsChanged { id: String, limits: Limits },
}

impl SliderEvent {
    /// Identifier the event refers to.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::PointChanged { id, .. } | Self::LimitsChanged { id, .. } => id,
        }
    }
}

/// The slider model: value space, selected points, limits and events.
#[derive(Debug)]
pub struct SliderModel {
    space: Rc<PositionSpace>,
    selection: RefCell<SelectionState>,
    events: EventChannel<SliderEvent>,
}

impl SliderModel {
    /// Build the position space and register the configured points.
    ///
    /// Initial values missing from the space do not fail: range spaces snap
    /// to the nearest value, array and map spaces fall back to the first
    /// point. Both cases are logged at `warn`.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`] from source selection, space construction or
    /// duplicate point ids.
    pub fn new(config: &SliderConfig) -> Result<Self, ConfigError> {
        let source = config.source()?;
        let space = PositionSpace::build(&source, config.precision)?;

        let snap = matches!(source, SpaceSource::Range { .. });
        let mut selection = SelectionState::new(config.collision_avoidance);
        for (id, value) in &config.points {
            let point = initial_point(&space, snap, id, value);
            selection.register(id.clone(), point)?;
        }
        selection.refresh_limits();

        tracing::debug!(
            message = "slider.model.init",
            points = selection.len(),
            space_points = space.len(),
            collision_avoidance = config.collision_avoidance
        );

        Ok(Self {
            space: Rc::new(space),
            selection: RefCell::new(selection),
            events: EventChannel::new(),
        })
    }

    /// Shared handle to the position space.
    #[must_use]
    pub fn space(&self) -> Rc<PositionSpace> {
        Rc::clone(&self.space)
    }

    #[must_use]
    pub fn collision_avoidance(&self) -> bool {
        self.selection.borrow().collision_avoidance()
    }

    /// Registered identifiers in registration order.
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.selection.borrow().ids().map(str::to_owned).collect()
    }

    #[must_use]
    pub fn point(&self, id: &str) -> Option<SelectedPoint> {
        self.selection.borrow().point(id).cloned()
    }

    #[must_use]
    pub fn limits(&self, id: &str) -> Option<Limits> {
        self.selection.borrow().limits(id)
    }

    /// `(id, point)` pairs in registration order.
    #[must_use]
    pub fn selected_points(&self) -> Vec<(String, SelectedPoint)> {
        self.selection.borrow().selected_points()
    }

    /// Move `id` to the space point nearest `ratio`, staying within its
    /// limits.
    ///
    /// # Errors
    ///
    /// [`SelectError::UnknownPoint`] if `id` is not registered.
    pub fn select_by_position(&self, id: &str, ratio: f64) -> Result<SelectedPoint, SelectError> {
        let index = {
            let selection = self.selection.borrow();
            let slot = selection.slot_of(id)?;
            let ratio = if ratio.is_nan() {
                0.0
            } else {
                ratio.clamp(0.0, 1.0)
            };
            self.space
                .nearest_index_by_ratio(selection.limits_at(slot).clamp(ratio))
        };
        self.commit(id, index, "position")
    }

    /// Move `id` to the point holding `value`.
    ///
    /// Numeric spaces snap absent numbers to the nearest stored value. The
    /// result is clamped into the point's limits.
    ///
    /// # Errors
    ///
    /// [`SelectError::UnknownPoint`] if `id` is not registered,
    /// [`SelectError::ValueNotFound`] if a non-numeric space lacks `value`.
    pub fn select_by_value(
        &self,
        id: &str,
        value: impl Into<SliderValue>,
    ) -> Result<SelectedPoint, SelectError> {
        let value = value.into();
        let index = {
            let selection = self.selection.borrow();
            let slot = selection.slot_of(id)?;
            let found = self.space.index_of_value(&value).or_else(|| match &value {
                SliderValue::Number(n) if self.space.is_numeric() => {
                    self.space.nearest_index_by_value(*n)
                }
                _ => None,
            });
            let Some(index) = found else {
                return Err(SelectError::ValueNotFound {
                    id: id.to_owned(),
                    value,
                });
            };
            self.clamp_index(index, selection.limits_at(slot))
        };
        self.commit(id, index, "value")
    }

    /// Move whichever point is nearest `ratio` to `ratio`.
    ///
    /// Used for clicks on shared controls (track, grid). Ties go to the
    /// earlier-registered point. Returns the identifier that moved.
    ///
    /// # Errors
    ///
    /// [`SelectError::NoPoints`] if nothing is registered.
    pub fn select_by_unknown_position(&self, ratio: f64) -> Result<String, SelectError> {
        let id = {
            let selection = self.selection.borrow();
            let query = self.space.normalize_ratio(ratio);
            let slot = selection
                .nearest_slot(query, self.space.precision())
                .ok_or(SelectError::NoPoints)?;
            selection.id_at(slot).to_owned()
        };
        self.select_by_position(&id, ratio)?;
        Ok(id)
    }

    /// Move `id` by `steps` space points (negative moves down), staying
    /// within its limits. Intended for keyboard nudging.
    ///
    /// # Errors
    ///
    /// [`SelectError::UnknownPoint`] if `id` is not registered.
    pub fn step_by(&self, id: &str, steps: i64) -> Result<SelectedPoint, SelectError> {
        let index = {
            let selection = self.selection.borrow();
            let slot = selection.slot_of(id)?;
            let ratio = selection.point_at(slot).ratio;
            let current = self
                .space
                .index_of_ratio(ratio)
                .unwrap_or_else(|| self.space.nearest_index_by_ratio(ratio));
            let last = self.space.len() - 1;
            let target = i64::try_from(current)
                .unwrap_or(i64::MAX)
                .saturating_add(steps)
                .clamp(0, i64::try_from(last).unwrap_or(i64::MAX));
            let target = usize::try_from(target).unwrap_or(last);
            self.clamp_index(target, selection.limits_at(slot))
        };
        self.commit(id, index, "step")
    }

    /// Recompute and store the limits of `id`, then emit
    /// [`SliderEvent::LimitsChanged`]. Call when a knob becomes active.
    ///
    /// # Errors
    ///
    /// [`SelectError::UnknownPoint`] if `id` is not registered.
    pub fn recompute_limits(&self, id: &str) -> Result<Limits, SelectError> {
        let limits = {
            let mut selection = self.selection.borrow_mut();
            let slot = selection.slot_of(id)?;
            let limits = selection.compute_limits(slot);
            selection.store_limits(slot, limits);
            limits
        };
        tracing::debug!(
            message = "slider.limits",
            id,
            min = limits.min,
            max = limits.max
        );
        self.events.emit(&SliderEvent::LimitsChanged {
            id: id.to_owned(),
            limits,
        });
        Ok(limits)
    }

    /// Keep `index` if its ratio is inside `limits`, otherwise re-snap to
    /// the nearest point at the clamped ratio.
    fn clamp_index(&self, index: usize, limits: Limits) -> usize {
        let ratio = self.space.points()[index].ratio;
        if limits.contains(ratio) {
            index
        } else {
            self.space.nearest_index_by_ratio(limits.clamp(ratio))
        }
    }

    fn commit(&self, id: &str, index: usize, via: &'static str) -> Result<SelectedPoint, SelectError> {
        let point = SelectedPoint::from(&self.space.points()[index]);
        let changed: Vec<(String, Limits)> = {
            let mut selection = self.selection.borrow_mut();
            let slot = selection.slot_of(id)?;
            selection.set_point(slot, point.clone());
            selection
                .refresh_limits()
                .into_iter()
                .map(|(slot, limits)| (selection.id_at(slot).to_owned(), limits))
                .collect()
        };

        tracing::debug!(
            message = "slider.select",
            via,
            id,
            ratio = point.ratio,
            value = %point.value,
            limits_changed = changed.len()
        );

        self.events.emit(&SliderEvent::PointChanged {
            id: id.to_owned(),
            point: point.clone(),
        });
        for (id, limits) in changed {
            self.events.emit(&SliderEvent::LimitsChanged { id, limits });
        }
        Ok(point)
    }
}

impl Observable<SliderEvent> for SliderModel {
    fn events(&self) -> &EventChannel<SliderEvent> {
        &self.events
    }
}

impl Stateful for SliderModel {
    type State = SliderState;

    fn state(&self) -> SliderState {
        self.selection.borrow().state()
    }
}

/// Space point for an initial value. `snap` lets numbers missing from the
/// space take the nearest value instead of the first point.
fn initial_point(space: &PositionSpace, snap: bool, id: &str, value: &SliderValue) -> SelectedPoint {
    if let Some(point) = space.exact_by_value(value) {
        return point.into();
    }
    let fallback = match value {
        SliderValue::Number(n) if snap => space.nearest_value_to(*n),
        _ => None,
    }
    .unwrap_or_else(|| space.first());
    tracing::warn!(
        message = "slider.initial_fallback",
        id,
        requested = %value,
        ratio = fallback.ratio,
        value = %fallback.value
    );
    fallback.into()
}
