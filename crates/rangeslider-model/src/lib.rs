#![forbid(unsafe_code)]

//! Headless model for range and multi-point sliders.
//!
//! The crate keeps the state of a slider separate from any rendering:
//!
//! - [`PositionSpace`] maps track ratios in `[0, 1]` to selectable values
//!   (an evenly stepped numeric range, an ordered list, or explicit
//!   `(ratio, value)` pairs).
//! - [`SelectionState`] tracks named selected points and the limits that
//!   stop them from crossing each other.
//! - [`SliderModel`] ties both together and publishes [`SliderEvent`]s
//!   through an [`EventChannel`].
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use rangeslider_model::{handler, Observable, SliderConfig, SliderEvent, SliderModel, Stateful};
//!
//! let config = SliderConfig::range(-50.0, 50.0, 0.5)
//!     .with_point("from", 0)
//!     .with_point("to", 25);
//! let model = SliderModel::new(&config).unwrap();
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&seen);
//! model.subscribe(handler(move |event: &SliderEvent| {
//!     sink.borrow_mut().push(event.id().to_owned());
//! }));
//!
//! let point = model.select_by_position("from", 0.75).unwrap();
//! // "to" sits at ratio 0.75, so "from" stops there.
//! assert_eq!(point.ratio, 0.75);
//! assert_eq!(seen.borrow()[0], "from");
//! assert_eq!(model.state().points.len(), 2);
//! ```
//!
//! # Features
//!
//! - `serde`: `Serialize`/`Deserialize` for configs, values, events and
//!   state snapshots.
//! - `config-file`: [`SliderConfig`] loaders for JSON and TOML.

pub mod config;
pub mod error;
pub mod model;
pub mod observer;
pub mod selection;
pub mod space;
pub mod value;

pub use config::{RangeSpec, SliderConfig};
pub use error::{ConfigError, SelectError};
pub use model::{SliderEvent, SliderModel};
pub use observer::{EventChannel, Handler, Observable, handler};
pub use selection::{Limits, SelectedPoint, SelectionState, SliderState};
pub use space::{MAX_POINTS, MAX_PRECISION, PositionSpace, SpacePoint, SpaceSource};
pub use value::SliderValue;

/// A component that can hand out an owned snapshot of its state.
pub trait Stateful {
    type State;

    /// Snapshot of the current state. Later changes do not affect it.
    fn state(&self) -> Self::State;
}
