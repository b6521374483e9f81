#![forbid(unsafe_code)]

//! Synchronous one-to-many event delivery.
//!
//! # Design
//!
//! [`EventChannel<E>`] keeps an ordered list of shared handlers
//! (`Rc<dyn Fn(&E)>`). Handler identity is the `Rc` allocation, so
//! subscribing the same handle twice is a no-op and unsubscribing needs the
//! same handle back.
//!
//! # Invariants
//!
//! 1. Handlers run in registration order.
//! 2. [`EventChannel::emit`] delivers to the handlers registered when the call
//!    started. Subscribing or unsubscribing from inside a handler only
//!    affects later emissions.
//! 3. No borrow is held while a handler runs, so handlers may re-enter the
//!    channel (or the component that owns it).
//!
//! # Failure Modes
//!
//! - **Handler panic**: not caught. The panic unwinds through `emit` to the
//!   caller; handlers later in the snapshot are not called.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::trace_span;

/// A shared event handler.
pub type Handler<E> = Rc<dyn Fn(&E)>;

/// Wrap a closure as a [`Handler`].
///
/// Keep the returned handle around if you want to unsubscribe later.
pub fn handler<E>(f: impl Fn(&E) + 'static) -> Handler<E> {
    Rc::new(f)
}

fn same_handler<E>(a: &Handler<E>, b: &Handler<E>) -> bool {
    // Compare data pointers only; vtable addresses are not unique.
    std::ptr::eq(Rc::as_ptr(a).cast::<()>(), Rc::as_ptr(b).cast::<()>())
}

/// Ordered list of subscribers for events of type `E`.
pub struct EventChannel<E> {
    handlers: RefCell<Vec<Handler<E>>>,
}

impl<E> Default for EventChannel<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EventChannel<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventChannel")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

impl<E> EventChannel<E> {
    /// Create a channel with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(Vec::new()),
        }
    }

    /// Register `handler`. Returns `false` if that exact handle was already
    /// registered.
    pub fn subscribe(&self, handler: Handler<E>) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        if handlers.iter().any(|h| same_handler(h, &handler)) {
            return false;
        }
        handlers.push(handler);
        true
    }

    /// Remove `handler`. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, handler: &Handler<E>) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let before = handlers.len();
        handlers.retain(|h| !same_handler(h, handler));
        handlers.len() != before
    }

    /// Deliver `event` to every handler registered at the start of the call.
    pub fn emit(&self, event: &E) {
        let snapshot: Vec<Handler<E>> = self.handlers.borrow().clone();
        if snapshot.is_empty() {
            return;
        }
        let _span = trace_span!("slider.emit", subscribers = snapshot.len()).entered();
        for handler in &snapshot {
            handler(event);
        }
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    /// Drop every subscriber.
    pub fn clear(&self) {
        self.handlers.borrow_mut().clear();
    }
}

/// A component that publishes events of type `E` through an [`EventChannel`].
pub trait Observable<E> {
    /// The channel events are published on.
    fn events(&self) -> &EventChannel<E>;

    /// See [`EventChannel::subscribe`].
    fn subscribe(&self, handler: Handler<E>) -> bool {
        self.events().subscribe(handler)
    }

    /// See [`EventChannel::unsubscribe`].
    fn unsubscribe(&self, handler: &Handler<E>) -> bool {
        self.events().unsubscribe(handler)
    }
}
