//! The contract between a concrete input widget and the form engine.

use std::fmt;
use std::sync::{Arc, Mutex};

use crate::value::FormValue;

/// Called with the new value on every user-driven change.
pub type ChangeListener = Arc<dyn Fn(FormValue) + Send + Sync>;

/// Called with `(current value, has_focus)` on every focus transition.
pub type FocusListener = Arc<dyn Fn(FormValue, bool) + Send + Sync>;

/// Binding between one input widget and the engine.
///
/// The engine installs at most one of the two subscriptions per field,
/// depending on the form's [`ValidationMode`](crate::form::ValidationMode).
/// Widgets that never emit a kind of event can keep the default, which
/// returns an inert handle.
///
/// Implementations must not hold internal locks while invoking listeners:
/// listeners call back into the engine, which reads the widget again.
pub trait FieldAdapter: Send + Sync {
    /// Current value of the widget.
    fn value(&self) -> FormValue;

    /// Write a value programmatically. Must not emit a change event.
    fn set_value(&self, value: FormValue);

    /// Display (`Some`) or clear (`None`) a validation message.
    fn set_error(&self, error: Option<String>);

    /// Subscribe to user-driven value changes.
    fn on_change(&self, listener: ChangeListener) -> Subscription {
        let _ = listener;
        Subscription::noop()
    }

    /// Subscribe to focus transitions.
    fn on_focus(&self, listener: FocusListener) -> Subscription {
        let _ = listener;
        Subscription::noop()
    }
}

impl<T: FieldAdapter + ?Sized> FieldAdapter for Arc<T> {
    fn value(&self) -> FormValue {
        (**self).value()
    }

    fn set_value(&self, value: FormValue) {
        (**self).set_value(value)
    }

    fn set_error(&self, error: Option<String>) {
        (**self).set_error(error)
    }

    fn on_change(&self, listener: ChangeListener) -> Subscription {
        (**self).on_change(listener)
    }

    fn on_focus(&self, listener: FocusListener) -> Subscription {
        (**self).on_focus(listener)
    }
}

type Disposer = Box<dyn FnOnce() + Send>;

/// Handle returned by a subscription.
///
/// [`unsubscribe`](Self::unsubscribe) runs the disposer once; later calls do
/// nothing. Dropping the handle leaves the subscription in place.
pub struct Subscription {
    disposer: Mutex<Option<Disposer>>,
}

impl Subscription {
    pub fn new<F>(dispose: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            disposer: Mutex::new(Some(Box::new(dispose))),
        }
    }

    /// A handle with nothing to dispose.
    pub fn noop() -> Self {
        Self {
            disposer: Mutex::new(None),
        }
    }

    /// Sever the subscription. Idempotent.
    pub fn unsubscribe(&self) {
        let disposer = self
            .disposer
            .lock()
            .map(|mut guard| guard.take())
            .unwrap_or_else(|poisoned| poisoned.into_inner().take());

        if let Some(dispose) = disposer {
            dispose();
        }
    }

    /// Whether the disposer has yet to run.
    pub fn is_active(&self) -> bool {
        self.disposer
            .lock()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
