//! Listener bookkeeping shared by the widgets.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::adapter::{ChangeListener, FocusListener, Subscription};
use crate::value::FormValue;

#[derive(Default)]
struct HubInner {
    next_id: u64,
    change: Vec<(u64, ChangeListener)>,
    focus: Vec<(u64, FocusListener)>,
}

/// Change and focus listeners attached to one widget.
///
/// Listeners are copied out before dispatch, so a listener may read the
/// widget, subscribe, or unsubscribe while it runs.
#[derive(Clone, Default)]
pub struct EventHub {
    inner: Arc<Mutex<HubInner>>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe_change(&self, listener: ChangeListener) -> Subscription {
        let id = {
            let mut inner = self.lock();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.change.push((id, listener));
            id
        };

        let weak = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
                inner.change.retain(|(i, _)| *i != id);
            }
        })
    }

    pub fn subscribe_focus(&self, listener: FocusListener) -> Subscription {
        let id = {
            let mut inner = self.lock();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.focus.push((id, listener));
            id
        };

        let weak = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
                inner.focus.retain(|(i, _)| *i != id);
            }
        })
    }

    pub fn emit_change(&self, value: FormValue) {
        let listeners: Vec<_> = self
            .lock()
            .change
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        for listener in listeners {
            listener(value.clone());
        }
    }

    pub fn emit_focus(&self, value: FormValue, has_focus: bool) {
        let listeners: Vec<_> = self
            .lock()
            .focus
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        for listener in listeners {
            listener(value.clone(), has_focus);
        }
    }

    /// Number of attached change listeners.
    pub fn change_listeners(&self) -> usize {
        self.lock().change.len()
    }

    /// Number of attached focus listeners.
    pub fn focus_listeners(&self) -> usize {
        self.lock().focus.len()
    }

    fn lock(&self) -> MutexGuard<'_, HubInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for EventHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHub")
            .field("change", &self.change_listeners())
            .field("focus", &self.focus_listeners())
            .finish()
    }
}
