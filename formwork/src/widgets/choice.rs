//! Single-choice widgets: [`Select`] and [`RadioGroup`].
//!
//! Both hold a list of string options and at most one selection. Their value
//! is the selected label, or no value when nothing is selected.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use crate::adapter::{ChangeListener, FieldAdapter, FocusListener, Subscription};
use crate::value::FormValue;

use super::EventHub;

widget_id!(
    /// Unique identifier for a Select widget instance
    SelectId,
    "__select_"
);

widget_id!(
    /// Unique identifier for a RadioGroup widget instance
    RadioGroupId,
    "__radio_"
);

#[derive(Debug, Default)]
struct ChoiceInner {
    options: Vec<String>,
    selected: Option<usize>,
    focused: bool,
    error: Option<String>,
}

/// State shared by both single-choice widgets.
#[derive(Debug, Clone)]
struct SingleChoice {
    inner: Arc<RwLock<ChoiceInner>>,
    /// Change marker for hosts that poll
    dirty: Arc<AtomicBool>,
    events: EventHub,
}

impl SingleChoice {
    fn new(options: Vec<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ChoiceInner {
                options,
                ..ChoiceInner::default()
            })),
            dirty: Arc::new(AtomicBool::new(false)),
            events: EventHub::new(),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, ChoiceInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write<R>(&self, f: impl FnOnce(&mut ChoiceInner) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let result = f(&mut guard);
        self.dirty.store(true, Ordering::SeqCst);
        result
    }

    fn options(&self) -> Vec<String> {
        self.read().options.clone()
    }

    /// Replace the options, dropping a selection that falls out of range.
    fn set_options(&self, options: Vec<String>) {
        self.write(|inner| {
            if inner.selected.is_some_and(|idx| idx >= options.len()) {
                inner.selected = None;
            }
            inner.options = options;
        });
    }

    fn selected(&self) -> Option<usize> {
        self.read().selected
    }

    fn selected_label(&self) -> Option<String> {
        let inner = self.read();
        inner.selected.and_then(|idx| inner.options.get(idx).cloned())
    }

    /// Returns whether the selection changed.
    fn set_selected(&self, index: Option<usize>) -> bool {
        self.write(|inner| {
            let index = index.filter(|&idx| idx < inner.options.len());
            std::mem::replace(&mut inner.selected, index) != index
        })
    }

    fn select(&self, index: usize) {
        if index < self.read().options.len() && self.set_selected(Some(index)) {
            self.emit_change();
        }
    }

    fn deselect(&self) {
        if self.set_selected(None) {
            self.emit_change();
        }
    }

    fn set_focus(&self, focused: bool) {
        let changed = self.write(|inner| std::mem::replace(&mut inner.focused, focused) != focused);
        if changed {
            self.events.emit_focus(self.value(), focused);
        }
    }

    fn emit_change(&self) {
        self.events.emit_change(self.value());
    }

    fn error(&self) -> Option<String> {
        self.read().error.clone()
    }

    fn value(&self) -> FormValue {
        self.selected_label().into()
    }

    /// Select the option whose label equals the value's text.
    fn set_value(&self, value: FormValue) {
        let label = value.to_string();
        self.write(|inner| {
            inner.selected = inner.options.iter().position(|option| *option == label);
        });
    }

    fn set_error(&self, error: Option<String>) {
        self.write(|inner| inner.error = error);
    }
}

/// Generates the surface both single-choice widgets share.
macro_rules! single_choice_widget {
    ($widget:ident, $id:ident) => {
        impl $widget {
            pub fn id(&self) -> $id {
                self.id
            }

            /// Get the ID as a string (for node binding)
            pub fn id_string(&self) -> String {
                self.id.to_string()
            }

            pub fn events(&self) -> &EventHub {
                &self.state.events
            }

            pub fn options(&self) -> Vec<String> {
                self.state.options()
            }

            /// Replace the options. A selection past the new end is cleared.
            pub fn set_options<I, S>(&self, options: I)
            where
                I: IntoIterator<Item = S>,
                S: Into<String>,
            {
                self.state
                    .set_options(options.into_iter().map(Into::into).collect());
            }

            /// Index of the selected option.
            pub fn selected(&self) -> Option<usize> {
                self.state.selected()
            }

            pub fn selected_label(&self) -> Option<String> {
                self.state.selected_label()
            }

            /// Select an option programmatically. Out-of-range indices clear
            /// the selection. No change event is emitted.
            pub fn set_selected(&self, index: Option<usize>) {
                self.state.set_selected(index);
            }

            /// Select an option as the user would. Out-of-range indices are
            /// ignored; re-selecting the current option emits nothing.
            pub fn select(&self, index: usize) {
                self.state.select(index);
            }

            /// Clear the selection as the user would.
            pub fn deselect(&self) {
                self.state.deselect();
            }

            pub fn is_focused(&self) -> bool {
                self.state.read().focused
            }

            pub fn focus(&self) {
                self.state.set_focus(true);
            }

            pub fn blur(&self) {
                self.state.set_focus(false);
            }

            /// Whether selection, focus or error changed since the last
            /// `clear_dirty`.
            pub fn is_dirty(&self) -> bool {
                self.state.dirty.load(Ordering::SeqCst)
            }

            pub fn clear_dirty(&self) {
                self.state.dirty.store(false, Ordering::SeqCst);
            }

            pub fn error(&self) -> Option<String> {
                self.state.error()
            }

            pub fn has_error(&self) -> bool {
                self.state.read().error.is_some()
            }
        }

        impl FieldAdapter for $widget {
            fn value(&self) -> FormValue {
                self.state.value()
            }

            fn set_value(&self, value: FormValue) {
                self.state.set_value(value);
            }

            fn set_error(&self, error: Option<String>) {
                self.state.set_error(error);
            }

            fn on_change(&self, listener: ChangeListener) -> Subscription {
                self.state.events.subscribe_change(listener)
            }

            fn on_focus(&self, listener: FocusListener) -> Subscription {
                self.state.events.subscribe_focus(listener)
            }
        }
    };
}

/// A drop-down list with an optional placeholder shown while nothing is
/// selected.
#[derive(Debug, Clone)]
pub struct Select {
    id: SelectId,
    state: SingleChoice,
    placeholder: Arc<RwLock<String>>,
}

impl Select {
    pub fn new() -> Self {
        Self::with_options(Vec::<String>::new())
    }

    pub fn with_options<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: SelectId::new(),
            state: SingleChoice::new(options.into_iter().map(Into::into).collect()),
            placeholder: Arc::new(RwLock::new(String::new())),
        }
    }

    pub fn placeholder(self, placeholder: impl Into<String>) -> Self {
        if let Ok(mut guard) = self.placeholder.write() {
            *guard = placeholder.into();
        }
        self
    }

    /// The selected label, or the placeholder when nothing is selected.
    pub fn display_text(&self) -> String {
        self.selected_label().unwrap_or_else(|| {
            self.placeholder
                .read()
                .map(|guard| guard.clone())
                .unwrap_or_default()
        })
    }
}

impl Default for Select {
    fn default() -> Self {
        Self::new()
    }
}

single_choice_widget!(Select, SelectId);

/// A group of mutually exclusive radio buttons.
#[derive(Debug, Clone)]
pub struct RadioGroup {
    id: RadioGroupId,
    state: SingleChoice,
}

impl RadioGroup {
    pub fn new() -> Self {
        Self::with_options(Vec::<String>::new())
    }

    pub fn with_options<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: RadioGroupId::new(),
            state: SingleChoice::new(options.into_iter().map(Into::into).collect()),
        }
    }

    /// Whether the option at `index` is the selected one.
    pub fn is_checked(&self, index: usize) -> bool {
        self.selected() == Some(index)
    }
}

impl Default for RadioGroup {
    fn default() -> Self {
        Self::new()
    }
}

single_choice_widget!(RadioGroup, RadioGroupId);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_value_is_selected_label() {
        let select = Select::with_options(["Female", "Male"]);
        assert!(select.value().is_none());

        select.set_selected(Some(1));
        assert_eq!(select.value(), FormValue::from("Male"));

        select.set_selected(Some(7));
        assert!(select.value().is_none());
    }

    #[test]
    fn test_set_value_matches_label() {
        let radio = RadioGroup::with_options(["a", "b", "c"]);
        radio.set_value(FormValue::from("c"));
        assert_eq!(radio.selected(), Some(2));
        assert!(radio.is_checked(2));

        radio.set_value(FormValue::from("z"));
        assert_eq!(radio.selected(), None);
    }

    #[test]
    fn test_select_emits_only_on_change() {
        let radio = RadioGroup::with_options(["a", "b"]);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let _sub = radio.on_change(Arc::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        radio.select(0);
        radio.select(0);
        radio.select(9);
        radio.set_selected(Some(1));
        radio.deselect();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_set_options_drops_stale_selection() {
        let select = Select::with_options(["a", "b", "c"]);
        select.set_selected(Some(2));
        select.set_options(["x", "y"]);
        assert_eq!(select.selected(), None);
    }

    #[test]
    fn test_placeholder_display() {
        let select = Select::with_options(["One"]).placeholder("Choose...");
        assert_eq!(select.display_text(), "Choose...");
        select.set_selected(Some(0));
        assert_eq!(select.display_text(), "One");
    }
}
