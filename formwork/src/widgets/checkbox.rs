//! Boolean and multi-choice check widgets.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use crate::adapter::{ChangeListener, FieldAdapter, FocusListener, Subscription};
use crate::value::FormValue;

use super::EventHub;

widget_id!(
    /// Unique identifier for a Checkbox widget instance
    CheckboxId,
    "__checkbox_"
);

widget_id!(
    /// Unique identifier for a CheckboxGroup widget instance
    CheckboxGroupId,
    "__checkbox_group_"
);

#[derive(Debug, Default)]
struct CheckboxInner {
    label: String,
    checked: bool,
    focused: bool,
    error: Option<String>,
}

/// A single checkbox. Its value is always a boolean, so a `required` rule
/// demands that it be checked.
#[derive(Debug, Clone)]
pub struct Checkbox {
    id: CheckboxId,
    inner: Arc<RwLock<CheckboxInner>>,
    dirty: Arc<AtomicBool>,
    events: EventHub,
}

impl Checkbox {
    pub fn new() -> Self {
        Self::with_label("")
    }

    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            id: CheckboxId::new(),
            inner: Arc::new(RwLock::new(CheckboxInner {
                label: label.into(),
                ..CheckboxInner::default()
            })),
            dirty: Arc::new(AtomicBool::new(false)),
            events: EventHub::new(),
        }
    }

    pub fn id(&self) -> CheckboxId {
        self.id
    }

    pub fn id_string(&self) -> String {
        self.id.to_string()
    }

    pub fn events(&self) -> &EventHub {
        &self.events
    }

    pub fn label(&self) -> String {
        self.read().label.clone()
    }

    pub fn is_checked(&self) -> bool {
        self.read().checked
    }

    /// Set the checked state without emitting a change event.
    pub fn set_checked(&self, checked: bool) {
        self.write(|inner| inner.checked = checked);
    }

    /// Flip the checked state as the user would.
    pub fn toggle(&self) {
        self.write(|inner| inner.checked = !inner.checked);
        self.events.emit_change(self.value());
    }

    pub fn is_focused(&self) -> bool {
        self.read().focused
    }

    pub fn focus(&self) {
        self.set_focus(true);
    }

    pub fn blur(&self) {
        self.set_focus(false);
    }

    fn set_focus(&self, focused: bool) {
        let changed = self.write(|inner| std::mem::replace(&mut inner.focused, focused) != focused);
        if changed {
            self.events.emit_focus(self.value(), focused);
        }
    }

    /// Whether any state changed since the last `clear_dirty`.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }

    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }

    pub fn has_error(&self) -> bool {
        self.read().error.is_some()
    }

    fn read(&self) -> RwLockReadGuard<'_, CheckboxInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write<R>(&self, f: impl FnOnce(&mut CheckboxInner) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let result = f(&mut guard);
        self.dirty.store(true, Ordering::SeqCst);
        result
    }
}

impl Default for Checkbox {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldAdapter for Checkbox {
    fn value(&self) -> FormValue {
        FormValue::from(self.is_checked())
    }

    /// Accepts booleans and the strings `"true"`/`"false"`; anything else
    /// unchecks the box.
    fn set_value(&self, value: FormValue) {
        self.set_checked(value.as_bool(false));
    }

    fn set_error(&self, error: Option<String>) {
        self.write(|inner| inner.error = error);
    }

    fn on_change(&self, listener: ChangeListener) -> Subscription {
        self.events.subscribe_change(listener)
    }

    fn on_focus(&self, listener: FocusListener) -> Subscription {
        self.events.subscribe_focus(listener)
    }
}

#[derive(Debug, Default)]
struct GroupInner {
    options: Vec<String>,
    checked: Vec<bool>,
    focused: bool,
    error: Option<String>,
}

/// A set of independent checkboxes. Its value is the list of checked
/// labels, in option order.
#[derive(Debug, Clone)]
pub struct CheckboxGroup {
    id: CheckboxGroupId,
    inner: Arc<RwLock<GroupInner>>,
    dirty: Arc<AtomicBool>,
    events: EventHub,
}

impl CheckboxGroup {
    pub fn with_options<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options: Vec<String> = options.into_iter().map(Into::into).collect();
        let checked = vec![false; options.len()];
        Self {
            id: CheckboxGroupId::new(),
            inner: Arc::new(RwLock::new(GroupInner {
                options,
                checked,
                ..GroupInner::default()
            })),
            dirty: Arc::new(AtomicBool::new(false)),
            events: EventHub::new(),
        }
    }

    pub fn id(&self) -> CheckboxGroupId {
        self.id
    }

    pub fn id_string(&self) -> String {
        self.id.to_string()
    }

    pub fn events(&self) -> &EventHub {
        &self.events
    }

    pub fn options(&self) -> Vec<String> {
        self.read().options.clone()
    }

    pub fn is_checked(&self, index: usize) -> bool {
        self.read().checked.get(index).copied().unwrap_or(false)
    }

    /// Labels of the checked options.
    pub fn checked_labels(&self) -> Vec<String> {
        let inner = self.read();
        inner
            .options
            .iter()
            .zip(&inner.checked)
            .filter(|(_, checked)| **checked)
            .map(|(label, _)| label.clone())
            .collect()
    }

    /// Set one option without emitting a change event.
    pub fn set_checked(&self, index: usize, checked: bool) {
        self.write(|inner| {
            if let Some(slot) = inner.checked.get_mut(index) {
                *slot = checked;
            }
        });
    }

    /// Flip one option as the user would. Out-of-range indices are ignored.
    pub fn toggle(&self, index: usize) {
        let toggled = self.write(|inner| match inner.checked.get_mut(index) {
            Some(slot) => {
                *slot = !*slot;
                true
            }
            None => false,
        });
        if toggled {
            self.events.emit_change(self.value());
        }
    }

    pub fn focus(&self) {
        self.set_focus(true);
    }

    pub fn blur(&self) {
        self.set_focus(false);
    }

    fn set_focus(&self, focused: bool) {
        let changed = self.write(|inner| std::mem::replace(&mut inner.focused, focused) != focused);
        if changed {
            self.events.emit_focus(self.value(), focused);
        }
    }

    /// Whether any state changed since the last `clear_dirty`.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }

    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }

    pub fn has_error(&self) -> bool {
        self.read().error.is_some()
    }

    fn read(&self) -> RwLockReadGuard<'_, GroupInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write<R>(&self, f: impl FnOnce(&mut GroupInner) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let result = f(&mut guard);
        self.dirty.store(true, Ordering::SeqCst);
        result
    }
}

impl FieldAdapter for CheckboxGroup {
    fn value(&self) -> FormValue {
        FormValue::from(self.checked_labels())
    }

    /// Checks exactly the options named in a list of strings.
    fn set_value(&self, value: FormValue) {
        let wanted: Vec<String> = value.as_collection(Vec::new());
        self.write(|inner| {
            let GroupInner {
                options, checked, ..
            } = inner;
            for (label, slot) in options.iter().zip(checked.iter_mut()) {
                *slot = wanted.contains(label);
            }
        });
    }

    fn set_error(&self, error: Option<String>) {
        self.write(|inner| inner.error = error);
    }

    fn on_change(&self, listener: ChangeListener) -> Subscription {
        self.events.subscribe_change(listener)
    }

    fn on_focus(&self, listener: FocusListener) -> Subscription {
        self.events.subscribe_focus(listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkbox_value_is_bool() {
        let checkbox = Checkbox::with_label("I agree");
        assert_eq!(checkbox.value(), FormValue::from(false));

        checkbox.toggle();
        assert_eq!(checkbox.value(), FormValue::from(true));

        checkbox.set_value(FormValue::from("false"));
        assert!(!checkbox.is_checked());
    }

    #[test]
    fn test_group_value_lists_checked_labels() {
        let group = CheckboxGroup::with_options(["red", "green", "blue"]);
        assert_eq!(group.value(), FormValue::from(Vec::<String>::new()));

        group.toggle(2);
        group.toggle(0);
        group.toggle(5);
        assert_eq!(group.checked_labels(), vec!["red", "blue"]);
    }

    #[test]
    fn test_group_set_value() {
        let group = CheckboxGroup::with_options(["red", "green", "blue"]);
        group.set_value(FormValue::from(vec!["green", "purple"]));
        assert!(!group.is_checked(0));
        assert!(group.is_checked(1));
        assert!(!group.is_checked(2));

        group.set_value(FormValue::none());
        assert!(group.checked_labels().is_empty());
    }
}
