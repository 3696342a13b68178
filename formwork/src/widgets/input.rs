//! Text input widget.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use crate::adapter::{ChangeListener, FieldAdapter, FocusListener, Subscription};
use crate::value::FormValue;

use super::EventHub;

widget_id!(
    /// Unique identifier for an Input widget instance
    InputId,
    "__input_"
);

/// Internal state for an Input widget
#[derive(Debug, Default)]
struct InputInner {
    /// Current text value
    text: String,
    /// Placeholder text
    placeholder: String,
    /// Cursor position (byte offset)
    cursor: usize,
    /// Whether the input currently has focus
    focused: bool,
    /// Validation error message (if any)
    error: Option<String>,
}

/// A single-line text input.
///
/// An empty input reads as no value, so `required` rules treat it as missing.
///
/// # Example
///
/// ```
/// use formwork::adapter::FieldAdapter;
/// use formwork::widgets::Input;
///
/// let input = Input::with_placeholder("you@example.com");
/// assert!(input.value().is_none());
///
/// input.type_text("me@example.com");
/// assert_eq!(input.text(), "me@example.com");
/// ```
#[derive(Debug, Clone)]
pub struct Input {
    /// Unique identifier for this input instance
    id: InputId,
    /// Internal state
    inner: Arc<RwLock<InputInner>>,
    /// Set on every state write until the host clears it
    dirty: Arc<AtomicBool>,
    events: EventHub,
}

impl Input {
    /// Create a new empty input
    pub fn new() -> Self {
        Self {
            id: InputId::new(),
            inner: Arc::new(RwLock::new(InputInner::default())),
            dirty: Arc::new(AtomicBool::new(false)),
            events: EventHub::new(),
        }
    }

    /// Create an input with an initial value
    pub fn with_value(text: impl Into<String>) -> Self {
        let input = Self::new();
        input.set_text(text);
        input.clear_dirty();
        input
    }

    /// Create an input with a placeholder
    pub fn with_placeholder(placeholder: impl Into<String>) -> Self {
        let input = Self::new();
        input.write(|inner| inner.placeholder = placeholder.into());
        input.clear_dirty();
        input
    }

    pub fn id(&self) -> InputId {
        self.id
    }

    /// Get the ID as a string (for node binding)
    pub fn id_string(&self) -> String {
        self.id.to_string()
    }

    /// Listeners attached to this input.
    pub fn events(&self) -> &EventHub {
        &self.events
    }

    // -------------------------------------------------------------------------
    // Read methods
    // -------------------------------------------------------------------------

    pub fn text(&self) -> String {
        self.read().text.clone()
    }

    pub fn placeholder(&self) -> String {
        self.read().placeholder.clone()
    }

    /// Cursor position (byte offset)
    pub fn cursor(&self) -> usize {
        self.read().cursor
    }

    pub fn is_empty(&self) -> bool {
        self.read().text.is_empty()
    }

    pub fn is_focused(&self) -> bool {
        self.read().focused
    }

    // -------------------------------------------------------------------------
    // Programmatic writes (no events)
    // -------------------------------------------------------------------------

    /// Replace the text and move the cursor to the end.
    pub fn set_text(&self, text: impl Into<String>) {
        self.write(|inner| {
            inner.text = text.into();
            inner.cursor = inner.text.len();
        });
    }

    /// Clear the text.
    pub fn clear(&self) {
        self.set_text(String::new());
    }

    // -------------------------------------------------------------------------
    // User edits (emit change events)
    // -------------------------------------------------------------------------

    /// Insert text at the cursor, as if typed.
    pub fn type_text(&self, text: &str) {
        self.write(|inner| {
            let cursor = inner.cursor;
            inner.text.insert_str(cursor, text);
            inner.cursor += text.len();
        });
        self.emit_change();
    }

    /// Insert a character at the cursor.
    pub fn insert_char(&self, c: char) {
        self.write(|inner| {
            let cursor = inner.cursor;
            inner.text.insert(cursor, c);
            inner.cursor += c.len_utf8();
        });
        self.emit_change();
    }

    /// Delete the character before the cursor (backspace).
    pub fn delete_char_before(&self) {
        let deleted = self.write(|inner| {
            if inner.cursor == 0 {
                return false;
            }
            let prev = inner.text[..inner.cursor]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            inner.text.remove(prev);
            inner.cursor = prev;
            true
        });
        if deleted {
            self.emit_change();
        }
    }

    /// Select all and replace, as if pasted over the existing text.
    pub fn replace_text(&self, text: impl Into<String>) {
        self.set_text(text);
        self.emit_change();
    }

    /// Select all and delete.
    pub fn erase(&self) {
        self.replace_text(String::new());
    }

    // -------------------------------------------------------------------------
    // Focus
    // -------------------------------------------------------------------------

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

    // -------------------------------------------------------------------------
    // Dirty tracking
    // -------------------------------------------------------------------------

    /// Whether any state changed since the last [`clear_dirty`](Self::clear_dirty).
    ///
    /// Lets a host poll for changes (value, cursor, focus, error) instead of
    /// subscribing to events.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }

    // -------------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------------

    /// Get the current validation error message (if any).
    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }

    pub fn has_error(&self) -> bool {
        self.read().error.is_some()
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn emit_change(&self) {
        self.events.emit_change(self.value());
    }

    fn read(&self) -> RwLockReadGuard<'_, InputInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write<R>(&self, f: impl FnOnce(&mut InputInner) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let result = f(&mut guard);
        self.dirty.store(true, Ordering::SeqCst);
        result
    }
}

impl Default for Input {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldAdapter for Input {
    fn value(&self) -> FormValue {
        let inner = self.read();
        if inner.text.is_empty() {
            FormValue::none()
        } else {
            FormValue::from(inner.text.as_str())
        }
    }

    fn set_value(&self, value: FormValue) {
        self.set_text(value.to_string());
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
