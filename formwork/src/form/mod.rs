//! The form engine.
//!
//! A [`Form`] owns the registry of named fields, their rules and touched
//! state, and the subscriptions installed on each field's adapter. It decides
//! when fields are validated and resolves the rules that depend on other
//! fields:
//!
//! - `compare_with`: the field's value must equal a sibling's current value,
//!   read live on every validation.
//! - `required_if_not_empty`: the field is required only while at least one
//!   listed sibling is non-empty, re-evaluated on every validation.
//! - `compare_for`: validating the field also validates the named target,
//!   one hop only.
//!
//! # Example
//!
//! ```
//! use formwork::form::{Form, FormConfig};
//! use formwork::widgets::Input;
//!
//! let form = Form::new(FormConfig::new());
//! let email = Input::new();
//! let rules = form.config().rules("Email").required(true).email().build();
//! form.register_input("email", rules, email.clone()).unwrap();
//!
//! email.type_text("a@b.c");
//! assert!(form.validate());
//! assert_eq!(form.value("email").as_string(""), "a@b.c");
//! ```

mod binding;
mod config;
mod error;
mod result;

pub use config::{FormConfig, ValidationMode};
pub use error::FormError;
pub use result::{FieldError, ValidationResult};

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use indexmap::IndexMap;
use log::{debug, trace, warn};

use crate::adapter::{ChangeListener, FieldAdapter, FocusListener, Subscription};
use crate::rules::{RequiredRule, RuleSet};
use crate::validator;
use crate::value::FormValue;

use binding::FieldBinding;

type Fields = IndexMap<String, FieldBinding>;

struct FormInner {
    config: FormConfig,
    fields: RwLock<Fields>,
    /// Host listeners notified after the engine handles a change event.
    listeners: RwLock<HashMap<String, (u64, ChangeListener)>>,
    next_listener_id: AtomicU64,
}

impl Drop for FormInner {
    fn drop(&mut self) {
        let fields = self.fields.get_mut().unwrap_or_else(PoisonError::into_inner);
        for binding in fields.values() {
            binding.sever();
        }
    }
}

/// A set of validated fields.
///
/// `Form` is a cheap handle: clones share the same registry. All operations
/// run synchronously on the caller's thread. No internal lock is held while
/// an adapter is called, so adapters may call back into the form.
#[derive(Clone)]
pub struct Form {
    inner: Arc<FormInner>,
}

impl Form {
    pub fn new(config: FormConfig) -> Self {
        Self {
            inner: Arc::new(FormInner {
                config,
                fields: RwLock::new(IndexMap::new()),
                listeners: RwLock::new(HashMap::new()),
                next_listener_id: AtomicU64::new(0),
            }),
        }
    }

    pub fn config(&self) -> &FormConfig {
        &self.inner.config
    }

    pub fn mode(&self) -> ValidationMode {
        self.inner.config.mode
    }

    // -------------------------------------------------------------------------
    // Registration
    // -------------------------------------------------------------------------

    /// Register a field under `name`.
    ///
    /// Installs the change subscription (`OnChange` mode) or the focus
    /// subscription (`OnFocusLoss` mode) on the adapter. Registering a name
    /// that already exists replaces its binding in place and severs the old
    /// subscriptions.
    ///
    /// Fails if following `compare_for` targets from this field leads back
    /// to it through other fields.
    pub fn register_input<A>(
        &self,
        name: impl Into<String>,
        rules: RuleSet,
        adapter: A,
    ) -> Result<(), FormError>
    where
        A: FieldAdapter + 'static,
    {
        let name = name.into();
        self.check_compare_for(&name, &rules)?;

        let adapter: Arc<dyn FieldAdapter> = Arc::new(adapter);
        let live = Arc::new(AtomicBool::new(true));

        let (change, focus) = match self.mode() {
            ValidationMode::OnChange => {
                let listener = self.change_listener(&name, &live);
                (Some(adapter.on_change(listener)), None)
            }
            ValidationMode::OnFocusLoss => {
                let listener = self.focus_listener(&name, &live);
                (None, Some(adapter.on_focus(listener)))
            }
        };

        let binding = FieldBinding::new(adapter, rules, change, focus, live);
        let previous = self.write_fields().insert(name.clone(), binding);

        match previous {
            Some(old) => {
                debug!("Re-registered field '{}'", name);
                old.sever();
            }
            None => debug!("Registered field '{}' ({:?})", name, self.mode()),
        }
        Ok(())
    }

    /// Remove a field, severing its subscriptions first.
    ///
    /// Returns `false` if no field was registered under `name`.
    pub fn unregister_input(&self, name: &str) -> bool {
        let removed = self.write_fields().shift_remove(name);
        self.write_listeners().remove(name);

        match removed {
            Some(binding) => {
                binding.sever();
                debug!("Unregistered field '{}'", name);
                true
            }
            None => false,
        }
    }

    /// Sever every subscription and remove every field.
    ///
    /// The form is empty afterwards; fields must be registered again before
    /// it is used.
    pub fn clear(&self) {
        let fields = std::mem::take(&mut *self.write_fields());
        self.write_listeners().clear();

        for binding in fields.values() {
            binding.sever();
        }
        debug!("Cleared form ({} fields)", fields.len());
    }

    /// Replace a field's rules and re-validate it.
    ///
    /// Returns whether the field is valid under the new rules, or `false` if
    /// no field is registered under `name`.
    pub fn update_rules(&self, name: &str, rules: RuleSet) -> Result<bool, FormError> {
        self.check_compare_for(name, &rules)?;

        {
            let mut fields = self.write_fields();
            let Some(binding) = fields.get_mut(name) else {
                debug!("update_rules: field '{}' is not registered", name);
                return Ok(false);
            };
            binding.rules = Arc::new(rules);
        }

        Ok(self.validate_field(name))
    }

    /// Notify `listener` with the new value after each change event the
    /// engine handles for `name`. Replaces any previous listener for `name`.
    pub fn on_change<F>(&self, name: impl Into<String>, listener: F) -> Subscription
    where
        F: Fn(FormValue) + Send + Sync + 'static,
    {
        let name = name.into();
        let id = self.inner.next_listener_id.fetch_add(1, Ordering::SeqCst);
        self.write_listeners()
            .insert(name.clone(), (id, Arc::new(listener)));

        let weak = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let mut listeners = inner
                .listeners
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            if listeners.get(&name).is_some_and(|(current, _)| *current == id) {
                listeners.remove(&name);
            }
        })
    }

    // -------------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------------

    /// Clear every error, then validate every field in registration order.
    pub fn validate(&self) -> bool {
        self.validate_all().is_valid()
    }

    /// Like [`validate`](Self::validate), reporting which fields failed.
    pub fn validate_all(&self) -> ValidationResult {
        self.reset_errors();

        let errors = self
            .field_names()
            .into_iter()
            .filter_map(|name| match self.run_field(&name, true) {
                Some(Some(message)) => Some(FieldError {
                    field_name: name,
                    message,
                }),
                _ => None,
            })
            .collect();

        let result = ValidationResult::from_errors(errors);
        debug!("Validated form: {} invalid field(s)", result.errors().len());
        result
    }

    /// Validate one field and push the outcome to its error sink.
    ///
    /// If the field's rules carry `compare_for` naming another registered
    /// field, that field is validated afterwards. Returns whether this field
    /// is valid; `false` if it is not registered.
    pub fn validate_field(&self, name: &str) -> bool {
        match self.run_field(name, true) {
            Some(error) => error.is_none(),
            None => {
                debug!("validate_field: field '{}' is not registered", name);
                false
            }
        }
    }

    /// Returns `None` if `name` is not registered, else the field's error.
    fn run_field(&self, name: &str, propagate: bool) -> Option<Option<String>> {
        let (adapter, rules) = self.binding_parts(name)?;

        let value = adapter.value();
        let effective = self.effective_rules(&rules);
        let error = validator::validate(&value, &effective)
            .or_else(|| self.check_compare_with(&value, &rules));

        trace!("Field '{}' = {:?} -> {:?}", name, value, error);
        adapter.set_error(error.clone());

        if propagate
            && let Some(target) = rules.compare_for_target()
            && target != name
            && self.contains(target)
        {
            trace!("Field '{}' propagates to '{}'", name, target);
            self.run_field(target, false);
        }

        Some(error)
    }

    /// Resolve a conditional required rule against current sibling values.
    fn effective_rules<'a>(&self, rules: &'a RuleSet) -> Cow<'a, RuleSet> {
        match &rules.required {
            Some(required) if required.is_conditional() => {
                let active = required
                    .required_if_not_empty
                    .iter()
                    .any(|sibling| !self.value(sibling).is_empty());
                let required = active.then(|| RequiredRule::new(required.message.clone()));
                Cow::Owned(rules.with_required(required))
            }
            _ => Cow::Borrowed(rules),
        }
    }

    fn check_compare_with(&self, value: &FormValue, rules: &RuleSet) -> Option<String> {
        let rule = rules.compare_with.as_ref()?;
        let Some(target) = self.adapter(&rule.target) else {
            trace!("compare_with target '{}' is not registered", rule.target);
            return None;
        };
        (target.value() != *value).then(|| rule.message.clone())
    }

    /// Reject rules whose `compare_for` chain loops back to `name`.
    ///
    /// A field naming itself is tolerated: propagation skips it.
    fn check_compare_for(&self, name: &str, rules: &RuleSet) -> Result<(), FormError> {
        let fields = self.read_fields();
        let mut path = vec![name.to_string()];
        let mut next = rules.compare_for_target();

        while let Some(target) = next {
            if target == name {
                if path.len() == 1 {
                    return Ok(());
                }
                path.push(target.to_string());
                warn!("Rejected rules for '{}': compare-for cycle {:?}", name, path);
                return Err(FormError::CompareForCycle {
                    field: name.to_string(),
                    path,
                });
            }
            if path.iter().any(|visited| visited == target) {
                break;
            }
            path.push(target.to_string());
            next = fields.get(target).and_then(|b| b.rules.compare_for_target());
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Event handling
    // -------------------------------------------------------------------------

    fn change_listener(&self, name: &str, live: &Arc<AtomicBool>) -> ChangeListener {
        let weak = Arc::downgrade(&self.inner);
        let live = Arc::clone(live);
        let name = name.to_string();
        Arc::new(move |value| {
            if let Some(form) = Self::upgrade(&weak, &live) {
                form.handle_change(&name, value);
            }
        })
    }

    fn focus_listener(&self, name: &str, live: &Arc<AtomicBool>) -> FocusListener {
        let weak = Arc::downgrade(&self.inner);
        let live = Arc::clone(live);
        let name = name.to_string();
        Arc::new(move |_value, has_focus| {
            if has_focus {
                return;
            }
            if let Some(form) = Self::upgrade(&weak, &live) {
                form.handle_focus_lost(&name);
            }
        })
    }

    fn upgrade(weak: &Weak<FormInner>, live: &AtomicBool) -> Option<Self> {
        if !live.load(Ordering::SeqCst) {
            return None;
        }
        weak.upgrade().map(|inner| Self { inner })
    }

    fn handle_change(&self, name: &str, value: FormValue) {
        // initial population of an untouched field is not a user edit
        if !self.is_field_touched(name) && value.is_empty() {
            return;
        }
        self.set_touched(name, true);
        self.validate_field(name);

        let listener = self
            .read_listeners()
            .get(name)
            .map(|(_, listener)| Arc::clone(listener));
        if let Some(listener) = listener {
            listener(value);
        }
    }

    fn handle_focus_lost(&self, name: &str) {
        self.set_touched(name, true);
        self.validate_field(name);
    }

    // -------------------------------------------------------------------------
    // Values and errors
    // -------------------------------------------------------------------------

    /// Snapshot of every field's current value, in registration order.
    pub fn values(&self) -> IndexMap<String, FormValue> {
        self.adapters()
            .into_iter()
            .map(|(name, adapter)| {
                let value = adapter.value();
                (name, value)
            })
            .collect()
    }

    /// Current value of `name`; empty if it is not registered.
    pub fn value(&self, name: &str) -> FormValue {
        self.adapter(name)
            .map(|adapter| adapter.value())
            .unwrap_or_default()
    }

    /// Write `values` into every registered field and clear its error.
    ///
    /// Fields absent from `values` are cleared. Touched state is kept and
    /// nothing is re-validated.
    pub fn set_values(&self, values: &HashMap<String, FormValue>) {
        for (name, adapter) in self.adapters() {
            adapter.set_value(values.get(&name).cloned().unwrap_or_default());
            adapter.set_error(None);
        }
    }

    /// Write one field's value. Ignored if `name` is not registered.
    pub fn set_value(&self, name: &str, value: FormValue) {
        if let Some(adapter) = self.adapter(name) {
            adapter.set_value(value);
        }
    }

    /// Push an externally computed error, e.g. one returned by a server.
    pub fn set_error(&self, name: &str, error: Option<String>) {
        if let Some(adapter) = self.adapter(name) {
            adapter.set_error(error);
        }
    }

    pub fn set_errors<I, K>(&self, errors: I)
    where
        I: IntoIterator<Item = (K, Option<String>)>,
        K: AsRef<str>,
    {
        for (name, error) in errors {
            self.set_error(name.as_ref(), error);
        }
    }

    // -------------------------------------------------------------------------
    // Touched state and reset
    // -------------------------------------------------------------------------

    /// Whether every field has been touched. True for an empty form.
    pub fn is_touched(&self) -> bool {
        self.read_fields().values().all(|b| b.touched)
    }

    pub fn is_field_touched(&self, name: &str) -> bool {
        self.read_fields().get(name).is_some_and(|b| b.touched)
    }

    /// Clear touched state, value and error of every field.
    pub fn reset(&self) {
        let adapters: Vec<_> = {
            let mut fields = self.write_fields();
            fields
                .values_mut()
                .map(|binding| {
                    binding.touched = false;
                    Arc::clone(&binding.adapter)
                })
                .collect()
        };

        for adapter in adapters {
            adapter.set_value(FormValue::none());
            adapter.set_error(None);
        }
    }

    /// Clear touched state, value and error of one field.
    pub fn reset_field(&self, name: &str) {
        self.set_touched(name, false);
        if let Some(adapter) = self.adapter(name) {
            adapter.set_value(FormValue::none());
            adapter.set_error(None);
        }
    }

    /// Clear every displayed error. Values and touched state are kept.
    pub fn reset_errors(&self) {
        for (_, adapter) in self.adapters() {
            adapter.set_error(None);
        }
    }

    pub fn reset_error(&self, name: &str) {
        self.set_error(name, None);
    }

    fn set_touched(&self, name: &str, touched: bool) {
        if let Some(binding) = self.write_fields().get_mut(name) {
            binding.touched = touched;
        }
    }

    // -------------------------------------------------------------------------
    // Introspection
    // -------------------------------------------------------------------------

    pub fn len(&self) -> usize {
        self.read_fields().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_fields().is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read_fields().contains_key(name)
    }

    /// Registered names in registration order.
    pub fn field_names(&self) -> Vec<String> {
        self.read_fields().keys().cloned().collect()
    }

    /// Rules currently stored for `name`.
    pub fn rules(&self, name: &str) -> Option<Arc<RuleSet>> {
        self.read_fields().get(name).map(|b| Arc::clone(&b.rules))
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn adapter(&self, name: &str) -> Option<Arc<dyn FieldAdapter>> {
        self.read_fields().get(name).map(|b| Arc::clone(&b.adapter))
    }

    fn adapters(&self) -> Vec<(String, Arc<dyn FieldAdapter>)> {
        self.read_fields()
            .iter()
            .map(|(name, b)| (name.clone(), Arc::clone(&b.adapter)))
            .collect()
    }

    fn binding_parts(&self, name: &str) -> Option<(Arc<dyn FieldAdapter>, Arc<RuleSet>)> {
        self.read_fields()
            .get(name)
            .map(|b| (Arc::clone(&b.adapter), Arc::clone(&b.rules)))
    }

    fn read_fields(&self) -> RwLockReadGuard<'_, Fields> {
        self.inner
            .fields
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_fields(&self) -> RwLockWriteGuard<'_, Fields> {
        self.inner
            .fields
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn read_listeners(&self) -> RwLockReadGuard<'_, HashMap<String, (u64, ChangeListener)>> {
        self.inner
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_listeners(&self) -> RwLockWriteGuard<'_, HashMap<String, (u64, ChangeListener)>> {
        self.inner
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Form {
    fn default() -> Self {
        Self::new(FormConfig::default())
    }
}

impl std::fmt::Debug for Form {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Form")
            .field("mode", &self.mode())
            .field("fields", &self.field_names())
            .finish()
    }
}
