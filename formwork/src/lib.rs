//! Reactive form validation
//!
//! Fields are registered with a [`Form`](form::Form) under a name, a
//! [`RuleSet`](rules::RuleSet) built by [`RuleBuilder`](rules::RuleBuilder),
//! and a [`FieldAdapter`](adapter::FieldAdapter) bridging to the widget that
//! holds the value. The form validates fields as the user edits them or when
//! they lose focus, and on demand.

pub mod adapter;
pub mod form;
pub mod rules;
pub mod validator;
pub mod value;
pub mod widgets;

pub use form::{Form, FormConfig, FormError, ValidationMode, ValidationResult};
pub use rules::{RuleBuilder, RuleSet};
pub use value::{FormValue, Value};

pub mod prelude {
    pub use crate::adapter::{ChangeListener, FieldAdapter, FocusListener, Subscription};
    pub use crate::form::{
        FieldError, Form, FormConfig, FormError, ValidationMode, ValidationResult,
    };
    pub use crate::rules::{MessageCatalog, NumberFormat, RuleBuilder, RuleSet};
    pub use crate::value::{FormValue, Value, ValueKind};
    pub use crate::widgets::{Checkbox, CheckboxGroup, Input, RadioGroup, Select};
}
