//! Headless widgets implementing [`FieldAdapter`](crate::adapter::FieldAdapter).
//!
//! Each widget is a cheap, cloneable handle over shared state, the way a
//! toolkit binding would hold on to a native widget. Methods named after user
//! gestures (`type_text`, `select`, `toggle`, `blur`, ...) emit events to
//! subscribed listeners; programmatic setters (`set_text`, `set_selected`,
//! ...) and the adapter's `set_value` do not.
//!
//! # Example
//!
//! ```
//! use formwork::form::{Form, FormConfig};
//! use formwork::rules::RuleBuilder;
//! use formwork::widgets::Select;
//!
//! let form = Form::new(FormConfig::new());
//! let gender = Select::with_options(vec!["Female", "Male", "Other"]);
//! form.register_input("gender", RuleBuilder::new("Gender").required(true).build(), gender.clone())
//!     .unwrap();
//!
//! assert!(!form.validate());
//! assert_eq!(gender.error().as_deref(), Some("Gender is required"));
//!
//! gender.select(1);
//! assert!(gender.error().is_none());
//! ```

/// Define a process-unique widget identifier.
macro_rules! widget_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(usize);

        impl $name {
            fn new() -> Self {
                static COUNTER: std::sync::atomic::AtomicUsize =
                    std::sync::atomic::AtomicUsize::new(0);
                Self(COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

mod checkbox;
mod choice;
mod events;
mod input;

pub use checkbox::{Checkbox, CheckboxGroup, CheckboxGroupId, CheckboxId};
pub use choice::{RadioGroup, RadioGroupId, Select, SelectId};
pub use events::EventHub;
pub use input::{Input, InputId};
