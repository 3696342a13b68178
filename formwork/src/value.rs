//! Dynamically typed field values.
//!
//! Adapters hand the engine a [`FormValue`]: an optional [`Value`] whose
//! variant records what kind of payload the widget produced. The validator
//! matches on the variant; hosts narrow it back to concrete types with the
//! `as_*` accessors.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Payload produced by a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i32),
    Long(i64),
    Double(f64),
    Float(f32),
    Text(String),
    List(Vec<Value>),
}

/// Coarse classification of a [`Value`], used by the validator's dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Text,
    Number,
    Boolean,
    Collection,
}

impl Value {
    /// The kind of payload this value carries.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Boolean,
            Value::Int(_) | Value::Long(_) | Value::Float(_) | Value::Double(_) => {
                ValueKind::Number
            }
            Value::Text(_) => ValueKind::Text,
            Value::List(_) => ValueKind::Collection,
        }
    }

    /// Numeric payload widened to `f64`, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(f64::from(*v)),
            Value::Long(v) => Some(*v as f64),
            Value::Float(v) => Some(f64::from(*v)),
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Long(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{v}"),
            Value::Text(v) => f.write_str(v),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Narrowing from a [`Value`] element to a concrete type.
///
/// Narrowing is exact: an `Int` element does not narrow to `i64`.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for String {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Text(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Long(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

/// Optional value read from or written to a field.
///
/// `FormValue::default()` is the empty representation used when a field is
/// reset or cleared.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValue(Option<Value>);

impl FormValue {
    /// Wrap a raw payload.
    pub fn new(value: impl Into<Value>) -> Self {
        Self(Some(value.into()))
    }

    /// The value-less representation.
    pub fn none() -> Self {
        Self(None)
    }

    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }

    /// No value, an empty string, or an empty collection.
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            None => true,
            Some(Value::Text(v)) => v.is_empty(),
            Some(Value::List(v)) => v.is_empty(),
            Some(_) => false,
        }
    }

    pub fn kind(&self) -> Option<ValueKind> {
        self.0.as_ref().map(Value::kind)
    }

    pub fn as_value(&self) -> Option<&Value> {
        self.0.as_ref()
    }

    pub fn into_inner(self) -> Option<Value> {
        self.0
    }

    // -------------------------------------------------------------------------
    // Narrowing accessors
    // -------------------------------------------------------------------------

    pub fn as_string(&self, default: &str) -> String {
        self.as_string_opt().unwrap_or_else(|| default.to_string())
    }

    pub fn as_string_opt(&self) -> Option<String> {
        self.narrow::<String>()
    }

    pub fn as_int(&self, default: i32) -> i32 {
        self.as_int_opt().unwrap_or(default)
    }

    pub fn as_int_opt(&self) -> Option<i32> {
        self.narrow::<i32>()
    }

    pub fn as_long(&self, default: i64) -> i64 {
        self.as_long_opt().unwrap_or(default)
    }

    pub fn as_long_opt(&self) -> Option<i64> {
        self.narrow::<i64>()
    }

    pub fn as_float(&self, default: f32) -> f32 {
        self.as_float_opt().unwrap_or(default)
    }

    pub fn as_float_opt(&self) -> Option<f32> {
        self.narrow::<f32>()
    }

    pub fn as_double(&self, default: f64) -> f64 {
        self.as_double_opt().unwrap_or(default)
    }

    pub fn as_double_opt(&self) -> Option<f64> {
        self.narrow::<f64>()
    }

    pub fn as_bool(&self, default: bool) -> bool {
        self.as_bool_opt().unwrap_or(default)
    }

    /// Booleans narrow directly; the strings `"true"` and `"false"` are
    /// accepted as well.
    pub fn as_bool_opt(&self) -> Option<bool> {
        match &self.0 {
            Some(Value::Bool(v)) => Some(*v),
            Some(Value::Text(v)) => match v.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn as_collection<T: FromValue>(&self, default: Vec<T>) -> Vec<T> {
        self.as_collection_opt().unwrap_or(default)
    }

    /// Narrow a list, succeeding only if every element narrows to `T`.
    pub fn as_collection_opt<T: FromValue>(&self) -> Option<Vec<T>> {
        match &self.0 {
            Some(Value::List(items)) => items.iter().map(T::from_value).collect(),
            _ => None,
        }
    }

    fn narrow<T: FromValue>(&self) -> Option<T> {
        self.0.as_ref().and_then(T::from_value)
    }
}

impl fmt::Display for FormValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(value) => write!(f, "{value}"),
            None => Ok(()),
        }
    }
}

// -----------------------------------------------------------------------------
// Conversions
// -----------------------------------------------------------------------------

macro_rules! impl_into_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v.into())
                }
            }

            impl From<$ty> for FormValue {
                fn from(v: $ty) -> Self {
                    FormValue::new(v)
                }
            }
        )*
    };
}

impl_into_value! {
    bool => Bool,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    String => Text,
    &str => Text,
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Vec<T>> for FormValue {
    fn from(items: Vec<T>) -> Self {
        FormValue::new(items)
    }
}

impl From<Value> for FormValue {
    fn from(value: Value) -> Self {
        Self(Some(value))
    }
}

impl<T: Into<Value>> From<Option<T>> for FormValue {
    fn from(value: Option<T>) -> Self {
        Self(value.map(Into::into))
    }
}
