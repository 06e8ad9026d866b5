//! Attribute values exchanged with the remote store.

use core::cmp::Ordering;

use crate::model::Model;

/// A single attribute value as the remote predicate layer sees it.
///
/// `O` is the backend's record handle. Pointers to other records travel as
/// [`Value::Object`], never as application-level models.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<O> {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<Value<O>>),
    Object(O),
}

impl<O> Value<O> {
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&O> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value<O>]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Flattens one level: arrays yield their elements, anything else becomes
    /// a one-element list.
    pub fn into_list(self) -> Vec<Value<O>> {
        match self {
            Self::Array(items) => items,
            other => vec![other],
        }
    }

    /// Orders scalars of compatible kinds. Integers and floats compare
    /// numerically; mismatched kinds are unordered.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Null, Self::Null) => Some(Ordering::Equal),
            (Self::Bool(a), Self::Bool(b)) => a.partial_cmp(b),
            (Self::Int(a), Self::Int(b)) => a.partial_cmp(b),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::Int(a), Self::Float(b)) => (*a as f64).partial_cmp(b),
            (Self::Float(a), Self::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Self::String(a), Self::String(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl<O> Default for Value<O> {
    fn default() -> Self {
        Self::Null
    }
}

impl<O> From<serde_json::Value> for Value<O> {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Float(n.as_f64().unwrap_or_default()),
            },
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::Array(items.into_iter().map(Self::from).collect())
            }
            // Nested documents are not addressable by the predicate layer;
            // they are carried as their JSON text.
            serde_json::Value::Object(map) => {
                Self::String(serde_json::Value::Object(map).to_string())
            }
        }
    }
}

/// Conversion into a [`Value`] for a given record handle type.
///
/// Implemented for scalars, sequences, raw values and references to models,
/// so every `where`-style call unwraps models into their remote record.
pub trait IntoValue<O> {
    fn into_value(self) -> Value<O>;
}

impl<O> IntoValue<O> for Value<O> {
    #[inline]
    fn into_value(self) -> Value<O> {
        self
    }
}

impl<O> IntoValue<O> for serde_json::Value {
    #[inline]
    fn into_value(self) -> Value<O> {
        Value::from(self)
    }
}

impl<O> IntoValue<O> for () {
    #[inline]
    fn into_value(self) -> Value<O> {
        Value::Null
    }
}

impl<O> IntoValue<O> for &str {
    fn into_value(self) -> Value<O> {
        Value::String(self.to_owned())
    }
}

impl<O> IntoValue<O> for String {
    fn into_value(self) -> Value<O> {
        Value::String(self)
    }
}

impl<O> IntoValue<O> for &String {
    fn into_value(self) -> Value<O> {
        Value::String(self.clone())
    }
}

impl<O> IntoValue<O> for bool {
    fn into_value(self) -> Value<O> {
        Value::Bool(self)
    }
}

macro_rules! int_into_value {
    ($($ty:ty),*) => {
        $(
            impl<O> IntoValue<O> for $ty {
                #[inline]
                fn into_value(self) -> Value<O> {
                    Value::Int(i64::from(self))
                }
            }
        )*
    };
}

int_into_value!(i8, i16, i32, i64, u8, u16, u32);

impl<O> IntoValue<O> for f32 {
    fn into_value(self) -> Value<O> {
        Value::Float(f64::from(self))
    }
}

impl<O> IntoValue<O> for f64 {
    fn into_value(self) -> Value<O> {
        Value::Float(self)
    }
}

impl<O, T: IntoValue<O>> IntoValue<O> for Option<T> {
    fn into_value(self) -> Value<O> {
        self.map_or(Value::Null, IntoValue::into_value)
    }
}

impl<O, T: IntoValue<O>> IntoValue<O> for Vec<T> {
    fn into_value(self) -> Value<O> {
        Value::Array(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<O, T: IntoValue<O>, const N: usize> IntoValue<O> for [T; N] {
    fn into_value(self) -> Value<O> {
        Value::Array(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<'a, O, T> IntoValue<O> for &'a [T]
where
    &'a T: IntoValue<O>,
{
    fn into_value(self) -> Value<O> {
        Value::Array(self.iter().map(IntoValue::into_value).collect())
    }
}

/// Models are unwrapped to their underlying record.
impl<M: Model> IntoValue<M::Object> for &M {
    fn into_value(self) -> Value<M::Object> {
        Value::Object(self.object().clone())
    }
}
