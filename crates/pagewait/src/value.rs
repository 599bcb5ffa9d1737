//! Page values and the satisfaction predicate.
//!
//! Values coming back from the page are dynamically typed. [`PageValue`]
//! models them, and [`Truthy`] decides whether a condition result ends the
//! wait loop.
//!
//! Falsy set for dynamic values: `undefined`, `null`, `false`, `0`, `NaN`
//! and the empty string. Typed results use `Option<V>` instead, where `None`
//! means "not yet".

use serde_json::{Map, Value};

/// A value produced by page-context code
#[derive(Debug, Clone, PartialEq)]
pub enum PageValue<E> {
    /// No value at all
    Undefined,
    /// Explicit null
    Null,
    /// Boolean
    Bool(bool),
    /// Number (always double precision in page context)
    Number(f64),
    /// String
    String(String),
    /// A located DOM element
    Element(E),
    /// Array-like collection
    Array(Vec<PageValue<E>>),
    /// Plain object
    Object(Map<String, Value>),
}

impl<E> PageValue<E> {
    /// Whether this value satisfies a wait condition
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Undefined | Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::String(s) => !s.is_empty(),
            Self::Element(_) | Self::Array(_) | Self::Object(_) => true,
        }
    }

    /// Observed type tag, in the `[object Type]` form used by diagnostics
    #[must_use]
    pub const fn type_tag(&self) -> &'static str {
        match self {
            Self::Undefined => "[object Undefined]",
            Self::Null => "[object Null]",
            Self::Bool(_) => "[object Boolean]",
            Self::Number(_) => "[object Number]",
            Self::String(_) => "[object String]",
            Self::Element(_) => "[object Element]",
            Self::Array(_) => "[object Array]",
            Self::Object(_) => "[object Object]",
        }
    }

    /// Borrow the element, if this is one
    #[must_use]
    pub const fn as_element(&self) -> Option<&E> {
        match self {
            Self::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Take the element out, handing the value back when it is not one
    pub fn into_element(self) -> Result<E, Self> {
        match self {
            Self::Element(e) => Ok(e),
            other => Err(other),
        }
    }

    /// Collect the elements this value holds: an element becomes a one-item
    /// list, an array keeps only its elements, anything else is empty.
    #[must_use]
    pub fn into_elements(self) -> Vec<E> {
        match self {
            Self::Element(e) => vec![e],
            Self::Array(items) => items
                .into_iter()
                .filter_map(|item| item.into_element().ok())
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl<E> From<Option<E>> for PageValue<E> {
    fn from(value: Option<E>) -> Self {
        value.map_or(Self::Null, Self::Element)
    }
}

impl<E> From<Vec<E>> for PageValue<E> {
    fn from(value: Vec<E>) -> Self {
        Self::Array(value.into_iter().map(Self::Element).collect())
    }
}

impl<E> From<&str> for PageValue<E> {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl<E> From<String> for PageValue<E> {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl<E> From<bool> for PageValue<E> {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<E> From<f64> for PageValue<E> {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// JSON results (e.g. from script evaluation) never contain elements.
impl<E> From<Value> for PageValue<E> {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => Self::Object(map),
        }
    }
}

/// Decides whether a condition result satisfies the wait.
///
/// `into_truthy` returns `Some(output)` for a satisfied value and `None`
/// for "keep polling".
pub trait Truthy {
    /// Value handed to the caller once satisfied
    type Output;

    /// Convert into the satisfied output, or `None` when not yet satisfied
    fn into_truthy(self) -> Option<Self::Output>;
}

impl<T> Truthy for Option<T> {
    type Output = T;

    fn into_truthy(self) -> Option<T> {
        self
    }
}

impl Truthy for bool {
    type Output = bool;

    fn into_truthy(self) -> Option<bool> {
        self.then_some(true)
    }
}

macro_rules! truthy_int {
    ($($t:ty),*) => {
        $(
            impl Truthy for $t {
                type Output = $t;

                fn into_truthy(self) -> Option<$t> {
                    (self != 0).then_some(self)
                }
            }
        )*
    };
}

truthy_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Truthy for f64 {
    type Output = f64;

    fn into_truthy(self) -> Option<f64> {
        (self != 0.0 && !self.is_nan()).then_some(self)
    }
}

impl Truthy for String {
    type Output = String;

    fn into_truthy(self) -> Option<String> {
        (!self.is_empty()).then_some(self)
    }
}

impl Truthy for &'static str {
    type Output = &'static str;

    fn into_truthy(self) -> Option<&'static str> {
        (!self.is_empty()).then_some(self)
    }
}

/// Collections are always satisfied, even when empty.
impl<T> Truthy for Vec<T> {
    type Output = Vec<T>;

    fn into_truthy(self) -> Option<Vec<T>> {
        Some(self)
    }
}

impl<E> Truthy for PageValue<E> {
    type Output = PageValue<E>;

    fn into_truthy(self) -> Option<PageValue<E>> {
        if self.is_truthy() {
            Some(self)
        } else {
            None
        }
    }
}

impl Truthy for Value {
    type Output = Value;

    fn into_truthy(self) -> Option<Value> {
        let satisfied = match &self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        };
        satisfied.then_some(self)
    }
}
