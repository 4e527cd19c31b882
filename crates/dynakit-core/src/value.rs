//! Native dynamic values.
//!
//! [`Value`] is a closed sum type over everything an item attribute can hold.
//! Sets and lists are distinct variants: a `Vec<String>` converts into a list,
//! a string set has to be asked for with [`Value::string_set`].

use std::collections::HashMap;
use std::fmt;

use bytes::Bytes;

/// A stored record: attribute name to value.
pub type Item = HashMap<String, Value>;

/// A numeric value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Integer of any width up to 64 bits, signed or unsigned.
    Int(i128),
    /// Floating point.
    Float(f64),
}

impl Number {
    /// The value as `f64`, possibly losing precision.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(i) => i as f64,
            Self::Float(f) => f,
        }
    }

    /// Whether the number can be written in decimal form.
    #[must_use]
    pub fn is_finite(self) -> bool {
        match self {
            Self::Int(_) => true,
            Self::Float(f) => f.is_finite(),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            // f64 Display is the shortest round-trip form and never uses exponents
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}

macro_rules! number_from_int {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for Number {
                fn from(v: $ty) -> Self {
                    Self::Int(i128::from(v))
                }
            }

            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::Int(i128::from(v))
                }
            }
        )+
    };
}

number_from_int!(i8, i16, i32, i64, u8, u16, u32, u64);

impl From<isize> for Number {
    fn from(v: isize) -> Self {
        // isize is at most 64 bits on every supported target
        Self::Int(v as i128)
    }
}

impl From<usize> for Number {
    fn from(v: usize) -> Self {
        Self::Int(v as i128)
    }
}

impl From<f32> for Number {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<f64> for Number {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

/// A native dynamic value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent value.
    #[default]
    Null,
    /// String.
    S(String),
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i128),
    /// Floating point.
    Float(f64),
    /// Raw bytes.
    Binary(Bytes),
    /// Set of strings.
    StrSet(Vec<String>),
    /// Set of numbers.
    NumSet(Vec<Number>),
    /// Set of byte strings.
    BinSet(Vec<Bytes>),
    /// Ordered list.
    List(Vec<Value>),
    /// Nested map.
    Map(HashMap<String, Value>),
}

impl Value {
    /// Build a string set.
    pub fn string_set<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::StrSet(values.into_iter().map(Into::into).collect())
    }

    /// Build a number set.
    pub fn number_set<I, N>(values: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Number>,
    {
        Self::NumSet(values.into_iter().map(Into::into).collect())
    }

    /// Build a binary set.
    pub fn binary_set<I, B>(values: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        Self::BinSet(values.into_iter().map(Into::into).collect())
    }

    /// Short name of the variant, used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::S(_) => "string",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Binary(_) => "binary",
            Self::StrSet(_) => "string set",
            Self::NumSet(_) => "number set",
            Self::BinSet(_) => "binary set",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }

    /// `Null` or the empty string, both treated as "no value" when stored.
    #[must_use]
    pub fn is_absent(&self) -> bool {
        match self {
            Self::Null => true,
            Self::S(s) => s.is_empty(),
            _ => false,
        }
    }

    /// The string if this is `S`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::S(s) => Some(s),
            _ => None,
        }
    }

    /// The boolean if this is `Bool`.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer if this is `Int` and it fits in `i64`.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => i64::try_from(*i).ok(),
            _ => None,
        }
    }

    /// The number if this is `Int` or `Float`.
    #[must_use]
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Self::Int(i) => Some(Number::Int(*i)),
            Self::Float(f) => Some(Number::Float(*f)),
            _ => None,
        }
    }

    /// The list if this is `List`.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }

    /// The map if this is `Map`.
    #[must_use]
    pub fn as_map(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        match n {
            Number::Int(i) => Self::Int(i),
            Number::Float(f) => Self::Float(f),
        }
    }
}

impl From<isize> for Value {
    fn from(v: isize) -> Self {
        Number::from(v).into()
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Number::from(v).into()
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::S(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::S(v.to_owned())
    }
}

impl From<Bytes> for Value {
    fn from(v: Bytes) -> Self {
        Self::Binary(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Binary(Bytes::from(v))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::List(v)
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Self::List(v.into_iter().map(Self::S).collect())
    }
}

impl From<Vec<&str>> for Value {
    fn from(v: Vec<&str>) -> Self {
        Self::List(v.into_iter().map(Self::from).collect())
    }
}

impl From<HashMap<String, Value>> for Value {
    fn from(v: HashMap<String, Value>) -> Self {
        Self::Map(v)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::List(iter.into_iter().collect())
    }
}
