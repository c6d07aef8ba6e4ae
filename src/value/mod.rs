//! The typed value tree produced by the reader and consumed by the writer.

mod instance;
mod map;

pub use instance::Instance;
pub use map::OrderedMap;

/// The JSON-shaped wire tree both engines speak on the outside.
pub use serde_json::Value as JsonValue;

use chrono::{DateTime, FixedOffset};

// -----------------------------------------------------------------------------
// Value

/// A typed, in-memory value: what reading JSON produces and writing JSON
/// consumes.
///
/// Compared to the wire tree this adds a first-class [`Date`], an ordered
/// string-keyed [`Map`], and class instances ([`Object`]). There is no
/// "absent" variant: a property that is not present is simply missing from
/// its [`Instance`], so absence can never leak into an output array or
/// object.
///
/// [`Date`]: Value::Date
/// [`Map`]: Value::Map
/// [`Object`]: Value::Object
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// JSON `null`.
    Null,
    /// A boolean.
    Boolean(bool),
    /// A JSON number, kept lossless.
    Number(serde_json::Number),
    /// A string.
    String(String),
    /// A calendar timestamp; serialized as an RFC 3339 string.
    Date(DateTime<FixedOffset>),
    /// An ordered sequence of values.
    Array(Vec<Value>),
    /// An insertion-ordered map with string keys.
    Map(OrderedMap),
    /// An instance of a registered class.
    Object(Instance),
}

impl Value {
    /// Whether this value is `null`.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The boolean payload, if this is a [`Value::Boolean`].
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// The numeric payload, if this is a [`Value::Number`].
    #[inline]
    pub fn as_number(&self) -> Option<&serde_json::Number> {
        match self {
            Self::Number(n) => Some(n),
            _ => None,
        }
    }

    /// The string payload, if this is a [`Value::String`].
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The timestamp payload, if this is a [`Value::Date`].
    #[inline]
    pub fn as_date(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            Self::Date(d) => Some(d),
            _ => None,
        }
    }

    /// The elements, if this is a [`Value::Array`].
    #[inline]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// The entries, if this is a [`Value::Map`].
    #[inline]
    pub fn as_map(&self) -> Option<&OrderedMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// The instance, if this is a [`Value::Object`].
    #[inline]
    pub fn as_object(&self) -> Option<&Instance> {
        match self {
            Self::Object(instance) => Some(instance),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    #[inline]
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i32> for Value {
    #[inline]
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

impl From<i64> for Value {
    #[inline]
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Value {
    #[inline]
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors() {
        assert!(Value::Null.is_null());
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert_eq!(
            Value::from(5i64).as_number(),
            Some(&serde_json::Number::from(5))
        );
        assert!(Value::from(5i64).as_str().is_none());
    }
}
