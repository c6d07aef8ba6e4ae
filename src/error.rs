//! Error types surfaced by the mapping engines.

use std::borrow::Cow;
use std::fmt;

use thiserror::Error;

// -----------------------------------------------------------------------------
// MappingError

/// An error raised while converting between JSON and class instances.
///
/// Every variant carries the rendered path of the value that could not be
/// converted, such as `orders[2].price`. Conversion is fail-fast: the first
/// error anywhere in the recursive traversal aborts the whole call and no
/// partially-populated result is ever returned.
#[derive(Debug, Error)]
pub enum MappingError {
    /// A non-optional property had no value at all (as opposed to `null`).
    #[error("expect a value at `{path}`, got none")]
    ValueMissing {
        /// Path of the missing value.
        path: String,
    },

    /// `null` was found where the schema requires a non-null value.
    #[error("expect non-null value at `{path}`, got null")]
    ValueNull {
        /// Path of the null value.
        path: String,
    },

    /// The JSON value does not have the shape the target type requires.
    #[error("expect {expected} at `{path}`, got {actual}")]
    TypeMismatch {
        /// Path of the mismatched value.
        path: String,
        /// What the schema asked for.
        expected: Cow<'static, str>,
        /// What the input actually contained.
        actual: Cow<'static, str>,
    },

    /// A date-typed value was a string but not a valid RFC 3339 timestamp.
    #[error("expect an RFC 3339 timestamp at `{path}`, got `{actual}`")]
    DateFormat {
        /// Path of the unparsable value.
        path: String,
        /// The rejected input string.
        actual: String,
    },

    /// A class was referenced that has no entry in the registry.
    #[error("no mapping schema registered for class `{class}` at `{path}`")]
    NoSchema {
        /// Path of the value being converted.
        path: String,
        /// The unregistered class name.
        class: String,
    },

    /// A property's type is a positional type argument, but the enclosing
    /// class reference does not supply one at that position.
    #[error("no type argument at index {index} for `{path}`")]
    NoTypeArgument {
        /// Path of the property being resolved.
        path: String,
        /// The requested argument position.
        index: usize,
    },

    /// A property is declared as an undisambiguated union; the schema must
    /// supply an explicit type, a type argument or a discriminator.
    #[error("union-typed property at `{path}` must declare an explicit type")]
    AmbiguousUnion {
        /// Path of the ambiguous property.
        path: String,
    },

    /// A map was declared or supplied with keys that are not strings.
    #[error("map keys must be strings, got {actual} at `{path}`")]
    UnsupportedKeyType {
        /// Path of the map.
        path: String,
        /// The offending key type.
        actual: Cow<'static, str>,
    },

    /// A class with a custom reader hook took part in polymorphic mapping.
    /// The hook bypasses the property-by-property state the subtype step
    /// depends on, so the combination is rejected outright.
    #[error("class `{class}` has a custom reader and cannot take part in polymorphic mapping at `{path}`")]
    ReaderHookConflict {
        /// Path of the value being converted.
        path: String,
        /// The offending class name.
        class: String,
    },
}

impl MappingError {
    /// The rendered path at the point of failure.
    ///
    /// This is the path of the value that failed, not of the conversion
    /// root: converting `{"a": [1, "x"]}` against an array of numbers under
    /// `a` reports `a[1]`.
    pub fn path(&self) -> &str {
        match self {
            Self::ValueMissing { path }
            | Self::ValueNull { path }
            | Self::TypeMismatch { path, .. }
            | Self::DateFormat { path, .. }
            | Self::NoSchema { path, .. }
            | Self::NoTypeArgument { path, .. }
            | Self::AmbiguousUnion { path }
            | Self::UnsupportedKeyType { path, .. }
            | Self::ReaderHookConflict { path, .. } => path,
        }
    }

    /// The kind tag of this error, independent of its payload.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ValueMissing { .. } => ErrorKind::ValueMissing,
            Self::ValueNull { .. } => ErrorKind::ValueNull,
            Self::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Self::DateFormat { .. } => ErrorKind::DateFormat,
            Self::NoSchema { .. } => ErrorKind::NoSchema,
            Self::NoTypeArgument { .. } => ErrorKind::NoTypeArgument,
            Self::AmbiguousUnion { .. } => ErrorKind::AmbiguousUnion,
            Self::UnsupportedKeyType { .. } => ErrorKind::UnsupportedKeyType,
            Self::ReaderHookConflict { .. } => ErrorKind::ReaderHookConflict,
        }
    }
}

// -----------------------------------------------------------------------------
// ErrorKind

/// An enumeration of the kinds of [`MappingError`].
///
/// Useful for matching on the failure class without destructuring the
/// payload, e.g. in tests or retry-routing code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ValueMissing,
    ValueNull,
    TypeMismatch,
    DateFormat,
    NoSchema,
    NoTypeArgument,
    AmbiguousUnion,
    UnsupportedKeyType,
    ReaderHookConflict,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValueMissing => f.pad("ValueMissing"),
            Self::ValueNull => f.pad("ValueNull"),
            Self::TypeMismatch => f.pad("TypeMismatch"),
            Self::DateFormat => f.pad("DateFormat"),
            Self::NoSchema => f.pad("NoSchema"),
            Self::NoTypeArgument => f.pad("NoTypeArgument"),
            Self::AmbiguousUnion => f.pad("AmbiguousUnion"),
            Self::UnsupportedKeyType => f.pad("UnsupportedKeyType"),
            Self::ReaderHookConflict => f.pad("ReaderHookConflict"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_and_kind() {
        let err = MappingError::TypeMismatch {
            path: "a[1]".into(),
            expected: "number".into(),
            actual: "string".into(),
        };

        assert_eq!(err.path(), "a[1]");
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.to_string(), "expect number at `a[1]`, got string");
    }

    #[test]
    fn kind_display() {
        assert_eq!(ErrorKind::ValueNull.to_string(), "ValueNull");
        assert_eq!(format!("{:>12}", ErrorKind::NoSchema), "    NoSchema");
    }
}
