use std::borrow::Cow;
use std::collections::HashSet;

use tracing::trace;

use crate::access::MappingPath;
use crate::de::resolve::resolve_property;
use crate::error::MappingError;
use crate::info::{ClassRef, TypeArg, TypeInfo};
use crate::registry::{ClassRegistry, PropertySchema};
use crate::value::{Instance, JsonValue, OrderedMap, Value};

// -----------------------------------------------------------------------------
// Entry points

/// Converts a JSON value to the given type, rejecting `null` at the root.
///
/// # Examples
///
/// ```
/// use jsonmap::registry::ClassRegistry;
/// use jsonmap::{ErrorKind, TypeInfo, Value, from_json};
/// use serde_json::json;
///
/// let registry = ClassRegistry::builder().build();
///
/// let value = from_json(&registry, &json!("hi"), &TypeInfo::String).unwrap();
/// assert_eq!(value, Value::from("hi"));
///
/// let err = from_json(&registry, &json!(null), &TypeInfo::String).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::ValueNull);
/// ```
pub fn from_json(
    registry: &ClassRegistry,
    json: &JsonValue,
    ty: &TypeInfo,
) -> Result<Value, MappingError> {
    ReadDriver::new(registry).read(json, ty, true)
}

/// Converts a JSON value to the given type, accepting `null` at the root.
pub fn from_json_nullable(
    registry: &ClassRegistry,
    json: &JsonValue,
    ty: &TypeInfo,
) -> Result<Value, MappingError> {
    ReadDriver::new(registry).read(json, ty, false)
}

/// Converts a JSON array to an array of `element`.
///
/// `allow_null` controls the elements, not the array itself: with
/// `allow_null` set, `null` elements map to [`Value::Null`]; otherwise they
/// fail with `ValueNull`.
pub fn from_json_array(
    registry: &ClassRegistry,
    json: &JsonValue,
    element: TypeInfo,
    allow_null: bool,
) -> Result<Value, MappingError> {
    let ty = TypeInfo::Array {
        element: Box::new(TypeArg::new(element, !allow_null)),
    };
    ReadDriver::new(registry).read(json, &ty, true)
}

/// Converts a JSON object to a string-keyed map of `value`.
///
/// `allow_null` controls the map values the same way
/// [`from_json_array`]'s flag controls elements.
///
/// # Examples
///
/// ```
/// use jsonmap::registry::ClassRegistry;
/// use jsonmap::{TypeInfo, from_json_map};
/// use serde_json::json;
///
/// let registry = ClassRegistry::builder().build();
/// let value = from_json_map(&registry, &json!({"foo": 123}), TypeInfo::Number, false).unwrap();
///
/// let map = value.as_map().unwrap();
/// assert_eq!(map.get("foo").and_then(|v| v.as_number()).unwrap().as_i64(), Some(123));
/// ```
pub fn from_json_map(
    registry: &ClassRegistry,
    json: &JsonValue,
    value: TypeInfo,
    allow_null: bool,
) -> Result<Value, MappingError> {
    let ty = TypeInfo::Map {
        key: Box::new(TypeInfo::String),
        value: Box::new(TypeArg::new(value, !allow_null)),
    };
    ReadDriver::new(registry).read(json, &ty, true)
}

// -----------------------------------------------------------------------------
// ReadDriver

/// The recursive JSON → object reader.
///
/// A driver borrows the registry and owns the [`MappingPath`] for one
/// top-level call; it is consumed by [`read`]. The free functions
/// [`from_json`], [`from_json_nullable`], [`from_json_array`] and
/// [`from_json_map`] are convenience shapes over the same conversion.
///
/// Conversion is fail-fast: the first error anywhere aborts the call,
/// carrying the path at the point of failure.
///
/// [`read`]: ReadDriver::read
pub struct ReadDriver<'a> {
    registry: &'a ClassRegistry,
    path: MappingPath,
}

impl<'a> ReadDriver<'a> {
    /// Creates a driver for one conversion against `registry`.
    #[inline]
    pub fn new(registry: &'a ClassRegistry) -> Self {
        Self {
            registry,
            path: MappingPath::new(),
        }
    }

    /// Converts `json` to `ty`. With `required` set, a `null` root is
    /// rejected unless `ty` is [`TypeInfo::Null`].
    pub fn read(
        mut self,
        json: &JsonValue,
        ty: &TypeInfo,
        required: bool,
    ) -> Result<Value, MappingError> {
        trace!(%ty, required, "reading json value");
        self.convert(json, ty, required)
    }

    fn convert(
        &mut self,
        json: &JsonValue,
        ty: &TypeInfo,
        required: bool,
    ) -> Result<Value, MappingError> {
        if json.is_null() {
            if required && !matches!(ty, TypeInfo::Null) {
                return Err(MappingError::ValueNull {
                    path: self.path.current_path(),
                });
            }
            return Ok(Value::Null);
        }

        match ty {
            TypeInfo::Null => Err(self.mismatch("null", json)),
            TypeInfo::Boolean => match json.as_bool() {
                Some(value) => Ok(Value::Boolean(value)),
                None => Err(self.mismatch("boolean", json)),
            },
            TypeInfo::Number => match json {
                JsonValue::Number(value) => Ok(Value::Number(value.clone())),
                _ => Err(self.mismatch("number", json)),
            },
            TypeInfo::String => match json.as_str() {
                Some(value) => Ok(Value::String(value.to_owned())),
                None => Err(self.mismatch("string", json)),
            },
            TypeInfo::Date => self.convert_date(json),
            TypeInfo::Array { element } => self.convert_array(json, element),
            TypeInfo::Map { key, value } => self.convert_map(json, key, value),
            TypeInfo::Class(class) => self.convert_class(json, class, None),
        }
    }

    fn convert_date(&mut self, json: &JsonValue) -> Result<Value, MappingError> {
        let Some(text) = json.as_str() else {
            return Err(self.mismatch("string", json));
        };

        match chrono::DateTime::parse_from_rfc3339(text) {
            Ok(date) => Ok(Value::Date(date)),
            Err(_) => Err(MappingError::DateFormat {
                path: self.path.current_path(),
                actual: text.to_owned(),
            }),
        }
    }

    fn convert_array(&mut self, json: &JsonValue, element: &TypeArg) -> Result<Value, MappingError> {
        let Some(items) = json.as_array() else {
            return Err(self.mismatch("array", json));
        };

        let mut out = Vec::with_capacity(items.len());

        for (index, item) in items.iter().enumerate() {
            self.path.push(index);
            let converted = self.convert(item, &element.info, element.required);
            self.path.pop();
            out.push(converted?);
        }

        Ok(Value::Array(out))
    }

    fn convert_map(
        &mut self,
        json: &JsonValue,
        key: &TypeInfo,
        value: &TypeArg,
    ) -> Result<Value, MappingError> {
        // A non-string key type is a schema bug, reported regardless of the
        // input's content.
        if !matches!(key, TypeInfo::String) {
            return Err(MappingError::UnsupportedKeyType {
                path: self.path.current_path(),
                actual: Cow::Owned(key.to_string()),
            });
        }

        let Some(object) = json.as_object() else {
            return Err(self.mismatch("object", json));
        };

        let mut out = OrderedMap::with_capacity(object.len());

        for (name, item) in object {
            self.path.push(name.as_str());
            let converted = self.convert(item, &value.info, value.required);
            self.path.pop();
            out.insert(name.clone(), converted?);
        }

        Ok(Value::Map(out))
    }

    fn convert_class(
        &mut self,
        json: &JsonValue,
        class: &ClassRef,
        stop_at: Option<&str>,
    ) -> Result<Value, MappingError> {
        let registry = self.registry;
        let Some(meta) = registry.get(&class.name) else {
            return Err(MappingError::NoSchema {
                path: self.path.current_path(),
                class: class.name.to_string(),
            });
        };
        let schema = meta.schema();

        if let Some(reader) = schema.reader() {
            // The hook bypasses the per-property state that a polymorphic
            // continuation depends on.
            if stop_at.is_some() || schema.subtype().is_some() {
                return Err(MappingError::ReaderHookConflict {
                    path: self.path.current_path(),
                    class: class.name.to_string(),
                });
            }
            return reader(&self.path, json);
        }

        let Some(object) = json.as_object() else {
            return Err(self.mismatch("object", json));
        };

        let mut instance = Instance::new(class.name.clone());

        for prop in registry.properties(&class.name, stop_at) {
            self.path.push(prop.name());
            let converted = self.convert_property(object, prop, &instance, &class.args);
            self.path.pop();

            if let Some(value) = converted? {
                instance.set(prop.name().to_owned(), value);
            }
        }

        let Some(resolver) = schema.subtype() else {
            return Ok(Value::Object(instance));
        };

        // Polymorphic continuation: map the same JSON against the resolved
        // derived class, bounded by this class so shared properties are not
        // reprocessed, then carry movable fields over.
        let derived = resolver(&self.path, &instance)?;

        if !registry.contains(&derived.name) {
            return Err(MappingError::NoSchema {
                path: self.path.current_path(),
                class: derived.name.to_string(),
            });
        }
        if !registry.is_descendant(&derived.name, &class.name) {
            return Err(MappingError::TypeMismatch {
                path: self.path.current_path(),
                expected: Cow::Owned(format!("a class derived from `{}`", class.name)),
                actual: Cow::Owned(format!("class `{}`", derived.name)),
            });
        }

        let value = self.convert_class(json, &derived, Some(&class.name))?;
        let Value::Object(mut sub) = value else {
            unreachable!("a polymorphic continuation always maps to an instance");
        };

        let redeclared: HashSet<&str> = registry
            .properties(&derived.name, Some(&class.name))
            .map(PropertySchema::name)
            .collect();

        for prop in registry.properties(&class.name, stop_at) {
            if !prop.is_movable() || redeclared.contains(prop.name()) {
                continue;
            }
            if let Some(value) = instance.get(prop.name()) {
                sub.set(prop.name().to_owned(), value.clone());
            }
        }

        Ok(Value::Object(sub))
    }

    fn convert_property(
        &mut self,
        object: &serde_json::Map<String, JsonValue>,
        prop: &PropertySchema,
        instance: &Instance,
        args: &[TypeArg],
    ) -> Result<Option<Value>, MappingError> {
        let raw = object.get(prop.name());
        let (info, required) = resolve_property(&self.path, prop, instance, raw, args)?;

        let Some(json) = raw else {
            if prop.is_optional() {
                return Ok(None);
            }
            return Err(MappingError::ValueMissing {
                path: self.path.current_path(),
            });
        };

        self.convert(json, &info, required).map(Some)
    }

    fn mismatch(&self, expected: &'static str, json: &JsonValue) -> MappingError {
        MappingError::TypeMismatch {
            path: self.path.current_path(),
            expected: Cow::Borrowed(expected),
            actual: Cow::Borrowed(json_kind(json)),
        }
    }
}

fn json_kind(json: &JsonValue) -> &'static str {
    match json {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
