use chrono::SecondsFormat;
use tracing::trace;

use crate::access::MappingPath;
use crate::error::MappingError;
use crate::registry::ClassRegistry;
use crate::value::{Instance, JsonValue, OrderedMap, Value};

// -----------------------------------------------------------------------------
// Entry points

/// Converts a value to serialized JSON text.
///
/// # Examples
///
/// ```
/// use jsonmap::registry::ClassRegistry;
/// use jsonmap::{OrderedMap, Value, to_json};
///
/// let registry = ClassRegistry::builder().build();
/// let map: OrderedMap = [("foo".to_owned(), Value::from(123))].into_iter().collect();
///
/// assert_eq!(to_json(&registry, &Value::Map(map)).unwrap(), r#"{"foo":123}"#);
/// ```
pub fn to_json(registry: &ClassRegistry, value: &Value) -> Result<String, MappingError> {
    let tree = WriteDriver::new(registry).write(value)?;
    Ok(serde_json::to_string(&tree).expect("a JSON value tree always serializes"))
}

/// Converts a value to a JSON value tree, leaving text serialization to the
/// caller.
pub fn to_json_value(registry: &ClassRegistry, value: &Value) -> Result<JsonValue, MappingError> {
    WriteDriver::new(registry).write(value)
}

// -----------------------------------------------------------------------------
// WriteDriver

/// The recursive object → JSON writer.
///
/// Dispatch is driven by the runtime shape of the value, not by a declared
/// type: an instance resolves its schema by its own class name, so no type
/// resolution step exists on the write path. A driver owns the
/// [`MappingPath`] for one top-level call and is consumed by [`write`].
///
/// [`write`]: WriteDriver::write
pub struct WriteDriver<'a> {
    registry: &'a ClassRegistry,
    path: MappingPath,
}

impl<'a> WriteDriver<'a> {
    /// Creates a driver for one conversion against `registry`.
    #[inline]
    pub fn new(registry: &'a ClassRegistry) -> Self {
        Self {
            registry,
            path: MappingPath::new(),
        }
    }

    /// Converts `value` into a JSON value tree.
    pub fn write(mut self, value: &Value) -> Result<JsonValue, MappingError> {
        trace!("writing value tree");
        self.convert(value)
    }

    fn convert(&mut self, value: &Value) -> Result<JsonValue, MappingError> {
        match value {
            Value::Null => Ok(JsonValue::Null),
            Value::Boolean(value) => Ok(JsonValue::Bool(*value)),
            Value::Number(value) => Ok(JsonValue::Number(value.clone())),
            Value::String(value) => Ok(JsonValue::String(value.clone())),
            // The tree is the contract boundary, so the timestamp becomes
            // its wire form here; `Z` is kept for zero offsets.
            Value::Date(date) => Ok(JsonValue::String(
                date.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            )),
            Value::Array(items) => self.convert_array(items),
            Value::Map(map) => self.convert_map(map),
            Value::Object(instance) => self.convert_instance(instance),
        }
    }

    fn convert_array(&mut self, items: &[Value]) -> Result<JsonValue, MappingError> {
        let mut out = Vec::with_capacity(items.len());

        for (index, item) in items.iter().enumerate() {
            self.path.push(index);
            let converted = self.convert(item);
            self.path.pop();
            out.push(converted?);
        }

        Ok(JsonValue::Array(out))
    }

    fn convert_map(&mut self, map: &OrderedMap) -> Result<JsonValue, MappingError> {
        let mut out = serde_json::Map::new();

        for (key, item) in map.iter() {
            self.path.push(key);
            let converted = self.convert(item);
            self.path.pop();
            out.insert(key.to_owned(), converted?);
        }

        Ok(JsonValue::Object(out))
    }

    fn convert_instance(&mut self, instance: &Instance) -> Result<JsonValue, MappingError> {
        let registry = self.registry;
        let Some(meta) = registry.get(instance.class()) else {
            return Err(MappingError::NoSchema {
                path: self.path.current_path(),
                class: instance.class().to_owned(),
            });
        };

        if let Some(writer) = meta.schema().writer() {
            return writer(&self.path, instance);
        }

        let mut out = serde_json::Map::new();

        for prop in registry.properties(instance.class(), None) {
            self.path.push(prop.name());
            let converted = match instance.get(prop.name()) {
                Some(value) => self.convert(value).map(Some),
                None if prop.is_optional() => Ok(None),
                None => Err(MappingError::ValueMissing {
                    path: self.path.current_path(),
                }),
            };
            self.path.pop();

            if let Some(json) = converted? {
                out.insert(prop.name().to_owned(), json);
            }
        }

        Ok(JsonValue::Object(out))
    }
}
