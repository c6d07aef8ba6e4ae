use std::borrow::Cow;

use crate::value::{OrderedMap, Value};

// -----------------------------------------------------------------------------
// Instance

/// A class instance: the runtime class name plus an ordered field map.
///
/// The reader creates instances while mapping a JSON object against a class
/// schema; the writer resolves an instance's schema by this class name. An
/// optional property that read as absent is simply never set, which is how
/// absence stays distinct from a stored `null`.
///
/// # Examples
///
/// ```
/// use jsonmap::{Instance, Value};
///
/// let mut point = Instance::new("Point");
/// point.set("x", Value::from(1));
/// point.set("y", Value::from(2));
///
/// assert_eq!(point.class(), "Point");
/// assert_eq!(point.get("x"), Some(&Value::from(1)));
/// assert!(point.get("z").is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    class: Cow<'static, str>,
    fields: OrderedMap,
}

impl Instance {
    /// Creates an instance of `class` with no fields set.
    pub fn new(class: impl Into<Cow<'static, str>>) -> Self {
        Self {
            class: class.into(),
            fields: OrderedMap::new(),
        }
    }

    /// The runtime class name.
    #[inline]
    pub fn class(&self) -> &str {
        &self.class
    }

    /// The value of the named field, or `None` if it was never set.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Whether the named field has been set.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Sets a field, replacing any previous value in place.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    /// The number of fields set on this instance.
    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Iterates fields in the order they were first set.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_and_order() {
        let mut instance = Instance::new("Order");
        instance.set("id", Value::from(7));
        instance.set("note", Value::Null);
        instance.set("id", Value::from(8));

        assert_eq!(instance.class(), "Order");
        assert_eq!(instance.len(), 2);
        assert_eq!(instance.get("id"), Some(&Value::from(8)));
        assert!(instance.contains("note"));

        let names: Vec<_> = instance.fields().map(|(n, _)| n).collect();
        assert_eq!(names, ["id", "note"]);
    }

    #[test]
    fn unset_field_is_absent_not_null() {
        let mut instance = Instance::new("Order");
        instance.set("note", Value::Null);

        assert_eq!(instance.get("note"), Some(&Value::Null));
        assert!(instance.get("id").is_none());
    }
}
