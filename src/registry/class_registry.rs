use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::trace;

use crate::access::MappingPath;
use crate::error::MappingError;
use crate::info::ClassRef;
use crate::registry::class_meta::ChainProp;
use crate::registry::{ClassMeta, ClassSchema, PropertySchema};
use crate::value::{Instance, JsonValue, Value};

// -----------------------------------------------------------------------------
// ClassRegistry

/// The store of every registered class's mapping schema.
///
/// A registry is populated once through its [builder] and read-only
/// afterwards; both engines only ever look classes up by name. Because
/// nothing mutates after [`build`], a registry can be shared freely between
/// concurrently running conversions.
///
/// Property chains are precomputed at build time: for each class the full
/// inheritance chain is flattened most-derived-first and deduplicated by
/// name, keeping the most-derived declaration. Conversion never walks parent
/// links.
///
/// # Examples
///
/// ```
/// use jsonmap::registry::{ClassBuilder, ClassRegistry, PropertySchema};
/// use jsonmap::TypeInfo;
///
/// let mut builder = ClassRegistry::builder();
/// builder.register(
///     ClassBuilder::new("Entity").property(PropertySchema::new("id", TypeInfo::Number)),
/// );
/// builder.register(
///     ClassBuilder::new("User")
///         .extends("Entity")
///         .property(PropertySchema::new("name", TypeInfo::String)),
/// );
/// let registry = builder.build();
///
/// let names: Vec<_> = registry.properties("User", None).map(|p| p.name().to_owned()).collect();
/// assert_eq!(names, ["name", "id"]);
/// assert!(registry.is_descendant("User", "Entity"));
/// ```
///
/// [builder]: ClassRegistryBuilder
/// [`build`]: ClassRegistryBuilder::build
#[derive(Debug)]
pub struct ClassRegistry {
    classes: HashMap<Cow<'static, str>, ClassMeta>,
}

impl ClassRegistry {
    /// Creates a builder for a new registry.
    #[inline]
    pub fn builder() -> ClassRegistryBuilder {
        ClassRegistryBuilder {
            classes: Vec::new(),
        }
    }

    /// Whether a class with the given name has been registered.
    #[inline]
    pub fn contains(&self, class: &str) -> bool {
        self.classes.contains_key(class)
    }

    /// The [`ClassMeta`] registered under `class`, if any.
    #[inline]
    pub fn get(&self, class: &str) -> Option<&ClassMeta> {
        self.classes.get(class)
    }

    /// The number of registered classes.
    #[inline]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Iterates over all registered classes, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &ClassMeta> {
        self.classes.values()
    }

    /// The deduplicated, most-derived-first property chain of `class`.
    ///
    /// With `stop_at` set to an ancestor of `class`, properties declared by
    /// that ancestor or above it are excluded; this is how a polymorphic
    /// continuation avoids reprocessing base properties. An unregistered
    /// `class` yields an empty chain; an unregistered `stop_at` imposes no
    /// boundary.
    pub fn properties<'r>(
        &'r self,
        class: &str,
        stop_at: Option<&str>,
    ) -> impl Iterator<Item = &'r PropertySchema> + 'r {
        let chain = self
            .classes
            .get(class)
            .map(|meta| meta.chain.as_slice())
            .unwrap_or(&[]);
        let stop_depth = stop_at
            .and_then(|name| self.classes.get(name))
            .map(|meta| meta.depth);

        chain
            .iter()
            .filter(move |entry| stop_depth.is_none_or(|depth| entry.depth > depth))
            .map(|entry| &*entry.prop)
    }

    /// Whether `class` is a strict descendant of `ancestor`.
    ///
    /// A class is not a descendant of itself. Unregistered names are not
    /// descendants of anything.
    pub fn is_descendant(&self, class: &str, ancestor: &str) -> bool {
        let mut current = self.classes.get(class).and_then(ClassMeta::parent);

        while let Some(name) = current {
            if name == ancestor {
                return true;
            }
            current = self.classes.get(name).and_then(ClassMeta::parent);
        }

        false
    }
}

// -----------------------------------------------------------------------------
// ClassRegistryBuilder

/// Collects class declarations and turns them into a [`ClassRegistry`].
///
/// Declaration order does not matter; parents may be registered after their
/// children as long as everything is present by the time [`build`] runs.
///
/// [`build`]: ClassRegistryBuilder::build
#[derive(Debug)]
pub struct ClassRegistryBuilder {
    classes: Vec<ClassBuilder>,
}

impl ClassRegistryBuilder {
    /// Adds a class declaration.
    pub fn register(&mut self, class: ClassBuilder) -> &mut Self {
        self.classes.push(class);
        self
    }

    /// Finalizes the registry: resolves inheritance, computes each class's
    /// depth and its deduplicated most-derived-first property chain.
    ///
    /// # Panics
    ///
    /// Panics if a class name is registered twice, if a class extends an
    /// unregistered class, or if the parent declarations form a cycle.
    /// These are configuration bugs in initialization code, not data
    /// errors, so they fail fast instead of surfacing as [`MappingError`].
    pub fn build(self) -> ClassRegistry {
        let decls = self.classes;
        let mut index: HashMap<Cow<'static, str>, usize> = HashMap::with_capacity(decls.len());

        for (i, decl) in decls.iter().enumerate() {
            if index.insert(decl.name.clone(), i).is_some() {
                panic!("class `{}` is registered twice", decl.name);
            }
        }

        // Finalization order: every class after its parent.
        const UNVISITED: u8 = 0;
        const VISITING: u8 = 1;
        const DONE: u8 = 2;

        let mut state = vec![UNVISITED; decls.len()];
        let mut order = Vec::with_capacity(decls.len());

        for start in 0..decls.len() {
            let mut walk = Vec::new();
            let mut current = start;

            loop {
                match state[current] {
                    DONE => break,
                    VISITING => {
                        panic!("inheritance cycle involving class `{}`", decls[current].name)
                    }
                    _ => {}
                }

                state[current] = VISITING;
                walk.push(current);

                let Some(parent) = &decls[current].parent else {
                    break;
                };
                current = *index.get(parent).unwrap_or_else(|| {
                    panic!(
                        "class `{}` extends unregistered class `{parent}`",
                        decls[current].name
                    )
                });
            }

            for &i in walk.iter().rev() {
                state[i] = DONE;
                order.push(i);
            }
        }

        let mut classes: HashMap<Cow<'static, str>, ClassMeta> =
            HashMap::with_capacity(decls.len());
        let mut slots: Vec<Option<ClassBuilder>> = decls.into_iter().map(Some).collect();

        for i in order {
            let decl = slots[i].take().expect("each class is finalized exactly once");
            let depth = match &decl.parent {
                Some(parent) => classes.get(parent).expect("parents are finalized first").depth + 1,
                None => 0,
            };

            let mut seen: HashSet<Cow<'static, str>> = HashSet::new();
            let mut chain = Vec::with_capacity(decl.properties.len());

            for prop in decl.properties {
                if seen.insert(prop.name.clone()) {
                    chain.push(ChainProp {
                        depth,
                        prop: Arc::new(prop),
                    });
                }
            }

            if let Some(parent) = &decl.parent {
                let parent_meta = classes.get(parent).expect("parents are finalized first");
                for entry in &parent_meta.chain {
                    if seen.insert(entry.prop.name.clone()) {
                        chain.push(ChainProp {
                            depth: entry.depth,
                            prop: Arc::clone(&entry.prop),
                        });
                    }
                }
            }

            trace!(class = %decl.name, properties = chain.len(), "registered mapping class");

            classes.insert(
                decl.name.clone(),
                ClassMeta {
                    name: decl.name,
                    parent: decl.parent,
                    depth,
                    schema: decl.schema,
                    chain,
                },
            );
        }

        ClassRegistry { classes }
    }
}

// -----------------------------------------------------------------------------
// ClassBuilder

/// Declares one class: its name, optional parent, hooks and properties.
///
/// Properties are mapped in declaration order; when a derived class
/// redeclares a property of an ancestor, the derived declaration wins.
#[derive(Debug)]
pub struct ClassBuilder {
    name: Cow<'static, str>,
    parent: Option<Cow<'static, str>>,
    schema: ClassSchema,
    properties: Vec<PropertySchema>,
}

impl ClassBuilder {
    /// Starts a declaration for the class registered under `name`.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            schema: ClassSchema::new(),
            properties: Vec::new(),
        }
    }

    /// Declares `parent` as this class's base class.
    pub fn extends(mut self, parent: impl Into<Cow<'static, str>>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Installs a custom reader hook that fully replaces property-by-property
    /// mapping for this class.
    pub fn reader(
        mut self,
        hook: impl Fn(&MappingPath, &JsonValue) -> Result<Value, MappingError> + Send + Sync + 'static,
    ) -> Self {
        self.schema.reader = Some(Box::new(hook));
        self
    }

    /// Installs a custom writer hook that fully replaces property-by-property
    /// mapping for this class.
    pub fn writer(
        mut self,
        hook: impl Fn(&MappingPath, &Instance) -> Result<JsonValue, MappingError> + Send + Sync + 'static,
    ) -> Self {
        self.schema.writer = Some(Box::new(hook));
        self
    }

    /// Installs a polymorphic subtype resolver, invoked after this class's
    /// properties are mapped to pick the derived class to continue with.
    pub fn subtype(
        mut self,
        resolver: impl Fn(&MappingPath, &Instance) -> Result<ClassRef, MappingError> + Send + Sync + 'static,
    ) -> Self {
        self.schema.subtype = Some(Box::new(resolver));
        self
    }

    /// Adds a property declaration.
    pub fn property(mut self, property: PropertySchema) -> Self {
        self.properties.push(property);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::TypeInfo;

    fn three_level_registry() -> ClassRegistry {
        let mut builder = ClassRegistry::builder();
        builder.register(
            ClassBuilder::new("Derived")
                .extends("Middle")
                .property(PropertySchema::new("extra", TypeInfo::Boolean))
                .property(PropertySchema::new("kind", TypeInfo::String).optional()),
        );
        builder.register(
            ClassBuilder::new("Base")
                .property(PropertySchema::new("id", TypeInfo::Number))
                .property(PropertySchema::new("kind", TypeInfo::String)),
        );
        builder.register(
            ClassBuilder::new("Middle")
                .extends("Base")
                .property(PropertySchema::new("note", TypeInfo::String)),
        );
        builder.build()
    }

    #[test]
    fn chain_is_most_derived_first_and_deduplicated() {
        let registry = three_level_registry();

        let names: Vec<_> = registry
            .properties("Derived", None)
            .map(PropertySchema::name)
            .collect();
        assert_eq!(names, ["extra", "kind", "note", "id"]);

        // The surviving `kind` is the derived declaration.
        let kind = registry
            .properties("Derived", None)
            .find(|p| p.name() == "kind")
            .unwrap();
        assert!(kind.is_optional());
    }

    #[test]
    fn stop_boundary_filters_ancestor_declarations() {
        let registry = three_level_registry();

        let below_base: Vec<_> = registry
            .properties("Derived", Some("Base"))
            .map(PropertySchema::name)
            .collect();
        assert_eq!(below_base, ["extra", "kind", "note"]);

        let below_middle: Vec<_> = registry
            .properties("Derived", Some("Middle"))
            .map(PropertySchema::name)
            .collect();
        assert_eq!(below_middle, ["extra", "kind"]);
    }

    #[test]
    fn descendant_checks_are_strict() {
        let registry = three_level_registry();

        assert!(registry.is_descendant("Derived", "Base"));
        assert!(registry.is_descendant("Derived", "Middle"));
        assert!(registry.is_descendant("Middle", "Base"));
        assert!(!registry.is_descendant("Base", "Derived"));
        assert!(!registry.is_descendant("Base", "Base"));
        assert!(!registry.is_descendant("Unknown", "Base"));
    }

    #[test]
    fn lookup_and_iteration() {
        let registry = three_level_registry();

        assert_eq!(registry.len(), 3);
        assert!(registry.contains("Middle"));
        assert!(!registry.contains("Other"));

        let meta = registry.get("Middle").unwrap();
        assert_eq!(meta.name(), "Middle");
        assert_eq!(meta.parent(), Some("Base"));
        assert!(meta.schema().reader().is_none());
    }

    #[test]
    fn registry_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ClassRegistry>();
    }

    #[test]
    #[should_panic(expected = "registered twice")]
    fn duplicate_class_panics() {
        let mut builder = ClassRegistry::builder();
        builder.register(ClassBuilder::new("A"));
        builder.register(ClassBuilder::new("A"));
        builder.build();
    }

    #[test]
    #[should_panic(expected = "unregistered class")]
    fn unknown_parent_panics() {
        let mut builder = ClassRegistry::builder();
        builder.register(ClassBuilder::new("A").extends("Missing"));
        builder.build();
    }

    #[test]
    #[should_panic(expected = "inheritance cycle")]
    fn parent_cycle_panics() {
        let mut builder = ClassRegistry::builder();
        builder.register(ClassBuilder::new("A").extends("B"));
        builder.register(ClassBuilder::new("B").extends("A"));
        builder.build();
    }
}
