//! Class introspection metadata.
//!
//! The resolution engine needs to read a class's constructor parameters at
//! runtime. Instead of reflection, the container owns an explicit metadata
//! table: a class is known exactly when a [ClassMetadata] record for its name
//! has been registered, and "reflecting" a name is a table lookup.

use std::{collections::HashMap, sync::Arc};

use crate::types::{DynError, Instance};

/// Construct function for a class: receives the resolved arguments in
/// declaration order and produces the instance.
pub type ConstructFn = Arc<dyn Fn(ResolvedArgs) -> Result<Instance, DynError> + Send + Sync>;

/// A declared parameter of a constructor or method.
#[derive(Clone, Debug)]
pub struct Param {
    name: String,
    class: Option<String>,
    default: Option<Instance>,
}

impl Param {
    /// A class-typed parameter, filled by resolving its class through the
    /// container when no override or supplied argument covers it.
    pub fn typed(name: impl Into<String>, class: impl Into<String>) -> Self {
        Param {
            name: name.into(),
            class: Some(class.into()),
            default: None,
        }
    }

    /// A primitive parameter with no class type.
    pub fn untyped(name: impl Into<String>) -> Self {
        Param {
            name: name.into(),
            class: None,
            default: None,
        }
    }

    /// Attaches a declared default value.
    pub fn with_default<T: Send + Sync + 'static>(mut self, value: T) -> Self {
        self.default = Some(Instance::new(value));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    pub fn default(&self) -> Option<&Instance> {
        self.default.as_ref()
    }
}

/// An ordered parameter list for a callable.
#[derive(Clone, Debug, Default)]
pub struct Signature {
    params: Vec<Param>,
}

impl Signature {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares the next parameter. Call order is declaration order.
    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }
}

/// Resolved constructor arguments, in declaration order.
pub struct ResolvedArgs {
    values: Vec<Instance>,
}

impl ResolvedArgs {
    pub(crate) fn new(values: Vec<Instance>) -> Self {
        ResolvedArgs { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Views the argument at `index` as a `T`.
    pub fn get<T: Send + Sync + 'static>(&self, index: usize) -> Result<Arc<T>, DynError> {
        let value = self
            .values
            .get(index)
            .ok_or_else(|| DynError::from(format!("missing argument {index}")))?;

        value
            .downcast::<T>()
            .map_err(|actual| DynError::from(format!("argument {index} is a '{actual}'")))
    }

    /// The raw argument at `index`.
    pub fn raw(&self, index: usize) -> Option<&Instance> {
        self.values.get(index)
    }
}

/// Constructor metadata: declared parameters plus the construct function.
#[derive(Clone)]
pub(crate) struct Constructor {
    pub(crate) params: Vec<Param>,
    pub(crate) build: ConstructFn,
}

/// Introspection record for one class name.
#[derive(Clone)]
pub struct ClassMetadata {
    name: String,
    constructor: Option<Constructor>,
    implements: Vec<String>,
    methods: HashMap<String, Signature>,
}

impl ClassMetadata {
    /// A concrete class built by `construct` from its declared parameters.
    ///
    /// A record with no declared parameters is constructed with no
    /// arguments.
    pub fn new<F>(name: impl Into<String>, construct: F) -> Self
    where
        F: Fn(ResolvedArgs) -> Result<Instance, DynError> + Send + Sync + 'static,
    {
        ClassMetadata {
            name: name.into(),
            constructor: Some(Constructor {
                params: Vec::new(),
                build: Arc::new(construct),
            }),
            implements: Vec::new(),
            methods: HashMap::new(),
        }
    }

    /// An interface or abstract class: known to the container, but not
    /// instantiable.
    pub fn interface(name: impl Into<String>) -> Self {
        ClassMetadata {
            name: name.into(),
            constructor: None,
            implements: Vec::new(),
            methods: HashMap::new(),
        }
    }

    /// Declares the next constructor parameter. Call order is declaration
    /// order. Ignored on interface records, which have no constructor.
    pub fn param(mut self, param: Param) -> Self {
        if let Some(constructor) = &mut self.constructor {
            constructor.params.push(param);
        }
        self
    }

    /// Declares an implemented interface, consulted by the instance-of check
    /// during callable dependency resolution.
    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.implements.push(interface.into());
        self
    }

    /// Declares a method signature for callable dependency resolution.
    pub fn method(mut self, name: impl Into<String>, signature: Signature) -> Self {
        self.methods.insert(name.into(), signature);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn method_signature(&self, name: &str) -> Option<&Signature> {
        self.methods.get(name)
    }

    pub(crate) fn constructor(&self) -> Option<&Constructor> {
        self.constructor.as_ref()
    }

    pub(crate) fn implements_interface(&self, name: &str) -> bool {
        self.implements.iter().any(|i| i == name)
    }
}

/// The container's class metadata table.
#[derive(Default)]
pub struct ClassTable {
    classes: HashMap<String, ClassMetadata>,
}

impl ClassTable {
    /// Registers `metadata` under its class name, replacing any earlier
    /// record.
    pub fn register(&mut self, metadata: ClassMetadata) {
        self.classes.insert(metadata.name().to_owned(), metadata);
    }

    pub fn get(&self, name: &str) -> Option<&ClassMetadata> {
        self.classes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }
}
