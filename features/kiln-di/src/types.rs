use std::{
    any::{type_name, Any},
    fmt::Debug,
    sync::Arc,
};

use crate::{container::Container, errors::ResolveError, overrides::Overrides};

/// Boxed error type that factories and construct functions may fail with.
pub type DynError = Box<dyn std::error::Error + Send + Sync>;

/// A binding's factory, invoked with the owning container and the caller's
/// override frame.
pub type FactoryFn =
    Arc<dyn Fn(&Container, &Overrides) -> Result<Instance, ResolveError> + Send + Sync>;

/// A dynamically typed value held by the container.
///
/// Clones are shallow and share the underlying value, so a cached entry
/// handed out twice is the same object both times.
#[derive(Clone)]
pub struct Instance {
    /// Container class name, present when the value came out of a class build
    class: Option<Arc<str>>,
    type_name: &'static str,
    value: Arc<dyn Any + Send + Sync>,
}

impl Instance {
    pub fn new<T: Send + Sync + 'static>(value: T) -> Self {
        Instance {
            class: None,
            type_name: type_name::<T>(),
            value: Arc::new(value),
        }
    }

    /// Wrap a value that is already known to be an instance of a registered
    /// class, for callers handing pre-built objects into dispatch.
    pub fn of_class<T: Send + Sync + 'static>(class: &str, value: T) -> Self {
        Instance::new(value).with_class(class)
    }

    pub(crate) fn with_class(mut self, class: &str) -> Self {
        self.class = Some(Arc::from(class));
        self
    }

    /// The Rust type name of the wrapped value.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The container class this value was built as, if any.
    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    /// Attempts to view the value as a `T`, returning the actual type name
    /// when the value is something else.
    pub fn downcast<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, &'static str> {
        match Arc::downcast::<T>(self.value.clone()) {
            Ok(downcasted) => Ok(downcasted),
            Err(_) => Err(self.type_name),
        }
    }

    /// Whether two handles share one underlying value.
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut dbg = f.debug_struct("Instance");
        dbg.field("type", &self.type_name);
        if let Some(class) = self.class() {
            dbg.field("class", &class);
        }
        dbg.finish()
    }
}

/// The concrete side of a binding: another identifier to resolve, or a
/// factory producing the value directly.
#[derive(Clone)]
pub enum Concrete {
    /// A class name, resolved through the metadata table or further bindings
    Class(String),
    /// A first-class factory value
    Factory(FactoryFn),
}

impl Concrete {
    pub fn class(name: impl Into<String>) -> Self {
        Concrete::Class(name.into())
    }

    pub fn factory<F>(factory: F) -> Self
    where
        F: Fn(&Container, &Overrides) -> Result<Instance, ResolveError> + Send + Sync + 'static,
    {
        Concrete::Factory(Arc::new(factory))
    }
}

impl From<&str> for Concrete {
    fn from(name: &str) -> Self {
        Concrete::Class(name.to_owned())
    }
}

impl From<String> for Concrete {
    fn from(name: String) -> Self {
        Concrete::Class(name)
    }
}

impl Debug for Concrete {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Concrete::Class(name) => f.debug_tuple("Class").field(name).finish(),
            Concrete::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}
