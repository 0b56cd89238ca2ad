use std::{
    fmt::Debug,
    sync::{Arc, Mutex, OnceLock, RwLock},
};

use tracing::{debug, error};

use crate::{
    aliases::AliasTable,
    bindings::{BindingRecord, BindingRegistry},
    classes::{ClassMetadata, ClassTable, Param, ResolvedArgs},
    errors::{AliasError, GetError, ResolveError},
    instances::InstanceCache,
    overrides::{OverrideStack, Overrides},
    types::{Concrete, FactoryFn, Instance},
};

/// The resolution engine.
///
/// Given an abstract identifier, produces a concrete object graph:
/// identifier to alias chase to cache check to binding lookup to factory or
/// class build, recursing into [make](Container::make) for class-typed
/// dependencies, then memoizing the result when the caller supplied no
/// explicit parameters.
///
/// The handle is a cheap clone; clones share one registry, cache, and
/// override stack.
#[derive(Clone, Default)]
pub struct Container(Arc<ContainerInner>);

#[derive(Default)]
struct ContainerInner {
    aliases: RwLock<AliasTable>,
    bindings: RwLock<BindingRegistry>,
    instances: RwLock<InstanceCache>,
    classes: RwLock<ClassTable>,
    overrides: Mutex<OverrideStack>,
}

impl Container {
    pub fn new() -> Self {
        Container(Arc::new(ContainerInner::default()))
    }

    /// Whether two handles share one container.
    pub fn ptr_eq(&self, other: &Container) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

// Process-wide slot. A well-known default for callers that want one; nothing
// inside the crate consults it, containers are always passed explicitly.
impl Container {
    /// The process-wide container, installing a fresh one on first access.
    pub fn global() -> Container {
        let mut slot = global_slot().lock().unwrap();
        slot.get_or_insert_with(Container::new).clone()
    }

    /// Installs (or clears) the process-wide container, returning what was
    /// installed.
    pub fn set_global(container: Option<Container>) -> Option<Container> {
        let mut slot = global_slot().lock().unwrap();
        slot.clone_from(&container);
        container
    }
}

// Registration surface, used during application bootstrap.
impl Container {
    /// Registers a binding from `abstract_id` to `concrete`.
    ///
    /// A class-name concrete is wrapped into a factory: terminal when the
    /// name equals `abstract_id` (build it directly), an indirection into
    /// [make](Container::make) otherwise, so rebind chains keep working.
    pub fn bind(&self, abstract_id: &str, concrete: impl Into<Concrete>) {
        self.register_binding(abstract_id, concrete.into(), false);
    }

    /// [bind](Container::bind), with the shared flag recorded.
    pub fn singleton(&self, abstract_id: &str, concrete: impl Into<Concrete>) {
        self.register_binding(abstract_id, concrete.into(), true);
    }

    fn register_binding(&self, abstract_id: &str, concrete: Concrete, shared: bool) {
        let factory = match concrete {
            Concrete::Factory(factory) => factory,
            Concrete::Class(class) => Self::class_factory(abstract_id, class),
        };

        debug!("registered binding for '{}'", abstract_id);
        self.0
            .bindings
            .write()
            .unwrap()
            .insert(abstract_id, BindingRecord { factory, shared });
    }

    /// Wrapper factory for a class-name concrete, capturing both names.
    fn class_factory(abstract_id: &str, class: String) -> FactoryFn {
        let abstract_id = abstract_id.to_owned();
        Arc::new(move |container: &Container, overrides: &Overrides| {
            if abstract_id == class {
                container.build(Concrete::Class(class.clone()))
            } else {
                container.make_with(&class, overrides.clone())
            }
        })
    }

    /// Registers an already-built value under `id` and returns it.
    ///
    /// Any alias entry registered under exactly `id` is removed; a manual
    /// registration always wins over aliasing ambiguity.
    pub fn instance(&self, id: &str, value: Instance) -> Instance {
        self.0.aliases.write().unwrap().remove(id);
        debug!("registered instance for '{}'", id);
        self.0.instances.write().unwrap().insert(id, value.clone());
        value
    }

    /// Registers `alias` as another name for `target`.
    pub fn alias(&self, target: &str, alias: &str) -> Result<(), AliasError> {
        self.0.aliases.write().unwrap().register(target, alias)
    }

    /// Registers introspection metadata for a class name.
    pub fn register_class(&self, metadata: ClassMetadata) {
        self.0.classes.write().unwrap().register(metadata);
    }

    pub(crate) fn lookup_class(&self, name: &str) -> Option<ClassMetadata> {
        self.0.classes.read().unwrap().get(name).cloned()
    }
}

// Resolution surface, used at request-handling time.
impl Container {
    /// Resolves `id` into an instance, memoizing the result.
    pub fn make(&self, id: &str) -> Result<Instance, ResolveError> {
        self.make_with(id, Overrides::new())
    }

    /// Resolves `id` with call-site parameter overrides.
    ///
    /// A non-empty `parameters` forces a fresh build: the cache is neither
    /// consulted nor written, in either direction.
    pub fn make_with(&self, id: &str, parameters: Overrides) -> Result<Instance, ResolveError> {
        let id = self.0.aliases.read().unwrap().resolve(id);

        let fresh_build = !parameters.is_empty();

        if !fresh_build {
            if let Some(cached) = self.0.instances.read().unwrap().get(&id) {
                return Ok(cached);
            }
        }

        self.0.overrides.lock().unwrap().push(parameters);

        let concrete = self.0.bindings.read().unwrap().get_concrete(&id);

        let built = match concrete {
            Concrete::Class(class) if class != id => self.make(&class),
            terminal => self.build(terminal),
        };

        let object = match built {
            Ok(object) => object,
            Err(e) => {
                self.0.overrides.lock().unwrap().pop();
                return Err(e);
            }
        };

        // Every parameterless build is memoized, shared flag or not.
        if !fresh_build {
            self.0.instances.write().unwrap().insert(&id, object.clone());
        }

        self.0.overrides.lock().unwrap().pop();

        Ok(object)
    }

    /// Constructs from a known concrete without consulting bindings.
    ///
    /// A factory is invoked with the container and the top override frame.
    /// A class name goes through the metadata table and its constructor
    /// parameters are resolved in declaration order.
    pub fn build(&self, concrete: Concrete) -> Result<Instance, ResolveError> {
        match concrete {
            Concrete::Factory(factory) => {
                let overrides = self.0.overrides.lock().unwrap().top();
                factory(self, &overrides)
            }
            Concrete::Class(class) => self.build_class(&class),
        }
    }

    fn build_class(&self, class: &str) -> Result<Instance, ResolveError> {
        let Some(metadata) = self.lookup_class(class) else {
            error!("tried to resolve unregistered class '{}'", class);
            return Err(ResolveError::MissingClass(class.to_owned()));
        };

        let Some(constructor) = metadata.constructor().cloned() else {
            return Err(ResolveError::NotInstantiable(class.to_owned()));
        };

        let arguments = self.resolve_constructor_dependencies(class, &constructor.params)?;

        let object = (constructor.build)(ResolvedArgs::new(arguments)).map_err(|error| {
            ResolveError::ConstructorFailed {
                class: class.to_owned(),
                error: Arc::new(error),
            }
        })?;

        debug!("constructed instance of '{}'", class);

        Ok(object.with_class(class))
    }

    /// Resolves declared constructor parameters in declaration order: a
    /// matching override key wins verbatim, primitives fall back to their
    /// declared default, class-typed parameters recurse into the engine.
    fn resolve_constructor_dependencies(
        &self,
        class: &str,
        params: &[Param],
    ) -> Result<Vec<Instance>, ResolveError> {
        let overrides = self.0.overrides.lock().unwrap().top();

        let mut resolved = Vec::with_capacity(params.len());
        for param in params {
            if let Some(value) = overrides.get(param.name()) {
                resolved.push(value.clone());
                continue;
            }

            match param.class() {
                None => match param.default() {
                    Some(default) => resolved.push(default.clone()),
                    None => {
                        return Err(ResolveError::UnresolvableDependency {
                            parameter: param.name().to_owned(),
                            class: class.to_owned(),
                        });
                    }
                },
                Some(dependency) => resolved.push(self.make(dependency)?),
            }
        }

        Ok(resolved)
    }
}

// Facade operations.
impl Container {
    /// [make](Container::make), with failures for identifiers the container
    /// has never heard of reclassified as [GetError::NotFound].
    pub fn get(&self, id: &str) -> Result<Instance, GetError> {
        match self.make(id) {
            Ok(object) => Ok(object),
            Err(e) if self.bound(id) => Err(GetError::Resolve(e)),
            Err(_) => Err(GetError::NotFound(id.to_owned())),
        }
    }

    pub fn has(&self, id: &str) -> bool {
        self.bound(id)
    }

    /// Whether `id` has a binding, a cached instance, or an alias entry.
    pub fn bound(&self, id: &str) -> bool {
        self.0.bindings.read().unwrap().contains(id)
            || self.0.instances.read().unwrap().contains(id)
            || self.0.aliases.read().unwrap().contains(id)
    }

    /// A deferred resolution handle for `id`.
    pub fn factory(&self, id: &str) -> impl Fn() -> Result<Instance, ResolveError> + Send + Sync {
        let container = self.clone();
        let id = id.to_owned();
        move || container.make(&id)
    }

    /// Removes only the cached instance for `id`.
    pub fn forget_instance(&self, id: &str) {
        self.0.instances.write().unwrap().forget(id);
    }
}

// Index-style sugar over the same registry and cache.
impl Container {
    /// Binds `key` to a factory returning `value` verbatim.
    pub fn set<T: Send + Sync + 'static>(&self, key: &str, value: T) {
        let value = Instance::new(value);
        self.bind(key, Concrete::factory(move |_, _| Ok(value.clone())));
    }

    /// [bound](Container::bound), under the name the index-style surface
    /// uses.
    pub fn contains(&self, key: &str) -> bool {
        self.bound(key)
    }

    /// Drops `key`'s binding and any cached instance.
    pub fn unset(&self, key: &str) {
        self.0.bindings.write().unwrap().remove(key);
        self.0.instances.write().unwrap().forget(key);
    }
}

impl Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container").finish_non_exhaustive()
    }
}

fn global_slot() -> &'static Mutex<Option<Container>> {
    static GLOBAL: OnceLock<Mutex<Option<Container>>> = OnceLock::new();
    GLOBAL.get_or_init(|| Mutex::new(None))
}
