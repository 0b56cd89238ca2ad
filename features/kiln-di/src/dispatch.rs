//! Dependency injection for arbitrary callables.
//!
//! Route and method dispatch hand the container an already-matched
//! positional argument list plus the callable's declared signature; the
//! container fills in the class-typed parameters it can satisfy and splices
//! declared defaults into unset positional slots, using the same resolution
//! rules as constructor autowiring.

use tracing::trace;

use crate::{
    classes::{Param, Signature},
    container::Container,
    errors::ResolveError,
    types::Instance,
};

impl Container {
    /// Merges container-resolved values into `supplied` for `signature`.
    ///
    /// Walks the declared parameters in order, tracking how many values have
    /// been container-injected so far. A class-typed parameter with no
    /// matching supplied argument is resolved (declared default, else
    /// [make](Container::make)) and spliced in at its declared position,
    /// shifting later positional arguments right. An untyped parameter whose
    /// original positional slot is unset receives its declared default, when
    /// one exists.
    ///
    /// Returns the merged, position-correct argument list, ready to invoke
    /// the callable.
    pub fn resolve_dependencies(
        &self,
        supplied: Vec<Instance>,
        signature: &Signature,
    ) -> Result<Vec<Instance>, ResolveError> {
        let original = supplied.clone();
        let mut merged = supplied;
        let mut injected = 0_usize;

        for (index, param) in signature.params().iter().enumerate() {
            if let Some(value) = self.transform_dependency(param, &merged)? {
                trace!("injected '{}' at position {}", param.name(), index);
                injected += 1;
                splice(&mut merged, index, value);
            } else if !position_supplied(&original, index, injected) {
                if let Some(default) = param.default() {
                    splice(&mut merged, index, default.clone());
                }
            }
        }

        Ok(merged)
    }

    /// Resolves dependencies for `class::method` when the method is known.
    ///
    /// An unknown class or method leaves the supplied arguments untouched.
    pub fn resolve_method_dependencies(
        &self,
        supplied: Vec<Instance>,
        class: &str,
        method: &str,
    ) -> Result<Vec<Instance>, ResolveError> {
        let signature = self
            .lookup_class(class)
            .and_then(|metadata| metadata.method_signature(method).cloned());

        match signature {
            Some(signature) => self.resolve_dependencies(supplied, &signature),
            None => Ok(supplied),
        }
    }

    /// The container-resolved value for a class-typed parameter that is not
    /// already present among the supplied arguments. `None` for untyped
    /// parameters and for classes the caller already supplied.
    fn transform_dependency(
        &self,
        param: &Param,
        supplied: &[Instance],
    ) -> Result<Option<Instance>, ResolveError> {
        let Some(class) = param.class() else {
            return Ok(None);
        };

        if self.already_in_arguments(class, supplied) {
            return Ok(None);
        }

        match param.default() {
            Some(default) => Ok(Some(default.clone())),
            None => self.make(class).map(Some),
        }
    }

    fn already_in_arguments(&self, class: &str, supplied: &[Instance]) -> bool {
        supplied.iter().any(|value| self.instance_of(value, class))
    }

    /// Instance-of check against the metadata table: a value matches when it
    /// was built as `class` or its class declares `class` among its
    /// implemented interfaces.
    fn instance_of(&self, value: &Instance, class: &str) -> bool {
        let Some(built_as) = value.class() else {
            return false;
        };

        built_as == class
            || self
                .lookup_class(built_as)
                .is_some_and(|metadata| metadata.implements_interface(class))
    }
}

/// Inserts at the declared position, shifting later arguments right.
fn splice(arguments: &mut Vec<Instance>, index: usize, value: Instance) {
    let at = index.min(arguments.len());
    arguments.insert(at, value);
}

/// Whether the caller supplied a value for the positional slot lining up
/// with declared `index`, offset by how many values were container-injected
/// before it.
fn position_supplied(original: &[Instance], index: usize, injected: usize) -> bool {
    index
        .checked_sub(injected)
        .is_some_and(|slot| slot < original.len())
}
