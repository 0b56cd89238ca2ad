use std::sync::Arc;

use thiserror::Error;

use crate::types::DynError;

/// Errors while resolving an identifier into an instance.
#[derive(Error, Debug, Clone)]
pub enum ResolveError {
    /// No metadata record exists for the target class
    #[error("target class '{0}' does not exist")]
    MissingClass(String),
    /// The target is an interface or abstract class
    #[error("target '{0}' is not instantiable")]
    NotInstantiable(String),
    /// A primitive constructor parameter had no override and no default
    #[error("unresolvable dependency '{parameter}' in class '{class}'")]
    UnresolvableDependency { parameter: String, class: String },
    /// A construct function failed
    #[error("constructor for '{class}' failed - error: {error:?}")]
    ConstructorFailed {
        class: String,
        error: Arc<DynError>,
    },
    /// A bound factory failed
    #[error("factory for '{id}' failed - error: {error:?}")]
    FactoryFailed { id: String, error: Arc<DynError> },
}

impl ResolveError {
    /// Wrap a custom failure raised inside a bound factory.
    pub fn factory(id: impl Into<String>, error: impl Into<DynError>) -> Self {
        ResolveError::FactoryFailed {
            id: id.into(),
            error: Arc::new(error.into()),
        }
    }
}

/// Errors from the [get](crate::container::Container::get) facade.
///
/// Distinguishes "never heard of it" from "tried and failed": a known
/// identifier's resolution error passes through unchanged.
#[derive(Error, Debug, Clone)]
pub enum GetError {
    /// The identifier has no binding, cached instance, or alias at all
    #[error("no entry was found for identifier '{0}'")]
    NotFound(String),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Errors when registering an alias.
#[derive(Error, Debug, Clone)]
pub enum AliasError {
    /// An identifier may not alias itself
    #[error("'{0}' is aliased to itself")]
    SelfAlias(String),
}
