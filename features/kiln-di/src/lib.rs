//! Kiln DI is a string-keyed inversion-of-control container.
//!
//! Given an abstract identifier - an interface name, a class name, or an
//! arbitrary label - the container produces a fully wired instance,
//! recursively satisfying constructor dependencies, memoizing parameterless
//! results, and letting call-site parameter overrides flow into the
//! immediately invoked factory or constructor.
//!
//! Rust has no runtime reflection, so constructor introspection runs off an
//! explicit metadata table: a class is known to the container exactly when a
//! [ClassMetadata](classes::ClassMetadata) record for its name has been
//! registered.
//!
//! # Examples
//!
//! ```rust
//! use kiln_di::classes::{ClassMetadata, Param};
//! use kiln_di::container::Container;
//! use kiln_di::types::{Concrete, Instance};
//!
//! struct Transport;
//! struct Mailer {
//!     transport: std::sync::Arc<Transport>,
//! }
//!
//! let container = Container::new();
//!
//! container.register_class(ClassMetadata::new("Transport", |_| {
//!     Ok(Instance::new(Transport))
//! }));
//! container.register_class(
//!     ClassMetadata::new("Mailer", |args| {
//!         Ok(Instance::new(Mailer {
//!             transport: args.get::<Transport>(0)?,
//!         }))
//!     })
//!     .param(Param::typed("transport", "Transport")),
//! );
//! container.bind("mail", Concrete::class("Mailer"));
//!
//! let mailer = container.make("mail").unwrap();
//! assert!(mailer.downcast::<Mailer>().is_ok());
//! ```
//!
//! The crate consists of the following components:
//!
//! 1. container - the resolution engine and its registration surface
//! 2. classes - the introspection metadata table standing in for reflection
//! 3. dispatch - dependency injection for arbitrary callables
//! 4. aliases, bindings, instances, overrides - the engine's backing state
//! 5. errors - resolution, lookup, and alias errors

pub mod aliases;
pub mod bindings;
pub mod classes;
pub mod container;
pub mod dispatch;
pub mod errors;
pub mod instances;
pub mod overrides;
pub mod types;
