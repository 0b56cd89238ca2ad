use std::collections::HashMap;

use crate::types::{Concrete, FactoryFn};

/// A registered association from an abstract identifier to a concrete.
#[derive(Clone)]
pub struct BindingRecord {
    pub factory: FactoryFn,
    /// Recorded by singleton registrations. The caching decision is driven
    /// by the absence of explicit parameters, not by this flag.
    pub shared: bool,
}

/// Maps abstract identifiers to binding records.
#[derive(Default)]
pub struct BindingRegistry {
    bindings: HashMap<String, BindingRecord>,
}

impl BindingRegistry {
    /// Registers `record` under `abstract_id`, replacing any earlier binding.
    pub fn insert(&mut self, abstract_id: &str, record: BindingRecord) {
        self.bindings.insert(abstract_id.to_owned(), record);
    }

    /// The bound factory, or the identifier itself when nothing is bound,
    /// meaning "resolve this identifier as a class name".
    pub fn get_concrete(&self, abstract_id: &str) -> Concrete {
        match self.bindings.get(abstract_id) {
            Some(record) => Concrete::Factory(record.factory.clone()),
            None => Concrete::Class(abstract_id.to_owned()),
        }
    }

    pub fn contains(&self, abstract_id: &str) -> bool {
        self.bindings.contains_key(abstract_id)
    }

    pub fn remove(&mut self, abstract_id: &str) {
        self.bindings.remove(abstract_id);
    }
}
