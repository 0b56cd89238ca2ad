use std::collections::HashMap;

use crate::types::Instance;

/// Already-built values: manual registrations and memoized build results.
#[derive(Default)]
pub struct InstanceCache {
    instances: HashMap<String, Instance>,
}

impl InstanceCache {
    pub fn insert(&mut self, id: &str, value: Instance) {
        self.instances.insert(id.to_owned(), value);
    }

    pub fn get(&self, id: &str) -> Option<Instance> {
        self.instances.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.instances.contains_key(id)
    }

    pub fn forget(&mut self, id: &str) {
        self.instances.remove(id);
    }
}
