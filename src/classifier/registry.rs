//! Ordered class registry
//!
//! Labels get a dense id the first time they are seen and keep it. Iteration order
//! is insertion order, so class order is reproducible across runs.

use std::collections::HashMap;

/// Append-only list of class labels with a lookup index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassRegistry {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of `label`, registering it on first sight
    pub fn register(&mut self, label: &str) -> usize {
        if let Some(&id) = self.index.get(label) {
            return id;
        }
        let id = self.names.len();
        self.names.push(label.to_string());
        self.index.insert(label.to_string(), id);
        id
    }

    pub fn id(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    pub fn name(&self, id: usize) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.index.contains_key(label)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
