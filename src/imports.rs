//! Ordered, de-duplicated set of component names an entity depends on.

use alloc::string::String;
use alloc::vec::Vec;
use hashbrown::HashSet;

/// Component names in first-insertion order, each listed once.
#[derive(Debug, Clone, Default)]
pub struct Imports {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl Imports {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `name`; returns false if it was already present.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.seen.contains(&name) {
            return false;
        }
        self.seen.insert(name.clone());
        self.order.push(name);
        true
    }

    /// Set union, keeping `self`'s entries first.
    pub fn union(mut self, other: &Imports) -> Imports {
        for name in &other.order {
            self.insert(name.as_str());
        }
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.seen.contains(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

impl PartialEq for Imports {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order
    }
}

impl Eq for Imports {}

impl<S: Into<String>> FromIterator<S> for Imports {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut imports = Imports::new();
        for name in iter {
            imports.insert(name);
        }
        imports
    }
}

impl<'a> IntoIterator for &'a Imports {
    type Item = &'a String;
    type IntoIter = core::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.iter()
    }
}
