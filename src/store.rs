//! Content-addressed atomic rule storage

use crate::types::{AtomicRule, AtomicRuleContent};
use crate::utils::number_to_name;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Outcome of interning one declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interned {
    pub name: String,
    pub created: bool,
}

/// Both maps only grow. A name, once handed out for some content, keeps
/// meaning that content for the life of the store.
#[derive(Debug, Default)]
pub struct AtomicRuleStore {
    atomic_names: HashMap<String, String>,
    atomic_rules: IndexMap<String, AtomicRule>,
}

impl AtomicRuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name for `content`, creating the rule if this content is new
    pub fn intern(&mut self, content: AtomicRuleContent, prefix: &str) -> Interned {
        let key = content.content_key();
        if let Some(name) = self.atomic_names.get(&key) {
            return Interned {
                name: name.clone(),
                created: false,
            };
        }

        let name = format!("{}{}", prefix, number_to_name(self.atomic_names.len()));
        self.atomic_names.insert(key, name.clone());
        self.atomic_rules.insert(
            name.clone(),
            AtomicRule {
                name: name.clone(),
                content,
            },
        );
        Interned {
            name,
            created: true,
        }
    }

    pub fn name_of(&self, content: &AtomicRuleContent) -> Option<&str> {
        self.atomic_names
            .get(&content.content_key())
            .map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&AtomicRule> {
        self.atomic_rules.get(name)
    }

    /// Rules in creation order
    pub fn rules(&self) -> impl Iterator<Item = &AtomicRule> {
        self.atomic_rules.values()
    }

    pub fn len(&self) -> usize {
        self.atomic_rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atomic_rules.is_empty()
    }
}
