//! Memoizing name -> value resolution shared by selectors and shortcuts

mod selector;
mod shortcut;

pub use selector::SelectorResolver;
pub use shortcut::ShortcutResolver;

use crate::error::{EngineError, ResolverKind, Result};
use indexmap::IndexMap;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Exact-match rule
#[derive(Debug, Clone)]
pub struct StaticRule<T> {
    pub key: String,
    pub match_string: String,
    pub resolved: T,
}

impl<T> StaticRule<T> {
    pub fn new(key: impl Into<String>, match_string: impl Into<String>, resolved: T) -> Self {
        Self {
            key: key.into(),
            match_string: match_string.into(),
            resolved,
        }
    }
}

/// Pattern rule; the value is computed from the match
pub struct DynamicRule<T> {
    pub key: String,
    pub pattern: Regex,
    compute: Rc<dyn Fn(&Captures<'_>) -> T>,
}

impl<T> DynamicRule<T> {
    pub fn new(
        key: impl Into<String>,
        pattern: &str,
        compute: impl Fn(&Captures<'_>) -> T + 'static,
    ) -> Result<Self> {
        Ok(Self {
            key: key.into(),
            pattern: Regex::new(pattern)?,
            compute: Rc::new(compute),
        })
    }

    pub fn compute(&self, captures: &Captures<'_>) -> T {
        (self.compute)(captures)
    }
}

impl<T> Clone for DynamicRule<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            pattern: self.pattern.clone(),
            compute: Rc::clone(&self.compute),
        }
    }
}

impl<T> fmt::Debug for DynamicRule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicRule")
            .field("key", &self.key)
            .field("pattern", &self.pattern.as_str())
            .finish_non_exhaustive()
    }
}

/// Generic resolver over static and dynamic rules.
///
/// Resolutions are memoized per input string. The memo maps an input to a
/// slot in `cells`, so a cached result can be overwritten in place by
/// [`RuleResolver::set_resolved_result`] without re-keying.
pub struct RuleResolver<T> {
    static_rules: IndexMap<String, StaticRule<T>>,
    dynamic_rules: IndexMap<String, DynamicRule<T>>,
    cache: HashMap<String, usize>,
    cells: Vec<Option<T>>,
}

impl<T> Default for RuleResolver<T> {
    fn default() -> Self {
        Self {
            static_rules: IndexMap::new(),
            dynamic_rules: IndexMap::new(),
            cache: HashMap::new(),
            cells: Vec::new(),
        }
    }
}

impl<T: Clone> RuleResolver<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_static_rule(&mut self, rule: StaticRule<T>) {
        if let Some(existing) = self.static_rules.get(&rule.key) {
            log::warn!(
                "Static rule '{}' redefined, overwriting match '{}'",
                rule.key, existing.match_string
            );
            let stale = existing.match_string.clone();
            self.evict(|input| input == stale);
        }
        self.static_rules.insert(rule.key.clone(), rule);
    }

    pub fn add_dynamic_rule(&mut self, rule: DynamicRule<T>) {
        if let Some(existing) = self.dynamic_rules.get(&rule.key) {
            log::warn!(
                "Dynamic rule '{}' redefined, overwriting pattern '{}'",
                rule.key,
                existing.pattern.as_str()
            );
            let stale = existing.pattern.clone();
            self.evict(|input| stale.is_match(input));
        }
        self.dynamic_rules.insert(rule.key.clone(), rule);
    }

    pub fn remove_static_rule(&mut self, key: &str) -> Option<StaticRule<T>> {
        let rule = self.static_rules.shift_remove(key)?;
        self.evict(|input| input == rule.match_string);
        Some(rule)
    }

    pub fn remove_dynamic_rule(&mut self, key: &str) -> Option<DynamicRule<T>> {
        let rule = self.dynamic_rules.shift_remove(key)?;
        self.evict(|input| rule.pattern.is_match(input));
        Some(rule)
    }

    /// Look up `input`. `None` means no rule applies and the caller should
    /// treat the input as itself.
    pub fn resolve(&mut self, input: &str) -> Option<T> {
        if let Some(value) = self.cached(input) {
            log::trace!("Resolver cache hit for '{}'", input);
            return Some(value.clone());
        }

        let resolved = self
            .static_rules
            .values()
            .find(|rule| rule.match_string == input)
            .map(|rule| rule.resolved.clone())
            .or_else(|| {
                self.dynamic_rules.values().find_map(|rule| {
                    rule.pattern
                        .captures(input)
                        .map(|captures| rule.compute(&captures))
                })
            })?;

        self.set_resolved_result(input, resolved.clone());
        Some(resolved)
    }

    /// Seed or overwrite the memo cell for `input`
    pub fn set_resolved_result(&mut self, input: &str, value: T) {
        match self.cache.get(input) {
            Some(&index) => self.cells[index] = Some(value),
            None => {
                self.cache.insert(input.to_string(), self.cells.len());
                self.cells.push(Some(value));
            }
        }
    }

    pub fn static_rules(&self) -> impl Iterator<Item = &StaticRule<T>> {
        self.static_rules.values()
    }

    pub fn dynamic_rules(&self) -> impl Iterator<Item = &DynamicRule<T>> {
        self.dynamic_rules.values()
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    fn cached(&self, input: &str) -> Option<&T> {
        let index = *self.cache.get(input)?;
        self.cells.get(index)?.as_ref()
    }

    fn evict(&mut self, mut matches: impl FnMut(&str) -> bool) {
        let cells = &mut self.cells;
        self.cache.retain(|input, index| {
            if matches(input.as_str()) {
                cells[*index] = None;
                false
            } else {
                true
            }
        });
    }
}

/// Resolve `input` to a fixed point.
///
/// Every element for which `candidate` yields a name is resolved again and
/// spliced in place. The flattened result is written back under `input`.
/// `in_progress` holds the names currently being expanded; meeting one of
/// them again is a cycle.
pub(crate) fn resolve_deep<T: Clone>(
    rules: &mut RuleResolver<Vec<T>>,
    kind: ResolverKind,
    input: &str,
    in_progress: &mut Vec<String>,
    candidate: fn(&T) -> Option<&str>,
) -> Result<Option<Vec<T>>> {
    if in_progress.iter().any(|name| name == input) {
        let mut chain = in_progress.clone();
        chain.push(input.to_string());
        return Err(EngineError::cyclic(kind, chain));
    }

    let Some(first_pass) = rules.resolve(input) else {
        return Ok(None);
    };

    in_progress.push(input.to_string());
    let mut flattened = Vec::with_capacity(first_pass.len());
    for element in first_pass {
        let deeper = match candidate(&element) {
            Some(name) => resolve_deep(rules, kind, name, in_progress, candidate)?,
            None => None,
        };
        match deeper {
            Some(expanded) => flattened.extend(expanded),
            None => flattened.push(element),
        }
    }
    in_progress.pop();

    rules.set_resolved_result(input, flattened.clone());
    Ok(Some(flattened))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> RuleResolver<String> {
        let mut resolver = RuleResolver::new();
        resolver.add_static_rule(StaticRule::new("hover", "hover", ":hover".to_string()));
        resolver.add_dynamic_rule(
            DynamicRule::new("size", r"^size-(\d+)$", |captures| format!("{}px", &captures[1])).unwrap(),
        );
        resolver
    }

    #[test]
    fn test_static_and_dynamic_resolution() {
        let mut resolver = resolver();
        assert_eq!(resolver.resolve("hover"), Some(":hover".to_string()));
        assert_eq!(resolver.resolve("size-4"), Some("4px".to_string()));
        assert_eq!(resolver.resolve("unknown"), None);
        assert_eq!(resolver.cache_len(), 2);
    }

    #[test]
    fn test_first_dynamic_match_wins() {
        let mut resolver = resolver();
        resolver.add_dynamic_rule(
            DynamicRule::new("any", r"^size-(.*)$", |_| "late".to_string()).unwrap(),
        );
        assert_eq!(resolver.resolve("size-2"), Some("2px".to_string()));
        assert_eq!(resolver.resolve("size-x"), Some("late".to_string()));
    }

    #[test]
    fn test_seeded_result_takes_precedence() {
        let mut resolver = resolver();
        assert_eq!(resolver.resolve("hover"), Some(":hover".to_string()));
        resolver.set_resolved_result("hover", ":hover:not(:disabled)".to_string());
        assert_eq!(resolver.resolve("hover"), Some(":hover:not(:disabled)".to_string()));
        assert_eq!(resolver.cache_len(), 1);
    }

    #[test]
    fn test_removing_rules_evicts_cache() {
        let mut resolver = resolver();
        resolver.resolve("hover");
        resolver.resolve("size-8");
        resolver.resolve("size-9");

        assert!(resolver.remove_static_rule("hover").is_some());
        assert_eq!(resolver.resolve("hover"), None);

        assert!(resolver.remove_dynamic_rule("size").is_some());
        assert_eq!(resolver.resolve("size-8"), None);
        assert_eq!(resolver.cache_len(), 0);
        assert!(resolver.remove_dynamic_rule("size").is_none());
    }

    #[test]
    fn test_overwriting_rule_key_replaces_value() {
        let mut resolver = resolver();
        assert_eq!(resolver.resolve("hover"), Some(":hover".to_string()));
        resolver.add_static_rule(StaticRule::new("hover", "hover", ":focus".to_string()));
        assert_eq!(resolver.resolve("hover"), Some(":focus".to_string()));
        assert_eq!(resolver.static_rules().count(), 1);
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        let result = DynamicRule::<String>::new("bad", r"(unclosed", |_| String::new());
        assert!(matches!(result, Err(EngineError::InvalidPattern(_))));
    }
}
