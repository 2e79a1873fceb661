//! Selector alias resolution

use super::{resolve_deep, DynamicRule, RuleResolver, StaticRule};
use crate::error::{ResolverKind, Result};
use regex::Captures;

/// Resolves a selector token into concrete selector fragments, expanding
/// aliases of aliases until nothing further resolves.
#[derive(Default)]
pub struct SelectorResolver {
    rules: RuleResolver<Vec<String>>,
}

fn as_selector(fragment: &String) -> Option<&str> {
    Some(fragment.as_str())
}

impl SelectorResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_static_rule(&mut self, selector: impl Into<String>, fragments: Vec<String>) {
        let selector = selector.into();
        self.rules
            .add_static_rule(StaticRule::new(selector.clone(), selector, fragments));
    }

    pub fn add_dynamic_rule(
        &mut self,
        key: impl Into<String>,
        pattern: &str,
        compute: impl Fn(&Captures<'_>) -> Vec<String> + 'static,
    ) -> Result<()> {
        self.rules.add_dynamic_rule(DynamicRule::new(key, pattern, compute)?);
        Ok(())
    }

    pub fn remove_static_rule(&mut self, selector: &str) -> bool {
        self.rules.remove_static_rule(selector).is_some()
    }

    pub fn remove_dynamic_rule(&mut self, key: &str) -> bool {
        self.rules.remove_dynamic_rule(key).is_some()
    }

    /// Fully expanded fragments for `selector`; an unknown selector
    /// resolves to itself.
    pub fn resolve(&mut self, selector: &str) -> Result<Vec<String>> {
        let mut in_progress = Vec::new();
        let resolved = resolve_deep(
            &mut self.rules,
            ResolverKind::Selector,
            selector,
            &mut in_progress,
            as_selector,
        )?;
        Ok(resolved.unwrap_or_else(|| vec![selector.to_string()]))
    }

    pub fn rules(&self) -> &RuleResolver<Vec<String>> {
        &self.rules
    }

    pub fn rules_mut(&mut self) -> &mut RuleResolver<Vec<String>> {
        &mut self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    #[test]
    fn test_unknown_selector_resolves_to_itself() {
        let mut resolver = SelectorResolver::new();
        assert_eq!(resolver.resolve("&:hover").unwrap(), vec!["&:hover"]);
    }

    #[test]
    fn test_nested_aliases_are_flattened() {
        let mut resolver = SelectorResolver::new();
        resolver.add_static_rule("@dark", vec!["@media (prefers-color-scheme: dark)".to_string()]);
        resolver.add_static_rule("hover", vec!["&:hover".to_string()]);
        resolver.add_static_rule("@dark-hover", vec!["@dark".to_string(), "hover".to_string()]);

        assert_eq!(
            resolver.resolve("@dark-hover").unwrap(),
            vec!["@media (prefers-color-scheme: dark)", "&:hover"]
        );
        // The flattened form is now memoized under the original key
        assert_eq!(
            resolver.rules_mut().resolve("@dark-hover").unwrap(),
            vec!["@media (prefers-color-scheme: dark)", "&:hover"]
        );
    }

    #[test]
    fn test_dynamic_selector_rule() {
        let mut resolver = SelectorResolver::new();
        resolver
            .add_dynamic_rule("screen", r"^@screen-(\d+)$", |captures| {
                vec![format!("@media (min-width: {}px)", &captures[1])]
            })
            .unwrap();

        assert_eq!(resolver.resolve("@screen-640").unwrap(), vec!["@media (min-width: 640px)"]);
    }

    #[test]
    fn test_cycle_is_reported_with_chain() {
        let mut resolver = SelectorResolver::new();
        resolver.add_static_rule("a", vec!["b".to_string()]);
        resolver.add_static_rule("b", vec!["a".to_string()]);

        match resolver.resolve("a") {
            Err(EngineError::CyclicResolution { kind, chain }) => {
                assert_eq!(kind, ResolverKind::Selector);
                assert_eq!(chain, vec!["a", "b", "a"]);
            }
            other => panic!("expected cycle error, got {:?}", other),
        }
    }
}
