//! Shortcut resolution

use super::{resolve_deep, DynamicRule, RuleResolver, StaticRule};
use crate::error::{ResolverKind, Result};
use crate::types::StyleItem;
use regex::Captures;

/// Resolves a shortcut name into style items. Shortcut names found among
/// the resolved items are expanded in turn; names that match nothing stay
/// as strings for the caller to report.
#[derive(Default)]
pub struct ShortcutResolver {
    rules: RuleResolver<Vec<StyleItem>>,
}

impl ShortcutResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_static_rule(&mut self, name: impl Into<String>, items: Vec<StyleItem>) {
        let name = name.into();
        self.rules
            .add_static_rule(StaticRule::new(name.clone(), name, items));
    }

    pub fn add_dynamic_rule(
        &mut self,
        key: impl Into<String>,
        pattern: &str,
        compute: impl Fn(&Captures<'_>) -> Vec<StyleItem> + 'static,
    ) -> Result<()> {
        self.rules.add_dynamic_rule(DynamicRule::new(key, pattern, compute)?);
        Ok(())
    }

    pub fn remove_static_rule(&mut self, name: &str) -> bool {
        self.rules.remove_static_rule(name).is_some()
    }

    pub fn remove_dynamic_rule(&mut self, key: &str) -> bool {
        self.rules.remove_dynamic_rule(key).is_some()
    }

    /// `Ok(None)` when `name` is not a known shortcut
    pub fn resolve(&mut self, name: &str) -> Result<Option<Vec<StyleItem>>> {
        let mut in_progress = Vec::new();
        resolve_deep(
            &mut self.rules,
            ResolverKind::Shortcut,
            name,
            &mut in_progress,
            StyleItem::as_shortcut,
        )
    }

    pub fn rules(&self) -> &RuleResolver<Vec<StyleItem>> {
        &self.rules
    }

    pub fn rules_mut(&mut self) -> &mut RuleResolver<Vec<StyleItem>> {
        &mut self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::types::StyleDefinition;
    use serde_json::json;

    fn def(value: serde_json::Value) -> StyleItem {
        StyleItem::Definition(serde_json::from_value::<StyleDefinition>(value).unwrap())
    }

    #[test]
    fn test_transitive_expansion_keeps_order() {
        let mut resolver = ShortcutResolver::new();
        resolver.add_static_rule("flex", vec![def(json!({ "display": "flex" }))]);
        resolver.add_static_rule(
            "center",
            vec![
                "flex".into(),
                def(json!({ "alignItems": "center", "justifyContent": "center" })),
            ],
        );

        let resolved = resolver.resolve("center").unwrap().unwrap();
        assert_eq!(
            resolved,
            vec![
                def(json!({ "display": "flex" })),
                def(json!({ "alignItems": "center", "justifyContent": "center" })),
            ]
        );
    }

    #[test]
    fn test_unknown_names_stay_unresolved() {
        let mut resolver = ShortcutResolver::new();
        resolver.add_static_rule("btn", vec!["missing".into(), def(json!({ "cursor": "pointer" }))]);

        assert_eq!(resolver.resolve("nope").unwrap(), None);
        let resolved = resolver.resolve("btn").unwrap().unwrap();
        assert_eq!(resolved[0], StyleItem::shortcut("missing"));
    }

    #[test]
    fn test_dynamic_shortcut() {
        let mut resolver = ShortcutResolver::new();
        resolver
            .add_dynamic_rule("m", r"^m-(\d+)$", |captures| {
                let mut definition = StyleDefinition::new();
                definition.insert("margin".to_string(), format!("{}px", &captures[1]).into());
                vec![StyleItem::Definition(definition)]
            })
            .unwrap();

        assert_eq!(resolver.resolve("m-4").unwrap().unwrap(), vec![def(json!({ "margin": "4px" }))]);
    }

    #[test]
    fn test_self_reference_is_a_cycle() {
        let mut resolver = ShortcutResolver::new();
        resolver.add_static_rule("loop", vec!["loop".into()]);

        let err = resolver.resolve("loop").unwrap_err();
        assert!(matches!(err, EngineError::CyclicResolution { kind: ResolverKind::Shortcut, .. }));
    }
}
