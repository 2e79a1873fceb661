//! Flattens nested style definitions into single declarations

use crate::error::Result;
use crate::plugin::PluginPipeline;
use crate::types::*;
use crate::utils::{split_top_level_commas, to_kebab_case};
use futures::future::{FutureExt, LocalBoxFuture};

/// Walks style trees, consulting the plugin pipeline at every level.
///
/// Output order follows declaration order in the source; nothing is merged
/// or de-duplicated here.
pub struct Extractor<'a> {
    default_selector: &'a str,
    plugins: &'a mut PluginPipeline,
}

impl<'a> Extractor<'a> {
    pub fn new(default_selector: &'a str, plugins: &'a mut PluginPipeline) -> Self {
        Self {
            default_selector,
            plugins,
        }
    }

    pub async fn extract(&mut self, definition: &StyleDefinition) -> Result<Vec<ExtractedItem>> {
        let mut out = Vec::new();
        self.extract_definition(definition.clone(), Vec::new(), &mut out)
            .await?;
        Ok(out)
    }

    /// Extract a list of items at the top level. Shortcut names still
    /// unresolved after `transform_style_items` come back as
    /// [`ExtractedItem::Unknown`].
    pub async fn extract_items(&mut self, items: Vec<StyleItem>) -> Result<Vec<ExtractedItem>> {
        let mut out = Vec::new();
        self.extract_item_list(items, Vec::new(), &mut out).await?;
        Ok(out)
    }

    fn extract_definition<'b>(
        &'b mut self,
        definition: StyleDefinition,
        chain: Vec<String>,
        out: &'b mut Vec<ExtractedItem>,
    ) -> LocalBoxFuture<'b, Result<()>> {
        async move {
            let selectors = self.plugins.transform_selectors(chain.clone()).await?;
            let selectors = normalize_selectors(&selectors, self.default_selector);

            let definitions = self
                .plugins
                .transform_style_definitions(vec![definition])
                .await?;

            for definition in definitions {
                if definition.is_empty() {
                    log::debug!("Empty style definition under {:?}, nothing extracted", chain);
                    continue;
                }

                for (key, value) in definition {
                    match value {
                        StyleValue::Property(value) => {
                            out.push(ExtractedItem::Content(ExtractedRuleContent {
                                selector_chain: selectors.clone(),
                                property: to_kebab_case(&key),
                                value: value.normalize(),
                            }));
                        }
                        StyleValue::Nested(nested) => {
                            let mut next = chain.clone();
                            next.push(key);
                            self.extract_definition(nested, next, out).await?;
                        }
                        StyleValue::Items(items) => {
                            let mut next = chain.clone();
                            next.push(key);
                            self.extract_item_list(items, next, out).await?;
                        }
                    }
                }
            }

            Ok(())
        }
        .boxed_local()
    }

    fn extract_item_list<'b>(
        &'b mut self,
        items: Vec<StyleItem>,
        chain: Vec<String>,
        out: &'b mut Vec<ExtractedItem>,
    ) -> LocalBoxFuture<'b, Result<()>> {
        async move {
            let items = self.plugins.transform_style_items(items).await?;
            for item in items {
                match item {
                    StyleItem::Shortcut(name) => {
                        log::debug!("Unknown shortcut '{}'", name);
                        out.push(ExtractedItem::Unknown(name));
                    }
                    StyleItem::Definition(definition) => {
                        self.extract_definition(definition, chain.clone(), out)
                            .await?;
                    }
                }
            }
            Ok(())
        }
        .boxed_local()
    }
}

/// Turn a raw selector chain into the chain stored on a rule.
///
/// Each fragment is split into its comma groups. An empty chain becomes the
/// default selector marker, and a chain whose innermost fragment carries no
/// marker gets one appended. Every `&` is then replaced by
/// `default_selector`.
pub fn normalize_selectors(selectors: &[String], default_selector: &str) -> Vec<String> {
    let mut fragments: Vec<Vec<String>> = selectors
        .iter()
        .map(|selector| split_top_level_commas(selector))
        .filter(|groups| !groups.is_empty())
        .collect();

    let anchored = fragments.last().map_or(false, |groups| {
        groups.iter().any(|group| {
            group.contains(ATOMIC_RULE_PLACEHOLDER) || group.contains(DEFAULT_SELECTOR_PLACEHOLDER)
        })
    });
    if !anchored {
        fragments.push(vec![DEFAULT_SELECTOR_PLACEHOLDER.to_string()]);
    }

    fragments
        .into_iter()
        .map(|groups| {
            groups
                .iter()
                .map(|group| group.replace(DEFAULT_SELECTOR_PLACEHOLDER, default_selector))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use serde_json::json;

    fn definition(value: serde_json::Value) -> StyleDefinition {
        serde_json::from_value(value).unwrap()
    }

    fn extract(value: serde_json::Value) -> Vec<ExtractedItem> {
        let mut plugins = PluginPipeline::new(Vec::new());
        let mut extractor = Extractor::new(DEFAULT_SELECTOR, &mut plugins);
        block_on(extractor.extract(&definition(value))).unwrap()
    }

    fn content(chain: &[&str], property: &str, value: Option<&[&str]>) -> ExtractedItem {
        ExtractedItem::Content(ExtractedRuleContent {
            selector_chain: chain.iter().map(|s| s.to_string()).collect(),
            property: property.to_string(),
            value: value.map(|values| values.iter().map(|v| v.to_string()).collect()),
        })
    }

    #[test]
    fn test_normalize_empty_chain() {
        assert_eq!(normalize_selectors(&[], ".$$"), vec![".$$"]);
    }

    #[test]
    fn test_normalize_appends_default_selector() {
        let chain = vec!["@media (min-width: 0px)".to_string()];
        assert_eq!(normalize_selectors(&chain, ".$$"), vec!["@media (min-width: 0px)", ".$$"]);
    }

    #[test]
    fn test_normalize_substitutes_marker_per_comma_group() {
        let chain = vec!["&:hover, &:focus".to_string()];
        assert_eq!(normalize_selectors(&chain, ".$$"), vec![".$$:hover,.$$:focus"]);

        let chain = vec!["div > $$".to_string()];
        assert_eq!(normalize_selectors(&chain, ".$$"), vec!["div > $$"]);
    }

    #[test]
    fn test_flat_definition() {
        let items = extract(json!({
            "backgroundColor": "red",
            "width": ["100%", ["fill-available", "100%"]],
            "margin": null,
        }));

        assert_eq!(
            items,
            vec![
                content(&[".$$"], "background-color", Some(&["red"])),
                content(&[".$$"], "width", Some(&["100%", "fill-available"])),
                content(&[".$$"], "margin", None),
            ]
        );
    }

    #[test]
    fn test_nested_contexts_extend_the_chain() {
        let items = extract(json!({
            "color": "red",
            "@media (min-width: 640px)": {
                "color": "blue",
                "&:hover": { "color": "green" },
            },
            "padding": 1,
        }));

        assert_eq!(
            items,
            vec![
                content(&[".$$"], "color", Some(&["red"])),
                content(&["@media (min-width: 640px)", ".$$"], "color", Some(&["blue"])),
                content(&["@media (min-width: 640px)", ".$$:hover"], "color", Some(&["green"])),
                content(&[".$$"], "padding", Some(&["1"])),
            ]
        );
    }

    #[test]
    fn test_item_lists_fan_out_and_report_unknown() {
        let items = extract(json!({
            "&:focus": ["ring", { "outline": "none" }, { "boxShadow": "none" }],
        }));

        assert_eq!(
            items,
            vec![
                ExtractedItem::Unknown("ring".to_string()),
                content(&[".$$:focus"], "outline", Some(&["none"])),
                content(&[".$$:focus"], "box-shadow", Some(&["none"])),
            ]
        );
    }

    #[test]
    fn test_empty_definition_yields_nothing() {
        assert!(extract(json!({})).is_empty());
        assert!(extract(json!({ "&:hover": {} })).is_empty());
    }

    #[test]
    fn test_deep_nesting() {
        let mut value = json!({ "color": "red" });
        for level in 0..32 {
            value = json!({ format!("@layer l{}", level): value });
        }
        let items = extract(value);
        match &items[..] {
            [ExtractedItem::Content(content)] => {
                assert_eq!(content.selector_chain.len(), 33);
                assert_eq!(content.selector_chain[0], "@layer l31");
                assert_eq!(content.selector_chain[32], ".$$");
            }
            other => panic!("unexpected extraction {:?}", other),
        }
    }
}
