//! Shortcut expansion

use super::{read_extra, OneOrMany};
use crate::config::ResolvedConfig;
use crate::error::Result;
use crate::plugin::Plugin;
use crate::resolver::ShortcutResolver;
use crate::types::StyleItem;
use async_trait::async_trait;
use regex::Captures;

/// Replaces shortcut names in style item lists with what they stand for.
///
/// Static shortcuts come from `extra.shortcuts` as `[[name, item], ...]`
/// where the item may also be a list of items.
#[derive(Default)]
pub struct ShortcutsPlugin {
    resolver: ShortcutResolver,
}

impl ShortcutsPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dynamic_rule(
        mut self,
        key: impl Into<String>,
        pattern: &str,
        compute: impl Fn(&Captures<'_>) -> Vec<StyleItem> + 'static,
    ) -> Result<Self> {
        self.resolver.add_dynamic_rule(key, pattern, compute)?;
        Ok(self)
    }

    pub fn resolver(&self) -> &ShortcutResolver {
        &self.resolver
    }
}

#[async_trait(?Send)]
impl Plugin for ShortcutsPlugin {
    fn name(&self) -> &str {
        "core:shortcuts"
    }

    async fn config_resolved(&mut self, config: &mut ResolvedConfig) -> Result<()> {
        let rules: Vec<(String, OneOrMany<StyleItem>)> =
            read_extra(config, "shortcuts")?.unwrap_or_default();
        for (name, items) in rules {
            self.resolver.add_static_rule(name, items.into_vec());
        }
        Ok(())
    }

    async fn transform_style_items(&mut self, items: &[StyleItem]) -> Result<Option<Vec<StyleItem>>> {
        let mut expanded = Vec::with_capacity(items.len());
        for item in items {
            match item.as_shortcut() {
                Some(name) => match self.resolver.resolve(name)? {
                    Some(resolved) => expanded.extend(resolved),
                    None => expanded.push(item.clone()),
                },
                None => expanded.push(item.clone()),
            }
        }
        Ok(Some(expanded))
    }
}
