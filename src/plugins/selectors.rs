//! Selector aliases

use super::{read_extra, OneOrMany};
use crate::config::ResolvedConfig;
use crate::error::Result;
use crate::plugin::{Enforce, Plugin};
use crate::resolver::SelectorResolver;
use async_trait::async_trait;
use regex::Captures;

/// Expands selector aliases before selectors are normalized.
///
/// Static aliases come from `extra.selectors` as `[[alias, fragment], ...]`
/// where the fragment may also be a list. Pattern aliases are registered
/// through [`SelectorsPlugin::with_dynamic_rule`].
#[derive(Default)]
pub struct SelectorsPlugin {
    resolver: SelectorResolver,
}

impl SelectorsPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dynamic_rule(
        mut self,
        key: impl Into<String>,
        pattern: &str,
        compute: impl Fn(&Captures<'_>) -> Vec<String> + 'static,
    ) -> Result<Self> {
        self.resolver.add_dynamic_rule(key, pattern, compute)?;
        Ok(self)
    }

    pub fn resolver(&self) -> &SelectorResolver {
        &self.resolver
    }
}

#[async_trait(?Send)]
impl Plugin for SelectorsPlugin {
    fn name(&self) -> &str {
        "core:selectors"
    }

    fn enforce(&self) -> Enforce {
        Enforce::Pre
    }

    async fn config_resolved(&mut self, config: &mut ResolvedConfig) -> Result<()> {
        let rules: Vec<(String, OneOrMany<String>)> =
            read_extra(config, "selectors")?.unwrap_or_default();
        for (alias, fragments) in rules {
            self.resolver.add_static_rule(alias, fragments.into_vec());
        }
        Ok(())
    }

    async fn transform_selectors(&mut self, selectors: &[String]) -> Result<Option<Vec<String>>> {
        let mut resolved = Vec::with_capacity(selectors.len());
        for selector in selectors {
            resolved.extend(self.resolver.resolve(selector)?);
        }
        Ok(Some(resolved))
    }
}
